//! Segment models: summary/detailed tiers, efforts, and the explorer
//! results.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{MetaActivity, PolylineMap};
use super::athlete::MetaAthlete;
use super::coerce;
use super::enums::ActivityType;
use super::primitives::{Distance, EffortId, LatLng, ResourceState, SegmentId, TimeSpan};
use super::ClientBound;
use crate::client::StravaClient;
use crate::{Error, Result};

/// Summary view of a segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySegment {
    /// The segment id.
    pub id: SegmentId,
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// Segment name.
    pub name: String,
    /// The activity type the segment applies to.
    #[serde(default, deserialize_with = "coerce::relaxed_activity_type")]
    pub activity_type: Option<ActivityType>,
    /// Segment length.
    pub distance: Distance,
    /// Average grade in percent.
    #[serde(default)]
    pub average_grade: Option<f64>,
    /// Maximum grade in percent.
    #[serde(default)]
    pub maximum_grade: Option<f64>,
    /// Highest elevation in meters.
    #[serde(default)]
    pub elevation_high: Option<f64>,
    /// Lowest elevation in meters.
    #[serde(default)]
    pub elevation_low: Option<f64>,
    /// Start coordinates.
    #[serde(default, deserialize_with = "coerce::optional_latlng")]
    pub start_latlng: Option<LatLng>,
    /// End coordinates.
    #[serde(default, deserialize_with = "coerce::optional_latlng")]
    pub end_latlng: Option<LatLng>,
    /// Climb category, 0 (none) through 5 (hors catégorie).
    #[serde(default)]
    pub climb_category: Option<i64>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Whether the segment is private.
    #[serde(default)]
    pub private: Option<bool>,
    /// Whether the authenticated athlete has starred this segment.
    #[serde(default)]
    pub starred: Option<bool>,
    #[serde(skip)]
    pub(crate) bound_client: Option<StravaClient>,
}

impl SummarySegment {
    fn client(&self) -> Result<&StravaClient> {
        self.bound_client.as_ref().ok_or_else(|| {
            Error::Usage("segment is not bound to a client; fetch it via a StravaClient".into())
        })
    }

    /// Fetch the detailed view of this segment as a new instance.
    pub async fn fetch_detailed(&self) -> Result<DetailedSegment> {
        self.client()?.segments().get(self.id).await
    }
}

impl ClientBound for SummarySegment {
    fn bind(&mut self, client: &StravaClient) {
        self.bound_client = Some(client.clone());
    }
}

/// Full view of a segment, from the segment-by-id endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedSegment {
    /// The summary fields.
    #[serde(flatten)]
    pub summary: SummarySegment,
    /// When the segment was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the segment was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Total elevation gain.
    #[serde(default)]
    pub total_elevation_gain: Option<Distance>,
    /// The segment's polyline map.
    #[serde(default)]
    pub map: Option<PolylineMap>,
    /// Number of efforts recorded on this segment.
    #[serde(default)]
    pub effort_count: Option<i64>,
    /// Number of distinct athletes with efforts.
    #[serde(default)]
    pub athlete_count: Option<i64>,
    /// Whether the segment is flagged as hazardous.
    #[serde(default)]
    pub hazardous: Option<bool>,
    /// Number of stars.
    #[serde(default)]
    pub star_count: Option<i64>,
}

impl DetailedSegment {
    /// The segment id.
    pub fn id(&self) -> SegmentId {
        self.summary.id
    }
}

impl ClientBound for DetailedSegment {
    fn bind(&mut self, client: &StravaClient) {
        self.summary.bind(client);
    }
}

/// One athlete's attempt on a segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentEffort {
    /// The effort id.
    pub id: EffortId,
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// Effort name (usually the segment name).
    #[serde(default)]
    pub name: Option<String>,
    /// The activity the effort occurred in.
    pub activity: MetaActivity,
    /// The athlete who made the effort.
    pub athlete: MetaAthlete,
    /// Elapsed time.
    pub elapsed_time: TimeSpan,
    /// Moving time.
    pub moving_time: TimeSpan,
    /// Effort start time in UTC.
    pub start_date: DateTime<Utc>,
    /// Effort start as local wall-clock time.
    #[serde(default, deserialize_with = "coerce::naive_local")]
    pub start_date_local: Option<NaiveDateTime>,
    /// Distance covered.
    pub distance: Distance,
    /// Stream index where the effort starts.
    #[serde(default)]
    pub start_index: Option<i64>,
    /// Stream index where the effort ends.
    #[serde(default)]
    pub end_index: Option<i64>,
    /// Average heartrate, when recorded.
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    /// Maximum heartrate, when recorded.
    #[serde(default)]
    pub max_heartrate: Option<f64>,
    /// The segment, at the summary tier.
    #[serde(default)]
    pub segment: Option<SummarySegment>,
    /// KOM/QOM rank (1-10) earned by this effort, if any.
    #[serde(default)]
    pub kom_rank: Option<i64>,
    /// Personal-record rank (1-3) earned by this effort, if any.
    #[serde(default)]
    pub pr_rank: Option<i64>,
}

impl ClientBound for SegmentEffort {
    fn bind(&mut self, client: &StravaClient) {
        self.activity.bind(client);
        self.athlete.bind(client);
        if let Some(segment) = &mut self.segment {
            segment.bind(client);
        }
    }
}

/// A geographic bounding box for the segment explorer, as
/// `south-west lat/lng, north-east lat/lng`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// South-west corner.
    pub sw: LatLng,
    /// North-east corner.
    pub ne: LatLng,
}

impl Bounds {
    /// The comma-joined query encoding the API expects.
    pub fn to_query(&self) -> String {
        format!(
            "{},{},{},{}",
            self.sw.lat, self.sw.lng, self.ne.lat, self.ne.lng
        )
    }
}

/// Response envelope from the segment explorer.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerResponse {
    /// The matched segments.
    pub segments: Vec<ExplorerSegment>,
}

/// A segment as reduced by the explorer endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerSegment {
    /// The segment id.
    pub id: SegmentId,
    /// Segment name.
    pub name: String,
    /// Climb category, 0 (none) through 5 (hors catégorie).
    #[serde(default)]
    pub climb_category: Option<i64>,
    /// Human-readable climb category (e.g. `"HC"`, `"4"`).
    #[serde(default)]
    pub climb_category_desc: Option<String>,
    /// Average grade in percent.
    #[serde(default)]
    pub avg_grade: Option<f64>,
    /// Start coordinates.
    #[serde(default, deserialize_with = "coerce::optional_latlng")]
    pub start_latlng: Option<LatLng>,
    /// End coordinates.
    #[serde(default, deserialize_with = "coerce::optional_latlng")]
    pub end_latlng: Option<LatLng>,
    /// Net elevation difference in meters.
    #[serde(default)]
    pub elev_difference: Option<f64>,
    /// Segment length.
    #[serde(default)]
    pub distance: Option<Distance>,
    /// Encoded polyline of the segment.
    #[serde(default)]
    pub points: Option<String>,
    #[serde(skip)]
    pub(crate) bound_client: Option<StravaClient>,
}

impl ExplorerSegment {
    /// Fetch the full segment this explorer result refers to.
    pub async fn fetch_segment(&self) -> Result<DetailedSegment> {
        let client = self.bound_client.as_ref().ok_or_else(|| {
            Error::Usage("segment is not bound to a client; fetch it via a StravaClient".into())
        })?;
        client.segments().get(self.id).await
    }
}

impl ClientBound for ExplorerSegment {
    fn bind(&mut self, client: &StravaClient) {
        self.bound_client = Some(client.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_segment_decode() {
        let segment: SummarySegment = serde_json::from_value(serde_json::json!({
            "id": 229781,
            "resource_state": 2,
            "name": "Hawk Hill",
            "activity_type": "Ride",
            "distance": 2684.82,
            "average_grade": 5.7,
            "climb_category": 1,
            "start_latlng": [37.8331119, -122.4834356],
            "end_latlng": [37.8280722, -122.4981393]
        }))
        .unwrap();
        assert_eq!(segment.id.value(), 229781);
        assert_eq!(segment.activity_type, Some(ActivityType::Ride));
        assert!(segment.start_latlng.is_some());
    }

    #[test]
    fn test_bounds_query_encoding() {
        let bounds = Bounds {
            sw: LatLng {
                lat: 37.821362,
                lng: -122.505373,
            },
            ne: LatLng {
                lat: 37.842038,
                lng: -122.465977,
            },
        };
        assert_eq!(
            bounds.to_query(),
            "37.821362,-122.505373,37.842038,-122.465977"
        );
    }

    #[tokio::test]
    async fn test_unbound_explorer_segment_is_usage_error() {
        let segment: ExplorerSegment = serde_json::from_value(serde_json::json!({
            "id": 229781,
            "name": "Hawk Hill"
        }))
        .unwrap();
        assert!(matches!(
            segment.fetch_segment().await,
            Err(Error::Usage(_))
        ));
    }
}
