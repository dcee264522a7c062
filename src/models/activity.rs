//! Activity models: meta/summary/detailed tiers plus comments, laps,
//! splits, and the create/update request payloads.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::athlete::{MetaAthlete, SummaryAthlete};
use super::coerce;
use super::enums::{ActivityType, SportType};
use super::gear::SummaryGear;
use super::primitives::{ActivityId, Distance, GearId, LatLng, ResourceState, TimeSpan, Velocity};
use super::ClientBound;
use crate::client::{PageStream, StravaClient};
use crate::{Error, Result};

/// Meta view of an activity: id and tier tag only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaActivity {
    /// The activity id.
    pub id: ActivityId,
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    #[serde(skip)]
    pub(crate) bound_client: Option<StravaClient>,
}

impl ClientBound for MetaActivity {
    fn bind(&mut self, client: &StravaClient) {
        self.bound_client = Some(client.clone());
    }
}

/// Summary view of an activity, as returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryActivity {
    /// The meta fields.
    #[serde(flatten)]
    pub meta: MetaActivity,
    /// The activity's owner, at the meta tier.
    pub athlete: MetaAthlete,
    /// Activity name.
    pub name: String,
    /// Distance covered.
    pub distance: Distance,
    /// Moving time.
    pub moving_time: TimeSpan,
    /// Elapsed time.
    pub elapsed_time: TimeSpan,
    /// Total elevation gain.
    #[serde(default)]
    pub total_elevation_gain: Option<Distance>,
    /// Legacy activity type.
    #[serde(default, deserialize_with = "coerce::relaxed_activity_type")]
    pub r#type: Option<ActivityType>,
    /// Current sport classification.
    #[serde(default, deserialize_with = "coerce::relaxed_sport_type")]
    pub sport_type: Option<SportType>,
    /// Start time in UTC.
    pub start_date: DateTime<Utc>,
    /// Start time as local wall-clock time (offset dropped).
    #[serde(default, deserialize_with = "coerce::naive_local")]
    pub start_date_local: Option<NaiveDateTime>,
    /// Timezone name (e.g. `"(GMT-08:00) America/Los_Angeles"`).
    #[serde(default)]
    pub timezone: Option<String>,
    /// UTC offset in seconds.
    #[serde(default)]
    pub utc_offset: Option<f64>,
    /// Start coordinates, absent for GPS-less activities.
    #[serde(default, deserialize_with = "coerce::optional_latlng")]
    pub start_latlng: Option<LatLng>,
    /// End coordinates.
    #[serde(default, deserialize_with = "coerce::optional_latlng")]
    pub end_latlng: Option<LatLng>,
    /// Achievement count.
    #[serde(default)]
    pub achievement_count: Option<i64>,
    /// Kudos count.
    #[serde(default)]
    pub kudos_count: Option<i64>,
    /// Comment count.
    #[serde(default)]
    pub comment_count: Option<i64>,
    /// Number of athletes on a group activity.
    #[serde(default)]
    pub athlete_count: Option<i64>,
    /// Photo count.
    #[serde(default)]
    pub photo_count: Option<i64>,
    /// Route polyline, when available.
    #[serde(default)]
    pub map: Option<PolylineMap>,
    /// Recorded on a trainer.
    #[serde(default)]
    pub trainer: Option<bool>,
    /// Tagged as a commute.
    #[serde(default)]
    pub commute: Option<bool>,
    /// Manually entered.
    #[serde(default)]
    pub manual: Option<bool>,
    /// Visible to the owner only.
    #[serde(default)]
    pub private: Option<bool>,
    /// Flagged by Strava.
    #[serde(default)]
    pub flagged: Option<bool>,
    /// Gear used, if assigned.
    #[serde(default)]
    pub gear_id: Option<GearId>,
    /// Average speed.
    #[serde(default)]
    pub average_speed: Option<Velocity>,
    /// Maximum speed.
    #[serde(default)]
    pub max_speed: Option<Velocity>,
    /// Average power in watts, rides only.
    #[serde(default)]
    pub average_watts: Option<f64>,
    /// Total work in kilojoules, rides only.
    #[serde(default)]
    pub kilojoules: Option<f64>,
    /// Whether watts came from a power meter.
    #[serde(default)]
    pub device_watts: Option<bool>,
    /// Whether heartrate data was recorded.
    #[serde(default)]
    pub has_heartrate: Option<bool>,
    /// Average heartrate in bpm.
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    /// Maximum heartrate in bpm.
    #[serde(default)]
    pub max_heartrate: Option<f64>,
    /// The upload id, for device-recorded activities.
    #[serde(default)]
    pub upload_id: Option<i64>,
    /// The uploader's external id.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Workout type code (e.g. race vs. workout).
    #[serde(default)]
    pub workout_type: Option<i64>,
}

impl SummaryActivity {
    /// The activity id.
    pub fn id(&self) -> ActivityId {
        self.meta.id
    }

    fn client(&self) -> Result<&StravaClient> {
        self.meta.bound_client.as_ref().ok_or_else(|| {
            Error::Usage("activity is not bound to a client; fetch it via a StravaClient".into())
        })
    }

    /// Lazily page through this activity's comments. Performs I/O as the
    /// returned stream is driven.
    pub fn comments(&self) -> Result<PageStream<Comment>> {
        Ok(self.client()?.activities().comments(self.id()))
    }

    /// Lazily page through the athletes who kudoed this activity.
    pub fn kudos(&self) -> Result<PageStream<SummaryAthlete>> {
        Ok(self.client()?.activities().kudos(self.id()))
    }

    /// Lazily page through this activity's laps.
    pub fn laps(&self) -> Result<PageStream<Lap>> {
        Ok(self.client()?.activities().laps(self.id()))
    }

    /// Fetch the detailed view of this activity as a new instance.
    /// The summary this is called on is left untouched.
    pub async fn fetch_detailed(&self) -> Result<DetailedActivity> {
        self.client()?.activities().get(self.id(), false).await
    }
}

impl ClientBound for SummaryActivity {
    fn bind(&mut self, client: &StravaClient) {
        self.meta.bind(client);
        self.athlete.bind(client);
    }
}

/// Full view of an activity, from the activity-by-id endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedActivity {
    /// The summary fields.
    #[serde(flatten)]
    pub summary: SummaryActivity,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Calories burned.
    #[serde(default)]
    pub calories: Option<f64>,
    /// Recording device name.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Token for the activity embed widget.
    #[serde(default)]
    pub embed_token: Option<String>,
    /// Gear used, at the summary tier.
    #[serde(default)]
    pub gear: Option<SummaryGear>,
    /// Metric splits (per kilometer).
    #[serde(default)]
    pub splits_metric: Option<Vec<Split>>,
    /// Standard splits (per mile).
    #[serde(default)]
    pub splits_standard: Option<Vec<Split>>,
}

impl DetailedActivity {
    /// The activity id.
    pub fn id(&self) -> ActivityId {
        self.summary.meta.id
    }

    /// Lazily page through this activity's comments.
    pub fn comments(&self) -> Result<PageStream<Comment>> {
        self.summary.comments()
    }

    /// Lazily page through the athletes who kudoed this activity.
    pub fn kudos(&self) -> Result<PageStream<SummaryAthlete>> {
        self.summary.kudos()
    }

    /// Lazily page through this activity's laps.
    pub fn laps(&self) -> Result<PageStream<Lap>> {
        self.summary.laps()
    }
}

impl ClientBound for DetailedActivity {
    fn bind(&mut self, client: &StravaClient) {
        self.summary.bind(client);
    }
}

/// An encoded-polyline map attached to an activity or segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolylineMap {
    /// The map id.
    pub id: String,
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// Full-resolution polyline, detailed tier only.
    #[serde(default)]
    pub polyline: Option<String>,
    /// Reduced-resolution polyline.
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

/// A comment on an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// The comment id.
    pub id: i64,
    /// The activity commented on.
    pub activity_id: ActivityId,
    /// Comment body.
    pub text: String,
    /// The commenting athlete.
    pub athlete: SummaryAthlete,
    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
}

impl ClientBound for Comment {
    fn bind(&mut self, client: &StravaClient) {
        self.athlete.bind(client);
    }
}

/// One lap within an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lap {
    /// The lap id.
    pub id: i64,
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// Lap name (e.g. `"Lap 1"`).
    pub name: String,
    /// The owning activity.
    pub activity: MetaActivity,
    /// The owning athlete.
    pub athlete: MetaAthlete,
    /// Elapsed time.
    pub elapsed_time: TimeSpan,
    /// Moving time.
    pub moving_time: TimeSpan,
    /// Lap start time in UTC.
    pub start_date: DateTime<Utc>,
    /// Lap start as local wall-clock time.
    #[serde(default, deserialize_with = "coerce::naive_local")]
    pub start_date_local: Option<NaiveDateTime>,
    /// Distance covered in the lap.
    pub distance: Distance,
    /// Stream index where the lap starts.
    #[serde(default)]
    pub start_index: Option<i64>,
    /// Stream index where the lap ends.
    #[serde(default)]
    pub end_index: Option<i64>,
    /// Elevation gained in the lap.
    #[serde(default)]
    pub total_elevation_gain: Option<Distance>,
    /// Average speed over the lap.
    #[serde(default)]
    pub average_speed: Option<Velocity>,
    /// Maximum speed in the lap.
    #[serde(default)]
    pub max_speed: Option<Velocity>,
    /// 1-based lap number.
    #[serde(default)]
    pub lap_index: Option<i64>,
}

impl ClientBound for Lap {
    fn bind(&mut self, client: &StravaClient) {
        self.activity.bind(client);
        self.athlete.bind(client);
    }
}

/// One distance split within a detailed activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Split {
    /// Split distance.
    pub distance: Distance,
    /// Elapsed time for the split.
    pub elapsed_time: TimeSpan,
    /// Moving time for the split.
    #[serde(default)]
    pub moving_time: Option<TimeSpan>,
    /// Net elevation change.
    #[serde(default)]
    pub elevation_difference: Option<f64>,
    /// 1-based split number.
    pub split: i64,
    /// Average speed over the split.
    #[serde(default)]
    pub average_speed: Option<Velocity>,
    /// Pace zone, runs only.
    #[serde(default)]
    pub pace_zone: Option<i64>,
}

/// Payload for manually creating an activity.
#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    /// Activity name.
    pub name: String,
    /// Sport classification.
    pub sport_type: SportType,
    /// Start time as local wall-clock time, ISO 8601.
    pub start_date_local: NaiveDateTime,
    /// Elapsed time in seconds.
    pub elapsed_time: i64,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Distance in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Mark as recorded on a trainer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<bool>,
    /// Mark as a commute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commute: Option<bool>,
}

/// Partial update for an existing activity. Unset fields are left
/// unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New sport classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<SportType>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Toggle the commute flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commute: Option<bool>,
    /// Toggle the trainer flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<bool>,
    /// Hide from home feeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_from_home: Option<bool>,
    /// Re-assign gear; pass `"none"` to clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gear_id: Option<String>,
}
