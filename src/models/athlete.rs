//! Athlete models: meta/summary/detailed tiers plus aggregate stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::club::SummaryClub;
use super::coerce;
use super::enums::{AthleteType, Sex};
use super::gear::SummaryGear;
use super::primitives::{AthleteId, Distance, ResourceState, TimeSpan};
use super::ClientBound;
use crate::client::StravaClient;
use crate::{Error, Result};

/// Meta view of an athlete: id and tier tag only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaAthlete {
    /// The athlete id.
    pub id: AthleteId,
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    #[serde(skip)]
    pub(crate) bound_client: Option<StravaClient>,
}

impl MetaAthlete {
    fn client(&self) -> Result<&StravaClient> {
        self.bound_client.as_ref().ok_or_else(|| {
            Error::Usage("athlete is not bound to a client; fetch it via a StravaClient".into())
        })
    }

    /// Fetch this athlete's aggregate statistics. Only valid for the
    /// authenticated athlete; performs I/O.
    pub async fn stats(&self) -> Result<AthleteStats> {
        self.client()?.athletes().stats(self.id).await
    }
}

impl ClientBound for MetaAthlete {
    fn bind(&mut self, client: &StravaClient) {
        self.bound_client = Some(client.clone());
    }
}

/// Summary view of an athlete, as embedded in activities, kudos lists,
/// and the token-exchange response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryAthlete {
    /// The meta fields.
    #[serde(flatten)]
    pub meta: MetaAthlete,
    /// Username, when the athlete has one.
    #[serde(default)]
    pub username: Option<String>,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Short biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Self-reported sex.
    #[serde(default)]
    pub sex: Option<Sex>,
    /// Whether the athlete has a Summit/premium subscription.
    #[serde(default)]
    pub premium: Option<bool>,
    /// Newer name for the premium flag.
    #[serde(default)]
    pub summit: Option<bool>,
    /// Account creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last profile update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Medium-resolution profile picture URL.
    #[serde(default)]
    pub profile_medium: Option<String>,
    /// Full-resolution profile picture URL.
    #[serde(default)]
    pub profile: Option<String>,
}

impl SummaryAthlete {
    /// The athlete id.
    pub fn id(&self) -> AthleteId {
        self.meta.id
    }

    /// Fetch this athlete's aggregate statistics; see
    /// [`MetaAthlete::stats`].
    pub async fn stats(&self) -> Result<AthleteStats> {
        self.meta.stats().await
    }
}

impl ClientBound for SummaryAthlete {
    fn bind(&mut self, client: &StravaClient) {
        self.meta.bind(client);
    }
}

/// Full view of the authenticated athlete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAthlete {
    /// The summary fields.
    #[serde(flatten)]
    pub summary: SummaryAthlete,
    /// Number of followers.
    pub follower_count: i64,
    /// Number of athletes followed.
    pub friend_count: i64,
    /// Preferred unit system, `"feet"` or `"meters"`.
    #[serde(default)]
    pub measurement_preference: Option<String>,
    /// Functional threshold power, if set.
    #[serde(default)]
    pub ftp: Option<i64>,
    /// Weight in kilograms, if set.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Primary discipline.
    #[serde(default, deserialize_with = "coerce::athlete_type")]
    pub athlete_type: Option<AthleteType>,
    /// Clubs the athlete belongs to.
    #[serde(default)]
    pub clubs: Option<Vec<SummaryClub>>,
    /// The athlete's bikes.
    #[serde(default)]
    pub bikes: Option<Vec<SummaryGear>>,
    /// The athlete's shoes.
    #[serde(default)]
    pub shoes: Option<Vec<SummaryGear>>,
}

impl DetailedAthlete {
    /// The athlete id.
    pub fn id(&self) -> AthleteId {
        self.summary.meta.id
    }

    /// Fetch this athlete's aggregate statistics; see
    /// [`MetaAthlete::stats`].
    pub async fn stats(&self) -> Result<AthleteStats> {
        self.summary.meta.stats().await
    }
}

impl ClientBound for DetailedAthlete {
    fn bind(&mut self, client: &StravaClient) {
        self.summary.bind(client);
        if let Some(clubs) = &mut self.clubs {
            for club in clubs {
                club.bind(client);
            }
        }
    }
}

/// Rolled-up activity totals for one sport over one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityTotals {
    /// Number of activities.
    pub count: i64,
    /// Total distance.
    pub distance: Distance,
    /// Total moving time.
    pub moving_time: TimeSpan,
    /// Total elapsed time.
    pub elapsed_time: TimeSpan,
    /// Total elevation gain.
    pub elevation_gain: Distance,
    /// Total achievements, where the period tracks them.
    #[serde(default)]
    pub achievement_count: Option<i64>,
}

/// Aggregate statistics for an athlete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteStats {
    /// Longest ride on record.
    #[serde(default)]
    pub biggest_ride_distance: Option<Distance>,
    /// Biggest single climb on record.
    #[serde(default)]
    pub biggest_climb_elevation_gain: Option<Distance>,
    /// Ride totals over the last four weeks.
    pub recent_ride_totals: ActivityTotals,
    /// Run totals over the last four weeks.
    pub recent_run_totals: ActivityTotals,
    /// Swim totals over the last four weeks.
    pub recent_swim_totals: ActivityTotals,
    /// Year-to-date ride totals.
    pub ytd_ride_totals: ActivityTotals,
    /// Year-to-date run totals.
    pub ytd_run_totals: ActivityTotals,
    /// Year-to-date swim totals.
    pub ytd_swim_totals: ActivityTotals,
    /// All-time ride totals.
    pub all_ride_totals: ActivityTotals,
    /// All-time run totals.
    pub all_run_totals: ActivityTotals,
    /// All-time swim totals.
    pub all_swim_totals: ActivityTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_payload() -> serde_json::Value {
        serde_json::json!({
            "id": 227615,
            "resource_state": 2,
            "firstname": "Ada",
            "lastname": "Lovelace",
            "city": "London",
            "sex": "F",
            "premium": true
        })
    }

    #[test]
    fn test_summary_athlete_decode() {
        let athlete: SummaryAthlete = serde_json::from_value(summary_payload()).unwrap();
        assert_eq!(athlete.id().value(), 227615);
        assert_eq!(athlete.meta.resource_state, Some(ResourceState::Summary));
        assert_eq!(athlete.firstname, "Ada");
    }

    #[test]
    fn test_summary_tier_requires_name_fields() {
        // A meta payload must not decode at the summary tier.
        let meta = serde_json::json!({"id": 227615, "resource_state": 1});
        assert!(serde_json::from_value::<SummaryAthlete>(meta.clone()).is_err());
        assert!(serde_json::from_value::<MetaAthlete>(meta).is_ok());
    }

    #[test]
    fn test_detailed_tier_requires_counts() {
        // A summary payload must not decode at the detailed tier.
        assert!(serde_json::from_value::<DetailedAthlete>(summary_payload()).is_err());
    }

    #[test]
    fn test_decode_is_pure() {
        let a: SummaryAthlete = serde_json::from_value(summary_payload()).unwrap();
        let b: SummaryAthlete = serde_json::from_value(summary_payload()).unwrap();
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    #[tokio::test]
    async fn test_unbound_stats_is_usage_error() {
        let athlete: SummaryAthlete = serde_json::from_value(summary_payload()).unwrap();
        match athlete.stats().await {
            Err(Error::Usage(msg)) => assert!(msg.contains("not bound")),
            other => panic!("expected usage error, got {other:?}"),
        }
    }
}
