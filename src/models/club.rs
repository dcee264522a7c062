//! Club models: meta/summary/detailed tiers plus member and club-feed
//! records.

use serde::{Deserialize, Serialize};

use super::coerce;
use super::enums::{ActivityType, MembershipStatus, SportType};
use super::primitives::{ClubId, Distance, ResourceState, TimeSpan};
use super::ClientBound;
use crate::client::{PageStream, StravaClient};
use crate::{Error, Result};

/// Meta view of a club: id and tier tag only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaClub {
    /// The club id.
    pub id: ClubId,
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// Display name. Present from the meta tier up.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(skip)]
    pub(crate) bound_client: Option<StravaClient>,
}

impl ClientBound for MetaClub {
    fn bind(&mut self, client: &StravaClient) {
        self.bound_client = Some(client.clone());
    }
}

/// Summary view of a club, as returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryClub {
    /// The meta fields.
    #[serde(flatten)]
    pub meta: MetaClub,
    /// Medium-resolution profile picture URL.
    #[serde(default)]
    pub profile_medium: Option<String>,
    /// Cover photo URL.
    #[serde(default)]
    pub cover_photo: Option<String>,
    /// Small cover photo URL.
    #[serde(default)]
    pub cover_photo_small: Option<String>,
    /// The club's primary sport.
    #[serde(default)]
    pub sport_type: Option<String>,
    /// City the club is based in.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Whether membership requires approval.
    #[serde(default)]
    pub private: Option<bool>,
    /// Number of members.
    #[serde(default)]
    pub member_count: Option<i64>,
    /// Whether the club is featured.
    #[serde(default)]
    pub featured: Option<bool>,
    /// Whether the club is verified.
    #[serde(default)]
    pub verified: Option<bool>,
    /// Vanity URL slug.
    #[serde(default)]
    pub url: Option<String>,
}

impl SummaryClub {
    /// The club id.
    pub fn id(&self) -> ClubId {
        self.meta.id
    }

    fn client(&self) -> Result<&StravaClient> {
        self.meta.bound_client.as_ref().ok_or_else(|| {
            Error::Usage("club is not bound to a client; fetch it via a StravaClient".into())
        })
    }

    /// Lazily page through this club's members. Performs I/O as the
    /// returned stream is driven.
    pub fn members(&self) -> Result<PageStream<ClubMember>> {
        Ok(self.client()?.clubs().members(self.id()))
    }

    /// Lazily page through this club's recent activities.
    pub fn activities(&self) -> Result<PageStream<ClubActivity>> {
        Ok(self.client()?.clubs().activities(self.id()))
    }

    /// Fetch the detailed view of this club as a new instance.
    pub async fn fetch_detailed(&self) -> Result<DetailedClub> {
        self.client()?.clubs().get(self.id()).await
    }
}

impl ClientBound for SummaryClub {
    fn bind(&mut self, client: &StravaClient) {
        self.meta.bind(client);
    }
}

/// Full view of a club, from the club-by-id endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedClub {
    /// The summary fields.
    #[serde(flatten)]
    pub summary: SummaryClub,
    /// The authenticated athlete's membership status.
    #[serde(default)]
    pub membership: Option<MembershipStatus>,
    /// Whether the authenticated athlete is a club admin.
    #[serde(default)]
    pub admin: Option<bool>,
    /// Whether the authenticated athlete owns the club.
    #[serde(default)]
    pub owner: Option<bool>,
    /// Number of athletes the authenticated athlete follows in this club.
    #[serde(default)]
    pub following_count: Option<i64>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Club type (e.g. `"casual_club"`).
    #[serde(default)]
    pub club_type: Option<String>,
}

impl DetailedClub {
    /// The club id.
    pub fn id(&self) -> ClubId {
        self.summary.meta.id
    }
}

impl ClientBound for DetailedClub {
    fn bind(&mut self, client: &StravaClient) {
        self.summary.bind(client);
    }
}

/// A club member. Strava redacts these to name fields only, regardless
/// of the member's own profile visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubMember {
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// First name.
    pub firstname: String,
    /// Last name, typically truncated to an initial.
    pub lastname: String,
    /// Membership status.
    #[serde(default)]
    pub membership: Option<MembershipStatus>,
    /// Whether this member is a club admin.
    #[serde(default)]
    pub admin: Option<bool>,
    /// Whether this member owns the club.
    #[serde(default)]
    pub owner: Option<bool>,
}

impl ClientBound for ClubMember {
    fn bind(&mut self, _client: &StravaClient) {}
}

/// An entry in a club's activity feed. The athlete is redacted to names
/// and activity ids are withheld.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubActivity {
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// The redacted athlete.
    pub athlete: ClubAthlete,
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
}

impl ClientBound for ClubActivity {
    fn bind(&mut self, _client: &StravaClient) {}
}

/// The name-only athlete embedded in club activity feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubAthlete {
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// First name.
    pub firstname: String,
    /// Last name, truncated to an initial.
    pub lastname: String,
}
