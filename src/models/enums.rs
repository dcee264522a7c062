//! Enumeration types shared across the entity model.

use serde::{Deserialize, Serialize};

/// The legacy activity type field.
///
/// Deprecated server-side in favor of [`SportType`] but still present on
/// every activity payload. New values appear on the server before they
/// appear here, so decoding goes through
/// [`coerce::relaxed_activity_type`](super::coerce) which falls back to
/// [`ActivityType::Workout`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    AlpineSki,
    BackcountrySki,
    Canoeing,
    Crossfit,
    EBikeRide,
    Elliptical,
    Golf,
    Handcycle,
    Hike,
    IceSkate,
    InlineSkate,
    Kayaking,
    Kitesurf,
    NordicSki,
    Ride,
    RockClimbing,
    RollerSki,
    Rowing,
    Run,
    Sail,
    Skateboard,
    Snowboard,
    Snowshoe,
    Soccer,
    StairStepper,
    StandUpPaddling,
    Surfing,
    Swim,
    Velomobile,
    VirtualRide,
    VirtualRun,
    Walk,
    WeightTraining,
    Wheelchair,
    Windsurf,
    Workout,
    Yoga,
}

/// The current activity classification, a superset of [`ActivityType`].
///
/// Decoded through the same relaxed fallback as `ActivityType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SportType {
    AlpineSki,
    BackcountrySki,
    Badminton,
    Canoeing,
    Crossfit,
    EBikeRide,
    Elliptical,
    EMountainBikeRide,
    Golf,
    GravelRide,
    Handcycle,
    HighIntensityIntervalTraining,
    Hike,
    IceSkate,
    InlineSkate,
    Kayaking,
    Kitesurf,
    MountainBikeRide,
    NordicSki,
    Pickleball,
    Pilates,
    Racquetball,
    Ride,
    RockClimbing,
    RollerSki,
    Rowing,
    Run,
    Sail,
    Skateboard,
    Snowboard,
    Snowshoe,
    Soccer,
    Squash,
    StairStepper,
    StandUpPaddling,
    Surfing,
    Swim,
    TableTennis,
    Tennis,
    TrailRun,
    Velomobile,
    VirtualRide,
    VirtualRow,
    VirtualRun,
    Walk,
    WeightTraining,
    Wheelchair,
    Windsurf,
    Workout,
    Yoga,
}

/// An athlete's self-reported sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    /// Male
    M,
    /// Female
    F,
}

/// An athlete's primary discipline.
///
/// Serialized as an integer on the wire; see
/// [`coerce::athlete_type`](super::coerce).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AthleteType {
    Cyclist,
    Runner,
    /// Any value the server introduces beyond the documented pair.
    Other(u8),
}

impl AthleteType {
    /// The integer tag used on the wire.
    pub fn as_u8(self) -> u8 {
        match self {
            AthleteType::Cyclist => 0,
            AthleteType::Runner => 1,
            AthleteType::Other(v) => v,
        }
    }
}

impl Serialize for AthleteType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// The authenticated athlete's membership status within a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Member,
    Pending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_decodes_known_value() {
        let t: ActivityType = serde_json::from_str("\"Ride\"").unwrap();
        assert_eq!(t, ActivityType::Ride);
    }

    #[test]
    fn test_sport_type_superset() {
        let t: SportType = serde_json::from_str("\"TrailRun\"").unwrap();
        assert_eq!(t, SportType::TrailRun);
        // GravelRide exists only in the sport-type vocabulary
        assert!(serde_json::from_str::<ActivityType>("\"GravelRide\"").is_err());
    }

    #[test]
    fn test_membership_status() {
        let m: MembershipStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(m, MembershipStatus::Pending);
    }
}
