//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around numeric identifiers
//! and raw scalar quantities to prevent mixing them up at compile time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Create a new id from a raw integer.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw integer value.
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id! {
    /// A strongly-typed athlete id.
    AthleteId
}
numeric_id! {
    /// A strongly-typed activity id.
    ActivityId
}
numeric_id! {
    /// A strongly-typed club id.
    ClubId
}
numeric_id! {
    /// A strongly-typed segment id.
    SegmentId
}
numeric_id! {
    /// A strongly-typed segment effort id.
    EffortId
}

/// A gear identifier (e.g. `"b105763"` for a bike, `"g12345"` for shoes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GearId(String);

impl GearId {
    /// Create a new gear id.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the gear id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GearId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GearId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The detail tier at which an entity was materialized.
///
/// Strava returns every object tagged with an integer `resource_state`:
/// `1` = meta (id only), `2` = summary (public-safe subset), `3` =
/// detailed (owner-only full view). Code should branch on this tag, not
/// on field presence, since some absent fields are tier-independent
/// optionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceState {
    /// Id only.
    Meta,
    /// Public-safe subset of fields.
    Summary,
    /// Full, authenticated-owner view.
    Detailed,
}

impl ResourceState {
    /// The integer tag used on the wire.
    pub fn as_u8(self) -> u8 {
        match self {
            ResourceState::Meta => 1,
            ResourceState::Summary => 2,
            ResourceState::Detailed => 3,
        }
    }
}

impl Serialize for ResourceState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for ResourceState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(ResourceState::Meta),
            2 => Ok(ResourceState::Summary),
            3 => Ok(ResourceState::Detailed),
            other => Err(serde::de::Error::custom(format!(
                "invalid resource_state tag: {other}"
            ))),
        }
    }
}

/// A latitude/longitude pair.
///
/// Strava serializes these as a two-element array. Empty arrays (which
/// the server sends for activities without GPS data) are handled by
/// [`coerce::optional_latlng`](super::coerce).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Serialize for LatLng {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lat, self.lng].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LatLng {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <[f64; 2]>::deserialize(deserializer)?;
        Ok(LatLng {
            lat: raw[0],
            lng: raw[1],
        })
    }
}

/// A distance in meters, as returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(pub f64);

impl Distance {
    /// The distance in meters.
    pub fn meters(&self) -> f64 {
        self.0
    }
}

/// A velocity in meters per second, as returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Velocity(pub f64);

impl Velocity {
    /// The velocity in meters per second.
    pub fn meters_per_second(&self) -> f64 {
        self.0
    }
}

/// An elapsed or moving time in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSpan(pub i64);

impl TimeSpan {
    /// The interval in seconds.
    pub fn seconds(&self) -> i64 {
        self.0
    }

    /// Convert to a `std::time::Duration`, clamping negatives to zero.
    pub fn as_std(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.0.max(0) as u64)
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_state_round_trip() {
        let state: ResourceState = serde_json::from_str("2").unwrap();
        assert_eq!(state, ResourceState::Summary);
        assert_eq!(serde_json::to_string(&state).unwrap(), "2");
    }

    #[test]
    fn test_resource_state_rejects_unknown_tag() {
        assert!(serde_json::from_str::<ResourceState>("7").is_err());
    }

    #[test]
    fn test_resource_state_ordering() {
        assert!(ResourceState::Meta < ResourceState::Summary);
        assert!(ResourceState::Summary < ResourceState::Detailed);
    }

    #[test]
    fn test_latlng_from_array() {
        let point: LatLng = serde_json::from_str("[37.8, -122.4]").unwrap();
        assert_eq!(point.lat, 37.8);
        assert_eq!(point.lng, -122.4);
    }

    #[test]
    fn test_ids_are_transparent() {
        let id: ActivityId = serde_json::from_str("12345").unwrap();
        assert_eq!(id.value(), 12345);
        assert_eq!(id.to_string(), "12345");
    }

    #[test]
    fn test_timespan() {
        let span = TimeSpan(90);
        assert_eq!(span.as_std(), std::time::Duration::from_secs(90));
    }
}
