//! Defensive field coercions for known server-side schema divergences.
//!
//! Strava's published schema and its actual payloads are known to
//! disagree for a handful of fields. Each helper here exists because the
//! divergence has been observed in practice; everything not listed below
//! validates strictly and fails decoding with a validation error.
//!
//! The compatibility list:
//!
//! 1. `type` / `sport_type` on activities and segments — new vocabulary
//!    values ship server-side first; unknown values map to `Workout`.
//! 2. lat/lng pairs — sent as `[]` (instead of `null`) when absent.
//! 3. `*_local` timestamps — formatted with a `Z` suffix but actually
//!    expressing local wall-clock time; the offset is dropped.
//! 4. `athlete_type` — an undocumented integer enum (0 = cyclist,
//!    1 = runner) that has grown values before.
//!
//! Every fallback logs a `tracing` warning with the offending value so
//! discrepancies remain visible.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::enums::{ActivityType, AthleteType, SportType};
use super::primitives::LatLng;

/// Decode an optional activity type, replacing unknown values with
/// [`ActivityType::Workout`].
pub(crate) fn relaxed_activity_type<'de, D>(
    deserializer: D,
) -> Result<Option<ActivityType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| {
        serde_json::from_value::<ActivityType>(Value::String(s.clone())).unwrap_or_else(|_| {
            tracing::warn!(given = %s, "unexpected activity type, replacing by Workout");
            ActivityType::Workout
        })
    }))
}

/// Decode an optional sport type, replacing unknown values with
/// [`SportType::Workout`].
pub(crate) fn relaxed_sport_type<'de, D>(deserializer: D) -> Result<Option<SportType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| {
        serde_json::from_value::<SportType>(Value::String(s.clone())).unwrap_or_else(|_| {
            tracing::warn!(given = %s, "unexpected sport type, replacing by Workout");
            SportType::Workout
        })
    }))
}

/// Decode a lat/lng pair, treating the server's empty-array placeholder
/// as absent.
pub(crate) fn optional_latlng<'de, D>(deserializer: D) -> Result<Option<LatLng>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<f64>>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some([]) => Ok(None),
        Some(&[lat, lng]) => Ok(Some(LatLng { lat, lng })),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a 2-element lat/lng array, got {} elements",
            other.len()
        ))),
    }
}

/// Decode a local timestamp, keeping the wall-clock reading and dropping
/// whatever offset the server attached.
pub(crate) fn naive_local<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
                return Ok(Some(dt.naive_local()));
            }
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Decode the undocumented integer `athlete_type` field.
pub(crate) fn athlete_type<'de, D>(deserializer: D) -> Result<Option<AthleteType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<u8>::deserialize(deserializer)?;
    Ok(raw.map(|v| match v {
        0 => AthleteType::Cyclist,
        1 => AthleteType::Runner,
        other => {
            tracing::warn!(given = other, "unexpected athlete_type value");
            AthleteType::Other(other)
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct TypeProbe {
        #[serde(default, deserialize_with = "relaxed_activity_type")]
        r#type: Option<ActivityType>,
        #[serde(default, deserialize_with = "relaxed_sport_type")]
        sport_type: Option<SportType>,
    }

    #[derive(Deserialize)]
    struct LocationProbe {
        #[serde(default, deserialize_with = "optional_latlng")]
        start_latlng: Option<LatLng>,
    }

    #[derive(Deserialize)]
    struct TimeProbe {
        #[serde(default, deserialize_with = "naive_local")]
        start_date_local: Option<NaiveDateTime>,
    }

    #[test]
    fn test_unknown_activity_type_falls_back_to_workout() {
        let probe: TypeProbe =
            serde_json::from_str(r#"{"type": "HoverboardRide"}"#).unwrap();
        assert_eq!(probe.r#type, Some(ActivityType::Workout));
    }

    #[test]
    fn test_known_sport_type_passes_through() {
        let probe: TypeProbe =
            serde_json::from_str(r#"{"sport_type": "GravelRide"}"#).unwrap();
        assert_eq!(probe.sport_type, Some(SportType::GravelRide));
    }

    #[test]
    fn test_empty_latlng_is_none() {
        let probe: LocationProbe = serde_json::from_str(r#"{"start_latlng": []}"#).unwrap();
        assert!(probe.start_latlng.is_none());

        let probe: LocationProbe =
            serde_json::from_str(r#"{"start_latlng": [45.5, -122.6]}"#).unwrap();
        assert_eq!(probe.start_latlng.unwrap().lat, 45.5);
    }

    #[test]
    fn test_wrong_arity_latlng_is_an_error() {
        assert!(serde_json::from_str::<LocationProbe>(r#"{"start_latlng": [1.0]}"#).is_err());
    }

    #[test]
    fn test_local_timestamp_drops_offset() {
        let probe: TimeProbe =
            serde_json::from_str(r#"{"start_date_local": "2024-05-02T12:15:09Z"}"#).unwrap();
        let dt = probe.start_date_local.unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "12:15:09");
    }
}
