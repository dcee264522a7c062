//! Data models for the Strava API.
//!
//! Every domain object comes in up to three detail tiers, mirroring the
//! server's `resource_state` tag: *meta* (id only), *summary*
//! (public-safe subset), *detailed* (owner-only full view). Tiers are
//! modeled by composition: each summary record embeds its meta record,
//! each detailed record embeds its summary record, so the field set of a
//! tier is enumerable from the type alone.
//!
//! Entities fetched through a [`StravaClient`](crate::StravaClient) are
//! *bound*: they carry a handle back to the client and expose lazy
//! accessors (`comments()`, `members()`, `fetch_detailed()`, ...) that
//! perform I/O on demand. Entities decoded directly from JSON are
//! unbound and return [`Error::Usage`](crate::Error::Usage) from those
//! accessors.
//!
//! Modules by domain:
//!
//! - [`primitives`] - ids, `ResourceState`, scalar quantity newtypes
//! - [`enums`] - activity/sport vocabularies and small enums
//! - [`athlete`], [`activity`], [`club`], [`segment`], [`gear`] - the
//!   entity families

pub mod activity;
pub mod athlete;
pub mod club;
pub(crate) mod coerce;
pub mod enums;
pub mod gear;
pub mod primitives;
pub mod segment;

pub use activity::*;
pub use athlete::*;
pub use club::*;
pub use enums::*;
pub use gear::*;
pub use primitives::*;
pub use segment::*;

use serde::de::DeserializeOwned;

use crate::client::StravaClient;
use crate::{Error, Result};

/// An entity that can be attached to a live client after decoding,
/// enabling its lazy relationship accessors.
///
/// Binding is recursive: a bound activity also binds its embedded
/// athlete, a bound detailed athlete binds its clubs, and so on.
pub trait ClientBound {
    /// Attach a non-owning handle to `client` to this entity and its
    /// nested sub-entities.
    fn bind(&mut self, client: &StravaClient);
}

/// Decode a raw JSON value into a typed entity.
///
/// The target type selects the detail tier; a payload missing a field
/// the tier requires fails with
/// [`Error::Validation`](crate::Error::Validation). Decoding is a pure
/// function of its input.
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_maps_missing_fields_to_validation() {
        let err = decode::<SummaryAthlete>(serde_json::json!({"id": 1})).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_decode_meta_tier() {
        let athlete: MetaAthlete = decode(serde_json::json!({"id": 42})).unwrap();
        assert_eq!(athlete.id.value(), 42);
        assert!(athlete.resource_state.is_none());
    }
}
