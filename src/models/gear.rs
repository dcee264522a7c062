//! Gear (bikes and shoes) models.

use serde::{Deserialize, Serialize};

use super::primitives::{Distance, GearId, ResourceState};

/// Summary view of a piece of gear, as embedded in athlete and activity
/// payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryGear {
    /// The gear id.
    pub id: GearId,
    /// Detail tier tag.
    #[serde(default)]
    pub resource_state: Option<ResourceState>,
    /// Whether this is the athlete's default gear.
    #[serde(default)]
    pub primary: Option<bool>,
    /// Display name.
    pub name: String,
    /// Total distance logged with this gear.
    #[serde(default)]
    pub distance: Option<Distance>,
}

/// Full view of a piece of gear, from the gear-by-id endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedGear {
    /// The summary fields.
    #[serde(flatten)]
    pub summary: SummaryGear,
    /// Manufacturer name.
    #[serde(default)]
    pub brand_name: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model_name: Option<String>,
    /// Frame type (bikes only).
    #[serde(default)]
    pub frame_type: Option<i64>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}
