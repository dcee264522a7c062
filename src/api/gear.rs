//! Gear endpoints.

use crate::client::StravaClient;
use crate::models::{DetailedGear, GearId};
use crate::Result;

/// Operations on gear (bikes and shoes).
#[derive(Debug, Clone)]
pub struct GearService {
    client: StravaClient,
}

impl GearService {
    pub(crate) fn new(client: StravaClient) -> Self {
        Self { client }
    }

    /// Fetch a piece of gear by id, at the detailed tier. Gear ids are
    /// prefixed strings (`b`ike / `g`ear), e.g. `"b105763"`.
    pub async fn get(&self, id: &GearId) -> Result<DetailedGear> {
        self.client.inner.get(&format!("/gear/{id}")).await
    }
}
