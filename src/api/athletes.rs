//! Athlete endpoints.

use crate::client::{PageStream, PageStreamBuilder, StravaClient};
use crate::models::{AthleteId, AthleteStats, ClientBound, DetailedAthlete, SummaryClub};
use crate::Result;

/// Operations on athletes. The Strava API only exposes the detailed
/// view of the authenticated athlete; other athletes surface indirectly
/// through activities, efforts, and clubs.
#[derive(Debug, Clone)]
pub struct AthleteService {
    client: StravaClient,
}

impl AthleteService {
    pub(crate) fn new(client: StravaClient) -> Self {
        Self { client }
    }

    /// Fetch the authenticated athlete, at the detailed tier.
    pub async fn get(&self) -> Result<DetailedAthlete> {
        let mut athlete: DetailedAthlete = self.client.inner.get("/athlete").await?;
        athlete.bind(&self.client);
        Ok(athlete)
    }

    /// Update the authenticated athlete's weight, in kilograms.
    /// Requires the `profile:write` scope.
    pub async fn update_weight(&self, weight: f64) -> Result<DetailedAthlete> {
        let mut athlete: DetailedAthlete = self
            .client
            .inner
            .put_form("/athlete", &[("weight", weight)])
            .await?;
        athlete.bind(&self.client);
        Ok(athlete)
    }

    /// Fetch activity statistics for an athlete. Only the authenticated
    /// athlete's id is accepted by the server.
    pub async fn stats(&self, id: AthleteId) -> Result<AthleteStats> {
        self.client
            .inner
            .get(&format!("/athletes/{id}/stats"))
            .await
    }

    /// Lazily page through the clubs the authenticated athlete belongs
    /// to.
    pub fn clubs(&self) -> PageStream<SummaryClub> {
        PageStreamBuilder::new(self.client.clone(), "/athlete/clubs").build()
    }
}
