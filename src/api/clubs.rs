//! Club endpoints.

use crate::client::{PageStream, PageStreamBuilder, StravaClient};
use crate::models::{ClientBound, ClubActivity, ClubId, ClubMember, DetailedClub, SummaryClub};
use crate::Result;

/// Operations on clubs.
#[derive(Debug, Clone)]
pub struct ClubService {
    client: StravaClient,
}

impl ClubService {
    pub(crate) fn new(client: StravaClient) -> Self {
        Self { client }
    }

    /// Fetch a club by id, at the detailed tier.
    pub async fn get(&self, id: ClubId) -> Result<DetailedClub> {
        let mut club: DetailedClub = self.client.inner.get(&format!("/clubs/{id}")).await?;
        club.bind(&self.client);
        Ok(club)
    }

    /// Lazily page through a club's members. Members are redacted to
    /// name fields regardless of their own privacy settings.
    pub fn members(&self, id: ClubId) -> PageStream<ClubMember> {
        PageStreamBuilder::new(self.client.clone(), format!("/clubs/{id}/members")).build()
    }

    /// Lazily page through a club's admins.
    pub fn admins(&self, id: ClubId) -> PageStream<ClubMember> {
        PageStreamBuilder::new(self.client.clone(), format!("/clubs/{id}/admins")).build()
    }

    /// Lazily page through a club's recent activity feed.
    pub fn activities(&self, id: ClubId) -> PageStream<ClubActivity> {
        PageStreamBuilder::new(self.client.clone(), format!("/clubs/{id}/activities")).build()
    }

    /// Lazily page through the authenticated athlete's clubs.
    pub fn mine(&self) -> PageStream<SummaryClub> {
        PageStreamBuilder::new(self.client.clone(), "/athlete/clubs").build()
    }

    /// Join a club on behalf of the authenticated athlete. For private
    /// clubs this registers a membership request.
    pub async fn join(&self, id: ClubId) -> Result<()> {
        self.client
            .inner
            .post_empty(&format!("/clubs/{id}/join"))
            .await
    }

    /// Leave a club on behalf of the authenticated athlete.
    pub async fn leave(&self, id: ClubId) -> Result<()> {
        self.client
            .inner
            .post_empty(&format!("/clubs/{id}/leave"))
            .await
    }
}
