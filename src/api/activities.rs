//! Activity endpoints.

use chrono::{DateTime, Utc};

use crate::client::{PageStream, PageStreamBuilder, StravaClient};
use crate::models::{
    ActivityId, ActivityUpdate, ClientBound, Comment, DetailedActivity, Lap, NewActivity,
    SummaryActivity, SummaryAthlete,
};
use crate::Result;

/// Time filters for the authenticated athlete's activity list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityListQuery {
    /// Only activities started before this instant.
    pub before: Option<DateTime<Utc>>,
    /// Only activities started after this instant.
    pub after: Option<DateTime<Utc>>,
}

impl ActivityListQuery {
    /// Filter to activities before `instant`.
    pub fn before(mut self, instant: DateTime<Utc>) -> Self {
        self.before = Some(instant);
        self
    }

    /// Filter to activities after `instant`.
    pub fn after(mut self, instant: DateTime<Utc>) -> Self {
        self.after = Some(instant);
        self
    }
}

/// Operations on activities.
#[derive(Debug, Clone)]
pub struct ActivityService {
    client: StravaClient,
}

impl ActivityService {
    pub(crate) fn new(client: StravaClient) -> Self {
        Self { client }
    }

    /// Fetch an activity by id, at the detailed tier.
    ///
    /// `include_all_efforts` asks the server to attach every segment
    /// effort rather than just the notable ones.
    pub async fn get(&self, id: ActivityId, include_all_efforts: bool) -> Result<DetailedActivity> {
        let mut activity: DetailedActivity = self
            .client
            .inner
            .get_with_query(
                &format!("/activities/{id}"),
                &[("include_all_efforts", include_all_efforts)],
            )
            .await?;
        activity.bind(&self.client);
        Ok(activity)
    }

    /// Lazily page through the authenticated athlete's activities,
    /// newest first. The time filters are epoch seconds on the wire.
    pub fn list(&self, query: ActivityListQuery) -> PageStream<SummaryActivity> {
        PageStreamBuilder::new(self.client.clone(), "/athlete/activities")
            .query_opt("before", query.before.map(|t| t.timestamp()))
            .query_opt("after", query.after.map(|t| t.timestamp()))
            .build()
    }

    /// Manually create an activity. Requires the `activity:write`
    /// scope.
    pub async fn create(&self, activity: &NewActivity) -> Result<DetailedActivity> {
        let mut created: DetailedActivity =
            self.client.inner.post_form("/activities", activity).await?;
        created.bind(&self.client);
        Ok(created)
    }

    /// Apply a partial update to an activity. Unset fields are left
    /// unchanged server-side.
    pub async fn update(&self, id: ActivityId, update: &ActivityUpdate) -> Result<DetailedActivity> {
        let mut updated: DetailedActivity = self
            .client
            .inner
            .put_form(&format!("/activities/{id}"), update)
            .await?;
        updated.bind(&self.client);
        Ok(updated)
    }

    /// Lazily page through an activity's comments.
    pub fn comments(&self, id: ActivityId) -> PageStream<Comment> {
        PageStreamBuilder::new(self.client.clone(), format!("/activities/{id}/comments")).build()
    }

    /// Lazily page through the athletes who kudoed an activity.
    pub fn kudos(&self, id: ActivityId) -> PageStream<SummaryAthlete> {
        PageStreamBuilder::new(self.client.clone(), format!("/activities/{id}/kudos")).build()
    }

    /// Lazily page through an activity's laps.
    pub fn laps(&self, id: ActivityId) -> PageStream<Lap> {
        PageStreamBuilder::new(self.client.clone(), format!("/activities/{id}/laps")).build()
    }
}
