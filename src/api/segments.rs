//! Segment endpoints.

use chrono::{DateTime, Utc};

use crate::client::{PageStream, PageStreamBuilder, StravaClient};
use crate::models::{
    ActivityType, Bounds, ClientBound, DetailedSegment, ExplorerResponse, ExplorerSegment,
    SegmentEffort, SegmentId, SummarySegment,
};
use crate::Result;

/// Filters for a segment's effort listing. All efforts belong to the
/// authenticated athlete; the endpoint requires a Strava subscription.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentEffortQuery {
    /// Only efforts on or after this day.
    pub start_date: Option<DateTime<Utc>>,
    /// Only efforts on or before this day.
    pub end_date: Option<DateTime<Utc>>,
}

/// Operations on segments.
#[derive(Debug, Clone)]
pub struct SegmentService {
    client: StravaClient,
}

impl SegmentService {
    pub(crate) fn new(client: StravaClient) -> Self {
        Self { client }
    }

    /// Fetch a segment by id, at the detailed tier.
    pub async fn get(&self, id: SegmentId) -> Result<DetailedSegment> {
        let mut segment: DetailedSegment =
            self.client.inner.get(&format!("/segments/{id}")).await?;
        segment.bind(&self.client);
        Ok(segment)
    }

    /// Lazily page through the segments the authenticated athlete has
    /// starred.
    pub fn starred(&self) -> PageStream<SummarySegment> {
        PageStreamBuilder::new(self.client.clone(), "/segments/starred").build()
    }

    /// Lazily page through the authenticated athlete's efforts on a
    /// segment.
    pub fn efforts(&self, id: SegmentId, query: SegmentEffortQuery) -> PageStream<SegmentEffort> {
        PageStreamBuilder::new(self.client.clone(), format!("/segments/{id}/all_efforts"))
            .query_opt("start_date_local", query.start_date.map(|t| t.to_rfc3339()))
            .query_opt("end_date_local", query.end_date.map(|t| t.to_rfc3339()))
            .build()
    }

    /// Find popular segments within a bounding box. Returns at most ten
    /// results; the endpoint does not paginate.
    pub async fn explore(
        &self,
        bounds: Bounds,
        activity_type: Option<ActivityType>,
    ) -> Result<Vec<ExplorerSegment>> {
        let mut query = vec![("bounds".to_string(), bounds.to_query())];
        if let Some(activity_type) = activity_type {
            // The explorer only distinguishes riding from running
            let filter = match activity_type {
                ActivityType::Run => "running",
                _ => "riding",
            };
            query.push(("activity_type".to_string(), filter.to_string()));
        }

        let response: ExplorerResponse = self
            .client
            .inner
            .get_with_query("/segments/explore", &query)
            .await?;
        let mut segments = response.segments;
        for segment in &mut segments {
            segment.bind(&self.client);
        }
        Ok(segments)
    }
}
