//! Typed operation groups over the Strava V3 REST endpoints.
//!
//! Services are cheap handles obtained from a
//! [`StravaClient`](crate::StravaClient):
//!
//! ```no_run
//! # async fn example(client: strava_rs::StravaClient) -> strava_rs::Result<()> {
//! let me = client.athletes().get().await?;
//! let hawk_hill = client.segments().get(229781.into()).await?;
//! # Ok(())
//! # }
//! ```

mod activities;
mod athletes;
mod clubs;
mod gear;
mod segments;

pub use activities::{ActivityListQuery, ActivityService};
pub use athletes::AthleteService;
pub use clubs::ClubService;
pub use gear::GearService;
pub use segments::{SegmentEffortQuery, SegmentService};
