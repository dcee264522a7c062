//! An async, typed client for the Strava V3 API.
//!
//! # Features
//!
//! - **OAuth2 lifecycle**: authorization URL construction, code
//!   exchange, automatic access-token refresh with refresh-token
//!   rotation, deauthorization
//! - **Tiered models**: every entity distinguishes its meta / summary /
//!   detailed view in the type system, so the available fields are
//!   enumerable at compile time
//! - **Lazy pagination**: list endpoints return a [`PageStream`] that
//!   fetches pages on demand and honors an item cap without
//!   over-fetching
//! - **Rate limiting**: both of Strava's quota windows are tracked from
//!   response headers, with a choice of wait-on-exhaustion or
//!   even-pacing policies
//! - **Bound entities**: fetched objects carry a client handle and
//!   expose lazy relationship accessors (`activity.comments()`,
//!   `club.members()`, ...)
//!
//! # Quick start
//!
//! ```no_run
//! use strava_rs::StravaClient;
//! use futures_util::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> strava_rs::Result<()> {
//!     let client = StravaClient::with_token_refresh(
//!         "access-token",
//!         "refresh-token",
//!         1_700_000_000, // expires_at, epoch seconds
//!         12345,         // client id
//!         "client-secret",
//!     )?;
//!
//!     let me = client.athletes().get().await?;
//!     println!("authenticated as {} {}", me.summary.firstname, me.summary.lastname);
//!
//!     let mut activities = client.activities().list(Default::default()).with_limit(30);
//!     while let Some(activity) = activities.try_next().await? {
//!         println!("{}: {:.1} km", activity.name, activity.distance.meters() / 1000.0);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # First-time authorization
//!
//! ```no_run
//! use strava_rs::auth::{authorization_url, AuthUrlParams, Scope};
//! use strava_rs::StravaClient;
//!
//! # async fn example() -> strava_rs::Result<()> {
//! let url = authorization_url(
//!     12345,
//!     "http://localhost:8282/authorized",
//!     &AuthUrlParams::default().with_scopes([Scope::Read, Scope::ActivityReadAll]),
//! )?;
//! println!("visit: {url}");
//!
//! // ... after the redirect delivers ?code=...
//! let (client, athlete) = StravaClient::exchange_code(12345, "secret", "the-code").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use auth::{authorization_url, AuthUrlParams, Scope, Session};
pub use client::{ClientConfig, PageStream, RateLimiter, StravaClient};
pub use error::{Error, Fault, Result};

/// Convenience re-exports for the common path.
pub mod prelude {
    pub use crate::api::ActivityListQuery;
    pub use crate::auth::{authorization_url, AuthUrlParams, Scope, Session};
    pub use crate::client::{ClientConfig, PageStream, RateLimiter, StravaClient};
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use futures_util::TryStreamExt as _;
}
