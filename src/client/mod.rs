//! The HTTP client: transport, configuration, rate limiting, and
//! pagination.
//!
//! [`StravaClient`] is the entry point. Every request runs the same
//! pipeline: ensure credentials are valid (refreshing once if needed),
//! consult the [`RateLimiter`] and sleep if it says so, attach the
//! bearer token, dispatch, absorb the rate limit headers from the
//! response, then map the status code onto
//! [`Error`](crate::Error) variants or decode the body.

mod config;
mod http;
mod limiter;
mod paginated;

pub use config::ClientConfig;
pub use http::StravaClient;
pub use limiter::{
    LimitPolicy, RateLimitRule, RateLimiter, Window, DEFAULT_DAILY_LIMIT, DEFAULT_SHORT_LIMIT,
};
pub use paginated::{PageStream, DEFAULT_PER_PAGE};

pub(crate) use paginated::PageStreamBuilder;
