//! Client-side rate limiting for the Strava API.
//!
//! Strava enforces two concurrent request quotas: a short window that
//! resets on every quarter hour (xx:00, xx:15, xx:30, xx:45 UTC) and a
//! daily window that resets at UTC midnight. Every response reports the
//! authoritative usage and limit for both windows in headers; the
//! limiter starts from documented defaults and then tracks whatever the
//! server says.
//!
//! Two policies are available per window: [`LimitPolicy::Wait`] sleeps
//! only when a window is exhausted, until it resets;
//! [`LimitPolicy::Throttle`] spreads the remaining quota evenly over the
//! time left in the window, trading latency for never hitting the
//! ceiling.

use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use reqwest::header::HeaderMap;
use reqwest::Method;
use std::time::Duration;

/// Default short-window (15 minute) request limit for a free app.
pub const DEFAULT_SHORT_LIMIT: u32 = 600;
/// Default daily request limit for a free app.
pub const DEFAULT_DAILY_LIMIT: u32 = 30_000;

/// One of the two quota windows Strava tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The 15-minute window, resetting on each quarter hour.
    Short,
    /// The 24-hour window, resetting at UTC midnight.
    Daily,
}

impl Window {
    /// Seconds from `now` until this window next resets.
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> i64 {
        match self {
            // 899 = one second short of a full quarter hour, so a
            // request issued exactly at a boundary waits the whole
            // window rather than zero.
            Window::Short => {
                let into_quarter = i64::from(now.minute() % 15) * 60 + i64::from(now.second());
                899 - into_quarter
            }
            Window::Daily => {
                let next_midnight = (now + ChronoDuration::days(1))
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .expect("midnight is always a valid time")
                    .and_utc();
                (next_midnight - now).num_seconds()
            }
        }
    }

    /// The instant the window containing `now` began.
    pub fn current_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Window::Short => {
                let into_quarter = i64::from(now.minute() % 15) * 60 + i64::from(now.second());
                now - ChronoDuration::seconds(into_quarter)
                    - ChronoDuration::nanoseconds(i64::from(now.nanosecond()))
            }
            Window::Daily => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always a valid time")
                .and_utc(),
        }
    }
}

/// How a window's remaining quota translates into waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitPolicy {
    /// Wait only when the window is exhausted, until it resets.
    Wait,
    /// Pace requests so the remaining quota lasts until the reset.
    Throttle,
}

/// Usage tracking for a single quota window.
#[derive(Debug, Clone)]
pub struct RateLimitRule {
    /// Which window this rule tracks.
    pub window: Window,
    /// The waiting policy.
    pub policy: LimitPolicy,
    /// Request ceiling for the window. Overwritten by server headers.
    pub limit: u32,
    /// Requests already spent in the window. Overwritten by server
    /// headers.
    pub usage: u32,
    /// When `usage` was last reported. Usage from a window that has
    /// since reset no longer counts.
    pub observed_at: Option<DateTime<Utc>>,
}

impl RateLimitRule {
    /// A rule with the documented default limit for its window.
    pub fn new(window: Window, policy: LimitPolicy) -> Self {
        let limit = match window {
            Window::Short => DEFAULT_SHORT_LIMIT,
            Window::Daily => DEFAULT_DAILY_LIMIT,
        };
        Self {
            window,
            policy,
            limit,
            usage: 0,
            observed_at: None,
        }
    }

    /// A rule with an explicit limit, for paid tiers.
    pub fn with_limit(window: Window, policy: LimitPolicy, limit: u32) -> Self {
        Self {
            window,
            policy,
            limit,
            usage: 0,
            observed_at: None,
        }
    }

    /// The usage that still counts at `now`: counts reported before the
    /// current window began belong to a window that has reset.
    fn current_usage(&self, now: DateTime<Utc>) -> u32 {
        match self.observed_at {
            Some(observed) if observed < self.window.current_start(now) => 0,
            _ => self.usage,
        }
    }

    fn wait_time(&self, now: DateTime<Utc>, last_request: Option<DateTime<Utc>>) -> f64 {
        let reset_secs = self.window.seconds_until_reset(now).max(0) as f64;
        let usage = self.current_usage(now);
        if usage >= self.limit {
            return reset_secs;
        }
        match self.policy {
            LimitPolicy::Wait => 0.0,
            LimitPolicy::Throttle => {
                let pace = reset_secs / f64::from(self.limit - usage);
                let elapsed = last_request
                    .map(|t| (now - t).num_milliseconds() as f64 / 1000.0)
                    .unwrap_or(f64::INFINITY);
                (pace - elapsed).max(0.0)
            }
        }
    }
}

/// Tracks both quota windows and decides how long to wait before each
/// request.
///
/// The limiter is advisory: it never drops a request, it only delays.
/// Server headers are authoritative, so after the first response the
/// local counters always reflect what the server last reported.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    rules: Vec<RateLimitRule>,
    last_request: Option<DateTime<Utc>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// A limiter that waits only when a window is exhausted. This is
    /// the default used by [`StravaClient`](crate::StravaClient).
    pub fn new() -> Self {
        Self::with_rules(vec![
            RateLimitRule::new(Window::Short, LimitPolicy::Wait),
            RateLimitRule::new(Window::Daily, LimitPolicy::Wait),
        ])
    }

    /// A limiter that paces requests evenly over the short window,
    /// suitable for long-running bulk jobs.
    pub fn throttled() -> Self {
        Self::with_rules(vec![
            RateLimitRule::new(Window::Short, LimitPolicy::Throttle),
            RateLimitRule::new(Window::Daily, LimitPolicy::Wait),
        ])
    }

    /// A limiter with caller-supplied rules.
    pub fn with_rules(rules: Vec<RateLimitRule>) -> Self {
        Self {
            rules,
            last_request: None,
        }
    }

    /// Compute how long the next request should wait, and record `now`
    /// as the request instant.
    ///
    /// Returns the longest wait demanded by any rule.
    pub fn check(&mut self, now: DateTime<Utc>) -> Duration {
        let wait = self
            .rules
            .iter()
            .map(|rule| rule.wait_time(now, self.last_request))
            .fold(0.0_f64, f64::max);
        self.last_request = Some(now);
        if wait > 0.0 {
            Duration::from_secs_f64(wait)
        } else {
            Duration::ZERO
        }
    }

    /// Absorb the usage/limit headers from a response received at
    /// `now`.
    ///
    /// GET requests prefer the read-only quota headers
    /// (`X-ReadRateLimit-*`) when present, falling back to the overall
    /// ones (`X-RateLimit-*`). Each header carries a comma-separated
    /// `short,daily` pair. Missing or malformed headers leave the local
    /// state untouched. The observation instant is recorded per rule so
    /// counts stop applying once their window resets.
    pub fn update_from_headers(&mut self, headers: &HeaderMap, method: &Method, now: DateTime<Utc>) {
        let read_pair = (*method == Method::GET)
            .then(|| parse_pair(headers, "x-readratelimit-usage", "x-readratelimit-limit"))
            .flatten();
        let pair = read_pair.or_else(|| parse_pair(headers, "x-ratelimit-usage", "x-ratelimit-limit"));

        let Some((usage, limit)) = pair else {
            tracing::warn!("response carried no parsable rate limit headers");
            return;
        };

        for rule in &mut self.rules {
            let idx = match rule.window {
                Window::Short => 0,
                Window::Daily => 1,
            };
            rule.usage = usage[idx];
            rule.limit = limit[idx];
            rule.observed_at = Some(now);
        }
    }

    /// Requests still available in the given window, by the local view.
    pub fn remaining(&self, window: Window) -> Option<u32> {
        self.rules
            .iter()
            .find(|rule| rule.window == window)
            .map(|rule| rule.limit.saturating_sub(rule.usage))
    }

    /// The rules as last updated.
    pub fn rules(&self) -> &[RateLimitRule] {
        &self.rules
    }
}

/// Parse a `short,daily` pair out of a usage header and its matching
/// limit header. `None` when either is missing or malformed.
fn parse_pair(headers: &HeaderMap, usage_name: &str, limit_name: &str) -> Option<([u32; 2], [u32; 2])> {
    let usage = parse_window_pair(headers, usage_name)?;
    let limit = parse_window_pair(headers, limit_name)?;
    Some((usage, limit))
}

fn parse_window_pair(headers: &HeaderMap, name: &str) -> Option<[u32; 2]> {
    let raw = headers.get(name)?.to_str().ok()?;
    let mut parts = raw.split(',').map(|p| p.trim().parse::<u32>());
    match (parts.next(), parts.next()) {
        (Some(Ok(short)), Some(Ok(daily))) => Some([short, daily]),
        _ => {
            tracing::warn!(header = name, value = raw, "malformed rate limit header");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, s).unwrap()
    }

    fn headers(usage: &str, limit: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert("X-RateLimit-Usage", HeaderValue::from_str(usage).unwrap());
        map.insert("X-RateLimit-Limit", HeaderValue::from_str(limit).unwrap());
        map
    }

    #[test]
    fn test_short_window_reset_seconds() {
        // One second into a quarter hour: almost the whole window left
        assert_eq!(Window::Short.seconds_until_reset(at(10, 15, 1)), 898);
        // Exactly at a boundary: the full window
        assert_eq!(Window::Short.seconds_until_reset(at(10, 30, 0)), 899);
        // One second before a boundary
        assert_eq!(Window::Short.seconds_until_reset(at(10, 44, 59)), 0);
    }

    #[test]
    fn test_daily_window_resets_at_utc_midnight() {
        assert_eq!(Window::Daily.seconds_until_reset(at(23, 59, 59)), 1);
        assert_eq!(Window::Daily.seconds_until_reset(at(0, 0, 0)), 86_400);
    }

    #[test]
    fn test_under_limit_does_not_wait() {
        let mut limiter = RateLimiter::new();
        assert_eq!(limiter.check(at(10, 0, 0)), Duration::ZERO);
    }

    #[test]
    fn test_exhausted_window_waits_until_reset() {
        let mut limiter = RateLimiter::new();
        limiter.update_from_headers(&headers("600,1234", "600,30000"), &Method::GET, at(10, 13, 0));
        let wait = limiter.check(at(10, 14, 0));
        // 59 seconds to the 10:15 boundary
        assert_eq!(wait, Duration::from_secs(59));
    }

    #[test]
    fn test_exhaustion_clears_once_the_window_resets() {
        let mut limiter = RateLimiter::new();
        limiter.update_from_headers(&headers("600,1234", "600,30000"), &Method::GET, at(10, 14, 0));
        // 10:15 began a fresh window; the counts from 10:14 no longer apply
        assert_eq!(limiter.check(at(10, 20, 0)), Duration::ZERO);
    }

    #[test]
    fn test_stale_daily_exhaustion_clears_at_midnight() {
        let mut limiter = RateLimiter::new();
        limiter.update_from_headers(
            &headers("10,30000", "600,30000"),
            &Method::GET,
            at(23, 50, 0),
        );
        let next_day = at(0, 10, 0) + ChronoDuration::days(1);
        assert_eq!(limiter.check(next_day), Duration::ZERO);
    }

    #[test]
    fn test_server_headers_override_local_counts() {
        let mut limiter = RateLimiter::new();
        limiter.update_from_headers(&headers("5,100", "600,30000"), &Method::GET, at(10, 0, 0));
        assert_eq!(limiter.remaining(Window::Short), Some(595));
        assert_eq!(limiter.remaining(Window::Daily), Some(29_900));

        // Later headers win, even if they go backwards
        limiter.update_from_headers(&headers("3,50", "600,30000"), &Method::GET, at(10, 0, 1));
        assert_eq!(limiter.remaining(Window::Short), Some(597));
    }

    #[test]
    fn test_headers_can_raise_the_limit() {
        let mut limiter = RateLimiter::new();
        limiter.update_from_headers(
            &headers("100,2000", "2000,100000"),
            &Method::GET,
            at(10, 0, 0),
        );
        assert_eq!(limiter.remaining(Window::Short), Some(1900));
        assert_eq!(limiter.remaining(Window::Daily), Some(98_000));
    }

    #[test]
    fn test_read_headers_preferred_for_get() {
        let mut map = headers("500,20000", "600,30000");
        map.insert("X-ReadRateLimit-Usage", HeaderValue::from_static("10,100"));
        map.insert(
            "X-ReadRateLimit-Limit",
            HeaderValue::from_static("300,15000"),
        );

        let mut limiter = RateLimiter::new();
        limiter.update_from_headers(&map, &Method::GET, at(10, 0, 0));
        assert_eq!(limiter.remaining(Window::Short), Some(290));

        // Non-GET ignores the read-only headers
        let mut limiter = RateLimiter::new();
        limiter.update_from_headers(&map, &Method::POST, at(10, 0, 0));
        assert_eq!(limiter.remaining(Window::Short), Some(100));
    }

    #[test]
    fn test_malformed_headers_keep_state() {
        let mut limiter = RateLimiter::new();
        limiter.update_from_headers(&headers("42,100", "600,30000"), &Method::GET, at(10, 0, 0));
        limiter.update_from_headers(&headers("nonsense", "600,30000"), &Method::GET, at(10, 0, 1));
        assert_eq!(limiter.remaining(Window::Short), Some(558));

        limiter.update_from_headers(&HeaderMap::new(), &Method::GET, at(10, 0, 2));
        assert_eq!(limiter.remaining(Window::Short), Some(558));
    }

    #[test]
    fn test_throttle_paces_requests() {
        let mut limiter = RateLimiter::throttled();
        // 2 requests left, 59 seconds to the reset: pace is ~29.5s
        limiter.update_from_headers(&headers("598,100", "600,30000"), &Method::GET, at(10, 13, 59));
        let first = limiter.check(at(10, 14, 0));
        // First request after an idle period goes straight through
        assert_eq!(first, Duration::ZERO);

        let second = limiter.check(at(10, 14, 1));
        assert!(second > Duration::from_secs(25), "got {second:?}");
        assert!(second < Duration::from_secs(30), "got {second:?}");
    }

    #[test]
    fn test_throttle_ignores_counts_from_a_previous_window() {
        let mut limiter = RateLimiter::throttled();
        limiter.update_from_headers(&headers("598,100", "600,30000"), &Method::GET, at(10, 14, 0));

        // A window boundary passed; pacing restarts from zero usage
        limiter.check(at(10, 20, 0));
        let wait = limiter.check(at(10, 20, 1));
        // 599 seconds left over 600 requests is under a second of pace
        assert!(wait < Duration::from_secs(1), "got {wait:?}");
    }

    #[test]
    fn test_window_current_start() {
        assert_eq!(Window::Short.current_start(at(10, 20, 30)), at(10, 15, 0));
        assert_eq!(Window::Short.current_start(at(10, 15, 0)), at(10, 15, 0));
        assert_eq!(Window::Daily.current_start(at(23, 59, 59)), at(0, 0, 0));
    }
}
