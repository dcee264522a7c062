//! The HTTP transport and the [`StravaClient`] façade.

use chrono::Duration as ChronoDuration;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::{ActivityService, AthleteService, ClubService, GearService, SegmentService};
use crate::auth::Session;
use crate::client::config::ClientConfig;
use crate::client::limiter::RateLimiter;
use crate::models::{self, SummaryAthlete};
use crate::{Error, Result};

/// An authenticated client for the Strava V3 API.
///
/// The client is a cheap handle over shared state (HTTP connection
/// pool, session, rate limiter); clone it freely.
///
/// # Example
///
/// ```no_run
/// use strava_rs::StravaClient;
/// use futures_util::TryStreamExt;
///
/// # async fn example() -> strava_rs::Result<()> {
/// let client = StravaClient::from_access_token("token")?;
/// let me = client.athletes().get().await?;
///
/// let recent: Vec<_> = client
///     .activities()
///     .list(Default::default())
///     .with_limit(10)
///     .try_collect()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StravaClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
    pub(crate) limiter: Mutex<RateLimiter>,
}

impl StravaClient {
    /// Create a client from a bare access token, with default
    /// configuration. The token is used as-is and cannot be refreshed.
    pub fn from_access_token(access_token: impl Into<String>) -> Result<Self> {
        Self::with_session(Session::from_access_token(access_token), ClientConfig::default())
    }

    /// Create a client that refreshes its access token automatically
    /// from stored credentials.
    pub fn with_token_refresh(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: i64,
        client_id: u64,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let session = Session::with_refresh(
            access_token,
            refresh_token,
            expires_at,
            client_id,
            client_secret,
        );
        Self::with_session(session, ClientConfig::default())
    }

    /// Exchange an authorization code for tokens and build a client from
    /// them. Also returns the authorizing athlete when the token
    /// endpoint embeds one.
    pub async fn exchange_code(
        client_id: u64,
        client_secret: &str,
        code: &str,
    ) -> Result<(Self, Option<SummaryAthlete>)> {
        let (session, athlete) = Session::exchange_code(client_id, client_secret, code).await?;
        let client = Self::with_session(session, ClientConfig::default())?;
        Ok((client, athlete))
    }

    /// Create a client by performing an immediate refresh with a stored
    /// refresh token.
    pub async fn from_refresh_token(
        client_id: u64,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Self> {
        let session = Session::from_refresh_token(client_id, client_secret, refresh_token).await?;
        Self::with_session(session, ClientConfig::default())
    }

    /// Create a client from an existing session and configuration.
    pub fn with_session(session: Session, config: ClientConfig) -> Result<Self> {
        Self::with_session_and_limiter(session, config, RateLimiter::new())
    }

    /// Create a client with an explicit rate limiter, e.g.
    /// [`RateLimiter::throttled`] for bulk jobs.
    pub fn with_session_and_limiter(
        session: Session,
        config: ClientConfig,
        limiter: RateLimiter,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        // OAuth traffic shares the configured client and its timeout
        let session = session.with_http_client(http.clone());
        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                session,
                config,
                limiter: Mutex::new(limiter),
            }),
        })
    }

    /// Athlete operations.
    pub fn athletes(&self) -> AthleteService {
        AthleteService::new(self.clone())
    }

    /// Activity operations.
    pub fn activities(&self) -> ActivityService {
        ActivityService::new(self.clone())
    }

    /// Club operations.
    pub fn clubs(&self) -> ClubService {
        ClubService::new(self.clone())
    }

    /// Segment operations.
    pub fn segments(&self) -> SegmentService {
        SegmentService::new(self.clone())
    }

    /// Gear operations.
    pub fn gear(&self) -> GearService {
        GearService::new(self.clone())
    }

    /// The session backing this client.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Revoke this client's grant. Terminal: every subsequent call
    /// through this client fails with an authorization error.
    pub async fn deauthorize(&self) -> Result<()> {
        self.inner.session.deauthorize().await
    }

    /// A snapshot of the rate limiter's current view of both quota
    /// windows.
    pub async fn rate_limits(&self) -> RateLimiter {
        self.inner.limiter.lock().await.clone()
    }
}

impl std::fmt::Debug for StravaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StravaClient")
            .field("api_base_url", &self.inner.config.api_base_url)
            .field("session", &self.inner.session)
            .finish()
    }
}

impl ClientInner {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.get(self.url(path));
        self.send(request, Method::GET).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http.get(self.url(path)).query(query);
        self.send(request, Method::GET).await
    }

    pub(crate) async fn post_form<T, B>(&self, path: &str, form: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.post(self.url(path)).form(form);
        self.send(request, Method::POST).await
    }

    pub(crate) async fn put_form<T, B>(&self, path: &str, form: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.put(self.url(path)).form(form);
        self.send(request, Method::PUT).await
    }

    /// POST with no payload, discarding any response body. For
    /// endpoints like club join/leave that return nothing useful.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<()> {
        let request = self.http.post(self.url(path));
        let response = self.dispatch(request, &Method::POST).await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(classify_error(status, response).await)
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        method: Method,
    ) -> Result<T> {
        let response = self.dispatch(request, &method).await?;
        let status = response.status();
        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return models::decode(Value::Null);
            }
            let body: Value = response.json().await?;
            models::decode(body)
        } else {
            Err(classify_error(status, response).await)
        }
    }

    /// Run the request through the full pipeline: credential check,
    /// rate limit gate, dispatch, limiter update from response headers.
    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
        method: &Method,
    ) -> Result<reqwest::Response> {
        if self.config.auto_refresh_token {
            self.session
                .ensure_valid(ChronoDuration::seconds(self.config.refresh_buffer_secs))
                .await?;
        }

        let wait = { self.limiter.lock().await.check(Utc::now()) };
        if !wait.is_zero() {
            tracing::debug!(wait_secs = wait.as_secs_f64(), "rate limit gate");
            tokio::time::sleep(wait).await;
        }

        let token = self.session.access_token().await;
        let response = request
            .header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            .send()
            .await?;

        // Headers are authoritative even on errors, 429 included
        self.limiter
            .lock()
            .await
            .update_from_headers(response.headers(), method, Utc::now());

        Ok(response)
    }
}

async fn classify_error(status: StatusCode, response: reqwest::Response) -> Error {
    let body: Value = response.json().await.unwrap_or_default();
    let fault = Error::fault_from_body(&body);
    match status {
        StatusCode::UNAUTHORIZED => Error::Authorization(fault.to_string()),
        StatusCode::NOT_FOUND => Error::NotFound(fault.to_string()),
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded { fault },
        _ => Error::from_api_response(status.as_u16(), body),
    }
}
