//! Credential state and OAuth token lifecycle.

use chrono::{DateTime, Duration, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::SummaryAthlete;
use crate::{Error, Result};

/// Default base URL for Strava's OAuth endpoints.
pub const DEFAULT_AUTH_BASE: &str = "https://www.strava.com";

/// OAuth credential state for the Strava API.
///
/// The session owns the access token, the optional refresh credentials,
/// and the expiry instant, and refreshes expired access tokens on
/// demand. Refresh-token rotation is handled: the token returned by each
/// refresh replaces the stored one, since Strava may invalidate the
/// previous token at any refresh.
///
/// # Thread safety
///
/// `Session` can be shared across tasks; token state is guarded by an
/// internal lock. Two tasks refreshing concurrently resolve as
/// last-write-wins, which is acceptable because both writes carry valid
/// server-issued tokens.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
    http: reqwest::Client,
}

struct SessionInner {
    access_token: SecretString,
    expires_at: Option<DateTime<Utc>>,
    refresh_token: Option<SecretString>,
    client_id: Option<u64>,
    client_secret: Option<SecretString>,
    revoked: bool,
    auth_base: String,
}

/// A snapshot of the session's token state, for persisting between
/// runs. Secrets are exposed deliberately; store it securely.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// The current access token.
    pub access_token: String,
    /// The current refresh token, if the session is refreshable.
    pub refresh_token: Option<String>,
    /// Expiry as seconds since the epoch, when known.
    pub expires_at: Option<i64>,
}

impl Session {
    /// Create a session from a bare access token.
    ///
    /// The session cannot refresh itself; once the token expires, calls
    /// fail with an authorization error.
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self::build(
            access_token.into(),
            None,
            None,
            None,
            None,
            DEFAULT_AUTH_BASE.to_string(),
        )
    }

    /// Create a refreshable session from previously stored tokens.
    ///
    /// `expires_at` is seconds since the epoch, as returned by the token
    /// endpoint.
    pub fn with_refresh(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: i64,
        client_id: u64,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::build(
            access_token.into(),
            Some(SecretString::from(refresh_token.into())),
            Utc.timestamp_opt(expires_at, 0).single(),
            Some(client_id),
            Some(SecretString::from(client_secret.into())),
            DEFAULT_AUTH_BASE.to_string(),
        )
    }

    /// Exchange a temporary authorization code (from the redirect off
    /// [`authorization_url`](super::authorization_url)) for a token
    /// pair.
    ///
    /// Strava's token endpoint also returns a summary view of the
    /// authorizing athlete; it is surfaced rather than discarded.
    pub async fn exchange_code(
        client_id: u64,
        client_secret: &str,
        code: &str,
    ) -> Result<(Self, Option<SummaryAthlete>)> {
        Self::exchange_code_with_base(DEFAULT_AUTH_BASE, client_id, client_secret, code).await
    }

    /// [`exchange_code`](Self::exchange_code) against a non-default
    /// OAuth server, e.g. a test double.
    pub async fn exchange_code_with_base(
        auth_base: impl Into<String>,
        client_id: u64,
        client_secret: &str,
        code: &str,
    ) -> Result<(Self, Option<SummaryAthlete>)> {
        let auth_base = auth_base.into();
        let http = default_http_client();
        let response = token_request(
            &http,
            &auth_base,
            &[
                ("client_id", client_id.to_string().as_str()),
                ("client_secret", client_secret),
                ("code", code),
                ("grant_type", "authorization_code"),
            ],
        )
        .await?;

        let athlete = response.athlete.clone();
        let session = Self::build(
            response.access_token,
            Some(SecretString::from(response.refresh_token)),
            Utc.timestamp_opt(response.expires_at, 0).single(),
            Some(client_id),
            Some(SecretString::from(client_secret.to_string())),
            auth_base,
        );
        Ok((session, athlete))
    }

    /// Create a session by performing an immediate refresh with a stored
    /// refresh token.
    pub async fn from_refresh_token(
        client_id: u64,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Self> {
        let session = Self::with_refresh("", refresh_token, 0, client_id, client_secret);
        session.refresh().await?;
        Ok(session)
    }

    /// Override the OAuth base URL. Intended for tests.
    pub async fn set_auth_base(&self, base: impl Into<String>) {
        self.inner.write().await.auth_base = base.into();
    }

    /// Replace the HTTP client used for OAuth traffic, so token
    /// requests share the caller's timeout and connection pool.
    pub(crate) fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn build(
        access_token: String,
        refresh_token: Option<SecretString>,
        expires_at: Option<DateTime<Utc>>,
        client_id: Option<u64>,
        client_secret: Option<SecretString>,
        auth_base: String,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                access_token: SecretString::from(access_token),
                expires_at,
                refresh_token,
                client_id,
                client_secret,
                revoked: false,
                auth_base,
            })),
            http: default_http_client(),
        }
    }

    /// Check if the access token is known to be expired.
    ///
    /// Sessions without a known expiry never report expired; automatic
    /// refresh requires the expiry to have been supplied.
    pub async fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero()).await
    }

    /// Check if the access token expires within the given buffer.
    pub async fn expires_within(&self, buffer: Duration) -> bool {
        let inner = self.inner.read().await;
        match inner.expires_at {
            Some(expires_at) => Utc::now() + buffer >= expires_at,
            None => false,
        }
    }

    /// Whether the session holds the credentials needed to refresh.
    pub async fn can_refresh(&self) -> bool {
        let inner = self.inner.read().await;
        inner.refresh_token.is_some() && inner.client_id.is_some() && inner.client_secret.is_some()
    }

    /// Refresh the access token.
    ///
    /// On success, access token, refresh token, and expiry are updated
    /// together; on any failure the stored state is left exactly as it
    /// was. The refresh token from the response always replaces the
    /// stored one (single-use rotation).
    pub async fn refresh(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.revoked {
            return Err(Error::Authorization("session has been deauthorized".into()));
        }

        let (client_id, client_secret, refresh_token) = match (
            inner.client_id,
            &inner.client_secret,
            &inner.refresh_token,
        ) {
            (Some(id), Some(secret), Some(token)) => (
                id,
                secret.expose_secret().to_string(),
                token.expose_secret().to_string(),
            ),
            _ => {
                return Err(Error::Authorization(
                    "session has no refresh credentials; supply client id, secret, and refresh token"
                        .into(),
                ))
            }
        };

        let response = token_request(
            &self.http,
            &inner.auth_base,
            &[
                ("client_id", client_id.to_string().as_str()),
                ("client_secret", &client_secret),
                ("refresh_token", &refresh_token),
                ("grant_type", "refresh_token"),
            ],
        )
        .await?;

        inner.access_token = SecretString::from(response.access_token);
        inner.refresh_token = Some(SecretString::from(response.refresh_token));
        inner.expires_at = Utc.timestamp_opt(response.expires_at, 0).single();
        Ok(())
    }

    /// Ensure the session is usable, refreshing at most once when the
    /// token is expired (or expires within `buffer`) and refresh
    /// credentials are present.
    ///
    /// A failed refresh surfaces as
    /// [`Error::Authorization`](crate::Error::Authorization) so the
    /// caller sees one error kind for all credential problems.
    pub async fn ensure_valid(&self, buffer: Duration) -> Result<()> {
        if self.inner.read().await.revoked {
            return Err(Error::Authorization("session has been deauthorized".into()));
        }
        if self.expires_within(buffer).await && self.can_refresh().await {
            tracing::debug!("access token expired, refreshing");
            self.refresh().await.map_err(|e| match e {
                err @ Error::Authorization(_) => err,
                other => Error::Authorization(format!("token refresh failed: {other}")),
            })?;
        }
        Ok(())
    }

    /// Revoke this session's grant server-side.
    ///
    /// Terminal: afterwards every call through this session fails with
    /// an authorization error. Revoking an already-revoked token maps
    /// the server's response to a normal API error.
    pub async fn deauthorize(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        let url = format!("{}/oauth/deauthorize", inner.auth_base);

        let response = self
            .http
            .post(&url)
            .form(&[("access_token", inner.access_token.expose_secret())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            return Err(Error::from_api_response(status, body));
        }

        inner.revoked = true;
        Ok(())
    }

    /// Get the current access token.
    pub(crate) async fn access_token(&self) -> SecretString {
        self.inner.read().await.access_token.clone()
    }

    /// Snapshot the current token state for persistence.
    pub async fn token_info(&self) -> TokenInfo {
        let inner = self.inner.read().await;
        TokenInfo {
            access_token: inner.access_token.expose_secret().to_string(),
            refresh_token: inner
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            expires_at: inner.expires_at.map(|t| t.timestamp()),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// The client used for OAuth traffic when none is injected. Carries a
/// timeout so a stalled token endpoint cannot hang a refresh forever.
fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap_or_default()
}

async fn token_request(
    http: &reqwest::Client,
    auth_base: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let url = format!("{auth_base}/oauth/token");
    let response = http.post(&url).form(form).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let fault = Error::fault_from_body(&body);
        return Err(Error::Authorization(format!(
            "token request failed ({status}): {fault}"
        )));
    }

    Ok(response.json().await?)
}

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_at: i64,
    #[serde(default)]
    #[allow(dead_code)]
    expires_in: Option<i64>,
    /// Undocumented: the token-exchange response embeds the authorizing
    /// athlete on some server versions.
    #[serde(default)]
    athlete: Option<SummaryAthlete>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::from_access_token("super-secret-token");
        let debug_str = format!("{session:?}");
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_expiry_checks() {
        let past = Utc::now().timestamp() - 60;
        let session = Session::with_refresh("t", "r", past, 1234, "secret");
        assert!(session.is_expired().await);
        assert!(session.can_refresh().await);

        // No known expiry means never locally expired
        let bare = Session::from_access_token("t");
        assert!(!bare.is_expired().await);
        assert!(!bare.can_refresh().await);
    }

    #[tokio::test]
    async fn test_refresh_without_credentials_is_auth_error() {
        let session = Session::from_access_token("t");
        match session.refresh().await {
            Err(Error::Authorization(msg)) => assert!(msg.contains("refresh credentials")),
            other => panic!("expected authorization error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_token_info_snapshot() {
        let session = Session::with_refresh("access", "refresh", 1_700_000_000, 1, "s");
        let info = session.token_info().await;
        assert_eq!(info.access_token, "access");
        assert_eq!(info.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(info.expires_at, Some(1_700_000_000));
    }
}
