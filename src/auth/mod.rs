//! Authentication and OAuth token management for the Strava API.
//!
//! Strava uses the OAuth2 authorization-code flow. The pieces here:
//!
//! 1. [`authorization_url`] - pure construction of the URL to send a
//!    user to for approval (no network).
//! 2. [`Session::exchange_code`] - trade the code from the redirect for
//!    an access/refresh token pair.
//! 3. [`Session`] - holds the credential state and refreshes expired
//!    access tokens automatically, including refresh-token rotation.
//!
//! ```no_run
//! use strava_rs::auth::{authorization_url, AuthUrlParams, Scope, Session};
//!
//! # async fn example() -> strava_rs::Result<()> {
//! // Step 1: send the user here
//! let url = authorization_url(
//!     12345,
//!     "http://localhost:8282/authorized",
//!     &AuthUrlParams::default().with_scopes([Scope::Read, Scope::ActivityReadAll]),
//! )?;
//!
//! // Step 2: exchange the code from the redirect
//! let (session, athlete) = Session::exchange_code(12345, "secret", "the-code").await?;
//! # Ok(())
//! # }
//! ```

mod session;

pub use session::{Session, TokenInfo, DEFAULT_AUTH_BASE};

use url::Url;

use crate::Result;

/// An OAuth scope token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Read public profile and public data.
    Read,
    /// Read private routes, segments, and events.
    ReadAll,
    /// Read the athlete's complete profile.
    ProfileReadAll,
    /// Update the athlete's profile.
    ProfileWrite,
    /// Read activities visible to "Everyone" and "Followers".
    ActivityRead,
    /// Read all activities, including private ones.
    ActivityReadAll,
    /// Create and update activities.
    ActivityWrite,
}

impl Scope {
    /// The wire representation of the scope token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Read => "read",
            Scope::ReadAll => "read_all",
            Scope::ProfileReadAll => "profile:read_all",
            Scope::ProfileWrite => "profile:write",
            Scope::ActivityRead => "activity:read",
            Scope::ActivityReadAll => "activity:read_all",
            Scope::ActivityWrite => "activity:write",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether to prompt for approval when the user already granted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalPrompt {
    /// Skip the prompt for already-approved applications.
    #[default]
    Auto,
    /// Always show the prompt.
    Force,
}

impl ApprovalPrompt {
    fn as_str(&self) -> &'static str {
        match self {
            ApprovalPrompt::Auto => "auto",
            ApprovalPrompt::Force => "force",
        }
    }
}

/// Optional parameters for [`authorization_url`].
#[derive(Debug, Clone)]
pub struct AuthUrlParams {
    /// Requested scopes, in order. Duplicates are removed at encoding
    /// time. Defaults to `read` + `activity:read`.
    pub scopes: Vec<Scope>,
    /// Approval prompt behavior.
    pub approval_prompt: ApprovalPrompt,
    /// Opaque state returned to the redirect URI.
    pub state: Option<String>,
}

impl Default for AuthUrlParams {
    fn default() -> Self {
        Self {
            scopes: vec![Scope::Read, Scope::ActivityRead],
            approval_prompt: ApprovalPrompt::default(),
            state: None,
        }
    }
}

impl AuthUrlParams {
    /// Replace the requested scopes.
    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    /// Set the approval prompt behavior.
    pub fn with_approval_prompt(mut self, prompt: ApprovalPrompt) -> Self {
        self.approval_prompt = prompt;
        self
    }

    /// Set the state token.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

/// Build the URL that authorizes an application to access a Strava
/// user's data. Pure function: no network call is made.
pub fn authorization_url(
    client_id: u64,
    redirect_uri: &str,
    params: &AuthUrlParams,
) -> Result<String> {
    let mut url = Url::parse(DEFAULT_AUTH_BASE)?.join("/oauth/authorize")?;

    // Deduplicate scopes preserving first-seen order
    let mut scopes: Vec<Scope> = Vec::new();
    for scope in &params.scopes {
        if !scopes.contains(scope) {
            scopes.push(*scope);
        }
    }
    let scope = scopes
        .iter()
        .map(Scope::as_str)
        .collect::<Vec<_>>()
        .join(",");

    url.query_pairs_mut()
        .append_pair("client_id", &client_id.to_string())
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("approval_prompt", params.approval_prompt.as_str())
        .append_pair("scope", &scope);
    if let Some(state) = &params.state {
        url.query_pairs_mut().append_pair("state", state);
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_defaults() {
        let url =
            authorization_url(1234, "http://localhost:8282/authorized", &AuthUrlParams::default())
                .unwrap();
        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("www.strava.com"));
        assert_eq!(parsed.path(), "/oauth/authorize");

        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("client_id".into(), "1234".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("scope".into(), "read,activity:read".into())));
        assert!(pairs.contains(&("approval_prompt".into(), "auto".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "state"));
    }

    #[test]
    fn test_authorization_url_dedups_scopes_in_order() {
        let params = AuthUrlParams::default()
            .with_scopes([
                Scope::ActivityWrite,
                Scope::Read,
                Scope::ActivityWrite,
                Scope::ReadAll,
            ])
            .with_state("csrf-token");
        let url = authorization_url(1234, "https://example.com/cb", &params).unwrap();
        let parsed = Url::parse(&url).unwrap();
        let scope = parsed
            .query_pairs()
            .find(|(k, _)| k == "scope")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(scope, "activity:write,read,read_all");

        let state = parsed
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(state, "csrf-token");
    }

    #[test]
    fn test_redirect_uri_is_encoded() {
        let url = authorization_url(
            1234,
            "http://localhost:8282/authorized?next=/home",
            &AuthUrlParams::default(),
        )
        .unwrap();
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost"));
    }
}
