use crate::shared::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

/// OIDC client-credentials settings for the archive API.
#[derive(Debug, Clone)]
pub struct OidcClientCredentials {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// In-memory bearer token cache with single-flight refresh.
///
/// Tokens are fetched lazily on first use and reused until they come
/// within [`TokenCache::REFRESH_MARGIN_SECONDS`] of expiry. The cache
/// slot lives behind an async mutex, so when many concurrent uploads
/// find the token stale at once, exactly one of them performs the
/// refresh and the rest reuse its result.
pub struct TokenCache {
    credentials: OidcClientCredentials,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Tokens are treated as expired this many seconds early, so an
    /// upload never starts with a token about to lapse mid-request.
    const REFRESH_MARGIN_SECONDS: i64 = 60;

    pub fn new(credentials: OidcClientCredentials, client: reqwest::Client) -> Self {
        Self {
            credentials,
            client,
            token: Mutex::new(None),
        }
    }

    /// Returns a bearer token, fetching or refreshing it if the cached
    /// one is missing or within the refresh margin of expiry.
    pub async fn bearer(&self) -> Result<String> {
        let mut slot = self.token.lock().await;
        if let Some(cached) = slot.as_ref() {
            if Utc::now() + Duration::seconds(Self::REFRESH_MARGIN_SECONDS) < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let bearer = fresh.access_token.clone();
        *slot = Some(fresh);
        Ok(bearer)
    }

    /// Drops the cached token if it still matches `stale`.
    ///
    /// Called after the archive rejects a request with an auth error.
    /// Comparing against the rejected token makes concurrent
    /// invalidations idempotent: once one caller has replaced the
    /// token, later invalidations carrying the old value are no-ops
    /// and do not discard the fresh token.
    pub async fn invalidate(&self, stale: &str) {
        let mut slot = self.token.lock().await;
        if slot
            .as_ref()
            .is_some_and(|cached| cached.access_token == stale)
        {
            debug!("invalidating cached token after auth rejection");
            *slot = None;
        }
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        debug!(token_url = %self.credentials.token_url, "fetching access token");
        let response = self
            .client
            .post(&self.credentials.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "token endpoint returned status code {}",
                response.status()
            );
        }

        let body: TokenResponse = response.json().await?;
        Ok(CachedToken {
            access_token: body.access_token,
            expires_at: Utc::now() + Duration::seconds(body.expires_in),
        })
    }
}
