use crate::adapters::outbound::network::oidc::TokenCache;
use crate::ports::outbound::SbomArchive;
use crate::regeneration::domain::{FailureReason, SbomDocument, UploadOutcome};
use crate::shared::Result;
use async_trait::async_trait;
use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Archive API client delivering SBOM documents over HTTP.
///
/// Every response is classified into a terminal [`UploadOutcome`]; the
/// client itself never returns a per-release error for a received
/// response. A `409 Conflict` counts as delivered because the archive
/// deduplicates by release identity, so a conflict means the document
/// is already there.
///
/// # Retry behaviour
/// - `401`/`403`: the cached token is invalidated and the request is
///   retried once with a fresh token. A second auth rejection is
///   `Failed(Auth)`.
/// - `5xx`, connection errors and timeouts: retried with exponential
///   backoff and jitter up to the attempt budget, then
///   `Failed(Transient)`.
/// - Any other `4xx`: `Failed(Rejected)` immediately, no retry.
pub struct TpaClient {
    base_url: String,
    client: reqwest::Client,
    auth: Option<TokenCache>,
    attempt_budget: u32,
    backoff_base: Duration,
}

impl TpaClient {
    const UPLOAD_PATH: &'static str = "api/v2/sbom";
    const DEFAULT_ATTEMPT_BUDGET: u32 = 5;
    const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);
    const TIMEOUT_SECONDS: u64 = 60;

    /// Creates a client for the archive at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Archive API root, without the upload path
    /// * `auth` - Token cache, or `None` when auth is disabled
    pub fn new(base_url: String, auth: Option<TokenCache>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(format!("sbom-regen/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth,
            attempt_budget: Self::DEFAULT_ATTEMPT_BUDGET,
            backoff_base: Self::DEFAULT_BACKOFF_BASE,
        })
    }

    /// Overrides the transient retry policy.
    pub fn with_retry_policy(mut self, attempt_budget: u32, backoff_base: Duration) -> Self {
        self.attempt_budget = attempt_budget.max(1);
        self.backoff_base = backoff_base;
        self
    }

    async fn post_document(
        &self,
        document: &SbomDocument,
        bearer: Option<&str>,
    ) -> std::result::Result<StatusCode, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, Self::UPLOAD_PATH);
        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(&[("id", document.release_id.as_str())])
            .body(document.content.clone());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        Ok(response.status())
    }

    /// Sleeps for `backoff_base * 2^(attempt - 1)` plus up to one extra
    /// base interval of jitter.
    async fn backoff(&self, attempt: u32) {
        let base_ms = self.backoff_base.as_millis() as u64;
        let exp = base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
        let jitter = if base_ms > 0 {
            rand::thread_rng().gen_range(0..=base_ms)
        } else {
            0
        };
        tokio::time::sleep(Duration::from_millis(exp.saturating_add(jitter))).await;
    }
}

#[async_trait]
impl SbomArchive for TpaClient {
    async fn upload(&self, document: &SbomDocument) -> Result<UploadOutcome> {
        let mut auth_retried = false;
        let mut transient_attempts: u32 = 0;

        loop {
            let bearer = match &self.auth {
                Some(cache) => match cache.bearer().await {
                    Ok(token) => Some(token),
                    Err(e) => {
                        warn!(release = %document.release_id, error = %format!("{:#}", e), "token fetch failed");
                        return Ok(UploadOutcome::failed(FailureReason::Auth));
                    }
                },
                None => None,
            };

            let status = match self.post_document(document, bearer.as_deref()).await {
                Ok(status) => status,
                Err(e) => {
                    transient_attempts += 1;
                    if transient_attempts >= self.attempt_budget {
                        warn!(release = %document.release_id, error = %e, "transient retry budget exhausted");
                        return Ok(UploadOutcome::failed(FailureReason::Transient));
                    }
                    debug!(release = %document.release_id, attempt = transient_attempts, error = %e, "request failed; backing off");
                    self.backoff(transient_attempts).await;
                    continue;
                }
            };

            if status.is_success() || status == StatusCode::CONFLICT {
                if status == StatusCode::CONFLICT {
                    debug!(release = %document.release_id, "archive already holds this document");
                }
                return Ok(UploadOutcome::Delivered);
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                if auth_retried {
                    return Ok(UploadOutcome::failed(FailureReason::Auth));
                }
                auth_retried = true;
                match (&self.auth, bearer.as_deref()) {
                    (Some(cache), Some(token)) => {
                        debug!(release = %document.release_id, status = %status, "auth rejected; refreshing token");
                        cache.invalidate(token).await;
                        continue;
                    }
                    // No token to refresh, so a retry cannot change
                    // the answer.
                    _ => return Ok(UploadOutcome::failed(FailureReason::Auth)),
                }
            }

            if status.is_server_error() {
                transient_attempts += 1;
                if transient_attempts >= self.attempt_budget {
                    warn!(release = %document.release_id, status = %status, "transient retry budget exhausted");
                    return Ok(UploadOutcome::failed(FailureReason::Transient));
                }
                debug!(release = %document.release_id, status = %status, attempt = transient_attempts, "server error; backing off");
                self.backoff(transient_attempts).await;
                continue;
            }

            return Ok(UploadOutcome::failed(FailureReason::Rejected {
                status: status.as_u16(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::network::oidc::OidcClientCredentials;
    use crate::regeneration::domain::ReleaseId;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn document() -> SbomDocument {
        SbomDocument::new(
            ReleaseId::new("rel-1".to_string()).unwrap(),
            b"{\"bomFormat\":\"CycloneDX\"}".to_vec(),
        )
    }

    fn client(server: &MockServer, auth: Option<TokenCache>) -> TpaClient {
        TpaClient::new(server.uri(), auth)
            .unwrap()
            .with_retry_policy(3, Duration::from_millis(1))
    }

    fn token_cache(server: &MockServer) -> TokenCache {
        TokenCache::new(
            OidcClientCredentials {
                token_url: format!("{}/token", server.uri()),
                client_id: "regen-service".to_string(),
                client_secret: "secret".to_string(),
            },
            reqwest::Client::new(),
        )
    }

    fn token_body(token: &str) -> serde_json::Value {
        serde_json::json!({ "access_token": token, "expires_in": 3600 })
    }

    #[tokio::test]
    async fn test_created_is_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let outcome = client(&server, None).upload(&document()).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Delivered);
    }

    #[tokio::test]
    async fn test_conflict_is_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let outcome = client(&server, None).upload(&document()).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Delivered);
    }

    #[tokio::test]
    async fn test_client_error_is_rejected_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .respond_with(ResponseTemplate::new(422))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client(&server, None).upload(&document()).await.unwrap();
        assert_eq!(
            outcome,
            UploadOutcome::failed(FailureReason::Rejected { status: 422 })
        );
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_transient_budget() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let outcome = client(&server, None).upload(&document()).await.unwrap();
        assert_eq!(outcome, UploadOutcome::failed(FailureReason::Transient));
    }

    #[tokio::test]
    async fn test_server_error_then_success_is_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let outcome = client(&server, None).upload(&document()).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Delivered);
    }

    #[tokio::test]
    async fn test_stale_token_refreshed_once_then_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("stale")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let cache = token_cache(&server);
        let outcome = client(&server, Some(cache))
            .upload(&document())
            .await
            .unwrap();
        assert_eq!(outcome, UploadOutcome::Delivered);
    }

    #[tokio::test]
    async fn test_second_auth_rejection_fails_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("rejected")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .respond_with(ResponseTemplate::new(403))
            .expect(2)
            .mount(&server)
            .await;

        let cache = token_cache(&server);
        let outcome = client(&server, Some(cache))
            .upload(&document())
            .await
            .unwrap();
        assert_eq!(outcome, UploadOutcome::failed(FailureReason::Auth));
    }

    #[tokio::test]
    async fn test_auth_rejection_without_auth_configured_fails_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/sbom"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client(&server, None).upload(&document()).await.unwrap();
        assert_eq!(outcome, UploadOutcome::failed(FailureReason::Auth));
    }
}
