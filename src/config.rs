//! Environment-backed configuration for sbom-regen.
//!
//! Connection settings and credentials come from the environment so
//! they can be injected by the batch scheduler without appearing in
//! command lines. The CLI supplies the per-run knobs; this module
//! resolves everything else.

use std::path::PathBuf;

use crate::adapters::outbound::network::OidcClientCredentials;
use crate::adapters::outbound::storage::S3Settings;
use crate::shared::error::RegenError;
use crate::shared::Result;

pub const ENV_SSO_TOKEN_URL: &str = "SBOM_REGEN_SSO_TOKEN_URL";
pub const ENV_SSO_ACCOUNT: &str = "SBOM_REGEN_SSO_ACCOUNT";
pub const ENV_SSO_TOKEN: &str = "SBOM_REGEN_SSO_TOKEN";
pub const ENV_AUTH_DISABLE: &str = "SBOM_REGEN_AUTH_DISABLE";
pub const ENV_PRODUCER_CMD: &str = "SBOM_REGEN_PRODUCER_CMD";
pub const ENV_AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_AWS_REGION: &str = "AWS_REGION";

const DEFAULT_REGION: &str = "us-east-1";

/// Everything resolved from the environment in one place.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// `None` when auth is explicitly disabled for the archive.
    pub oidc: Option<OidcClientCredentials>,
    pub s3: S3Settings,
    pub producer_cmd: PathBuf,
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| {
        RegenError::Configuration {
            reason: format!("required environment variable {} is not set", name),
        }
        .into()
    })
}

fn auth_disabled() -> bool {
    std::env::var(ENV_AUTH_DISABLE)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Resolves OIDC credentials, or `None` when auth is disabled.
///
/// # Errors
/// Fails when auth is enabled but any of the three SSO variables is
/// missing; a partially configured client would only fail later, at
/// the first upload.
pub fn oidc_from_env() -> Result<Option<OidcClientCredentials>> {
    if auth_disabled() {
        return Ok(None);
    }
    Ok(Some(OidcClientCredentials {
        token_url: required(ENV_SSO_TOKEN_URL)?,
        client_id: required(ENV_SSO_ACCOUNT)?,
        client_secret: required(ENV_SSO_TOKEN)?,
    }))
}

/// Resolves the S3 settings for the given bucket and optional custom
/// endpoint.
pub fn s3_from_env(bucket: String, endpoint_url: Option<String>) -> Result<S3Settings> {
    Ok(S3Settings {
        bucket,
        region: std::env::var(ENV_AWS_REGION).unwrap_or_else(|_| DEFAULT_REGION.to_string()),
        endpoint_url,
        access_key_id: required(ENV_AWS_ACCESS_KEY_ID)?,
        secret_access_key: required(ENV_AWS_SECRET_ACCESS_KEY)?,
    })
}

/// Resolves the producer command path.
pub fn producer_from_env() -> Result<PathBuf> {
    Ok(PathBuf::from(required(ENV_PRODUCER_CMD)?))
}
