use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length for release identifiers (security limit)
const MAX_RELEASE_ID_LENGTH: usize = 255;

/// NewType wrapper for a release identifier with validation.
///
/// The identifier is opaque: the pipeline only compares, orders and hashes
/// it. Release identity is also the deduplication key for delivery, so two
/// documents for the same `ReleaseId` are the same unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseId(String);

impl ReleaseId {
    pub fn new(id: String) -> Result<Self> {
        if id.trim().is_empty() {
            anyhow::bail!("Release identifier cannot be empty");
        }

        // Security: Length limit, the id ends up in object-store keys and URLs
        if id.len() > MAX_RELEASE_ID_LENGTH {
            anyhow::bail!(
                "Release identifier is too long ({} bytes). Maximum allowed: {} bytes",
                id.len(),
                MAX_RELEASE_ID_LENGTH
            );
        }

        // Security: Reject path separators, the id is used as an object key suffix
        if id.contains('/') || id.contains('\\') || id.contains("..") {
            anyhow::bail!(
                "Release identifier contains path separators which are not allowed"
            );
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind tag for a tracked release: a component build or a product release.
///
/// The kind selects which SBOM entrypoint produced the release's documents
/// and which top-level report wrapper the run publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    Component,
    Product,
}

impl std::fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseKind::Component => write!(f, "component"),
            ReleaseKind::Product => write!(f, "product"),
        }
    }
}

/// A single unit of work: a tracked release requiring an SBOM.
///
/// Immutable once observed. `created_at` is known when the release was
/// enumerated from the release source; operator-supplied identifiers carry
/// no timestamp because the explicit strategies deliberately skip the
/// source query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub id: ReleaseId,
    pub kind: ReleaseKind,
    pub created_at: Option<DateTime<Utc>>,
}

impl Release {
    pub fn new(id: ReleaseId, kind: ReleaseKind, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            kind,
            created_at,
        }
    }
}

/// An SBOM document produced for a release, ready for archive delivery.
///
/// The pipeline treats the content as opaque bytes; parsing into
/// CycloneDX/SPDX object models is the producer's concern.
#[derive(Debug, Clone)]
pub struct SbomDocument {
    pub release_id: ReleaseId,
    pub content: Vec<u8>,
}

impl SbomDocument {
    pub fn new(release_id: ReleaseId, content: Vec<u8>) -> Self {
        Self {
            release_id,
            content,
        }
    }
}
