use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sbom_regen::prelude::*;

/// Mock ReleaseSource for testing
#[derive(Clone, Default)]
pub struct MockReleaseSource {
    pub releases: Vec<Release>,
    pub should_fail: bool,
}

impl MockReleaseSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release(mut self, id: &str, kind: ReleaseKind, created_at: DateTime<Utc>) -> Self {
        self.releases.push(Release::new(
            ReleaseId::new(id.to_string()).unwrap(),
            kind,
            Some(created_at),
        ));
        self
    }

    pub fn with_failure() -> Self {
        Self {
            releases: Vec::new(),
            should_fail: true,
        }
    }
}

#[async_trait]
impl ReleaseSource for MockReleaseSource {
    async fn releases_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        kind: ReleaseKind,
    ) -> Result<Vec<Release>> {
        if self.should_fail {
            anyhow::bail!("release source unavailable");
        }
        Ok(self
            .releases
            .iter()
            .filter(|r| r.kind == kind)
            .filter(|r| {
                r.created_at
                    .map(|t| t >= since && t < until)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn releases_by_id(&self, ids: &[ReleaseId]) -> Result<Vec<Release>> {
        if self.should_fail {
            anyhow::bail!("release source unavailable");
        }
        Ok(self
            .releases
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }
}
