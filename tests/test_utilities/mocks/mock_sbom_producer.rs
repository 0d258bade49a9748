use async_trait::async_trait;
use sbom_regen::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock SbomProducer for testing
#[derive(Clone, Default)]
pub struct MockSbomProducer {
    fail_for: HashSet<String>,
    skip_for: HashSet<String>,
    invocations: Arc<AtomicUsize>,
}

impl MockSbomProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, id: &str) -> Self {
        self.fail_for.insert(id.to_string());
        self
    }

    pub fn skipping(mut self, id: &str) -> Self {
        self.skip_for.insert(id.to_string());
        self
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SbomProducer for MockSbomProducer {
    async fn produce(&self, release: &Release) -> Result<Option<SbomDocument>> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if self.fail_for.contains(release.id.as_str()) {
            anyhow::bail!("generator failed for {}", release.id);
        }
        if self.skip_for.contains(release.id.as_str()) {
            return Ok(None);
        }
        Ok(Some(SbomDocument::new(
            release.id.clone(),
            format!("{{\"release\":\"{}\"}}", release.id).into_bytes(),
        )))
    }
}
