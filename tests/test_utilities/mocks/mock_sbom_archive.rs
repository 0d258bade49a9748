use async_trait::async_trait;
use sbom_regen::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock SbomArchive for testing
///
/// Delivers everything unless an outcome override is registered for a
/// specific release. Records the identifiers it receives so tests can
/// assert what actually reached the archive.
#[derive(Clone, Default)]
pub struct MockSbomArchive {
    overrides: HashMap<String, UploadOutcome>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockSbomArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, id: &str, outcome: UploadOutcome) -> Self {
        self.overrides.insert(id.to_string(), outcome);
        self
    }

    pub fn received_ids(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl SbomArchive for MockSbomArchive {
    async fn upload(&self, document: &SbomDocument) -> Result<UploadOutcome> {
        self.received
            .lock()
            .unwrap()
            .push(document.release_id.as_str().to_string());
        Ok(self
            .overrides
            .get(document.release_id.as_str())
            .cloned()
            .unwrap_or(UploadOutcome::Delivered))
    }
}
