use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sbom_regen::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock RetryLedger for testing
///
/// In-memory map with the same per-key semantics as the durable
/// implementation. Cloning shares the underlying state, so a clone
/// held by the test observes mutations made through the pipeline.
#[derive(Clone, Default)]
pub struct MockRetryLedger {
    records: Arc<Mutex<HashMap<ReleaseId, RetryRecord>>>,
    unreachable: bool,
}

impl MockRetryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            records: Arc::default(),
            unreachable: true,
        }
    }

    pub fn record_for(&self, id: &ReleaseId) -> Option<RetryRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RetryLedger for MockRetryLedger {
    async fn ping(&self) -> Result<()> {
        if self.unreachable {
            anyhow::bail!("ledger bucket is not reachable");
        }
        Ok(())
    }

    async fn get_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<RetryRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.first_failed_at >= since && r.first_failed_at < until)
            .cloned()
            .collect())
    }

    async fn get(&self, ids: &[ReleaseId]) -> Result<Vec<RetryRecord>> {
        let records = self.records.lock().unwrap();
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }

    async fn upsert(&self, release_id: &ReleaseId, kind: ReleaseKind) -> Result<RetryRecord> {
        let mut records = self.records.lock().unwrap();
        let now = Utc::now();
        let record = records
            .entry(release_id.clone())
            .and_modify(|r| r.record_attempt(now))
            .or_insert_with(|| RetryRecord::first_failure(release_id.clone(), kind, now));
        Ok(record.clone())
    }

    async fn remove(&self, release_id: &ReleaseId) -> Result<()> {
        self.records.lock().unwrap().remove(release_id);
        Ok(())
    }
}
