use crate::adapters::outbound::storage::s3_store::{build_client, S3Settings};
use crate::ports::outbound::RetryLedger;
use crate::regeneration::domain::{ReleaseId, ReleaseKind, RetryRecord};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// RetryLedger backed by one JSON object per pending release.
///
/// Records live under `retry/<release_id>`. Per-key object writes give
/// the last-write-wins semantics the port asks for without any
/// cross-process locking.
pub struct S3RetryLedger {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3RetryLedger {
    const PREFIX: &'static str = "retry/";

    pub fn new(settings: &S3Settings) -> Self {
        Self {
            client: build_client(settings),
            bucket: settings.bucket.clone(),
        }
    }

    fn key_for(id: &ReleaseId) -> String {
        format!("{}{}", Self::PREFIX, id)
    }

    /// Fetches the record stored for a release, or `None` when no
    /// record exists.
    async fn fetch(&self, id: &ReleaseId) -> Result<Option<RetryRecord>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(Self::key_for(id))
            .send()
            .await;
        let output = match response {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    return Ok(None);
                }
                return Err(e).context("failed to read ledger record");
            }
        };
        let bytes = output
            .body
            .collect()
            .await
            .context("failed to read ledger record body")?
            .into_bytes();
        let record = serde_json::from_slice(&bytes)
            .with_context(|| format!("malformed ledger record for release {}", id))?;
        Ok(Some(record))
    }

    async fn store(&self, record: &RetryRecord) -> Result<()> {
        let body = serde_json::to_vec(record).context("failed to serialize ledger record")?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(Self::key_for(&record.release_id))
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .context("failed to write ledger record")?;
        Ok(())
    }
}

#[async_trait]
impl RetryLedger for S3RetryLedger {
    async fn ping(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("ledger bucket {} is not reachable", self.bucket))?;
        Ok(())
    }

    async fn get_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<RetryRecord>> {
        let mut records = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(Self::PREFIX)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.context("failed to list ledger records")?;
            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                let Some(raw_id) = key.strip_prefix(Self::PREFIX) else {
                    continue;
                };
                let id = match ReleaseId::new(raw_id.to_string()) {
                    Ok(id) => id,
                    Err(e) => {
                        warn!(key, error = %format!("{:#}", e), "skipping malformed ledger key");
                        continue;
                    }
                };
                // A concurrent run may remove the record between the
                // listing and the read.
                if let Some(record) = self.fetch(&id).await? {
                    if record.first_failed_at >= since && record.first_failed_at < until {
                        records.push(record);
                    }
                }
            }
        }
        Ok(records)
    }

    async fn get(&self, ids: &[ReleaseId]) -> Result<Vec<RetryRecord>> {
        let mut records = Vec::new();
        for id in ids {
            if let Some(record) = self.fetch(id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn upsert(&self, release_id: &ReleaseId, kind: ReleaseKind) -> Result<RetryRecord> {
        let now = Utc::now();
        let record = match self.fetch(release_id).await? {
            Some(mut existing) => {
                existing.record_attempt(now);
                existing
            }
            None => RetryRecord::first_failure(release_id.clone(), kind, now),
        };
        self.store(&record).await?;
        debug!(release = %release_id, attempts = record.attempt_count, "ledger record upserted");
        Ok(record)
    }

    async fn remove(&self, release_id: &ReleaseId) -> Result<()> {
        // DeleteObject succeeds whether or not the key exists, which is
        // exactly the no-op semantics the port asks for.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(Self::key_for(release_id))
            .send()
            .await
            .context("failed to delete ledger record")?;
        debug!(release = %release_id, "ledger record removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let id = ReleaseId::new("rel-3".to_string()).unwrap();
        assert_eq!(S3RetryLedger::key_for(&id), "retry/rel-3");
    }
}
