use crate::adapters::outbound::storage::s3_store::{build_client, S3Settings};
use crate::ports::outbound::ReleaseSource;
use crate::regeneration::domain::{Release, ReleaseId, ReleaseKind};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

/// ReleaseSource backed by an S3 release index.
///
/// Release events are stored one object per release under
/// `releases/<kind>/<release_id>`, and the object's last-modified time
/// records when the release was created. Listing a kind prefix and
/// filtering on that timestamp answers outage-window queries without a
/// separate database.
pub struct S3ReleaseSource {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ReleaseSource {
    const PREFIX: &'static str = "releases";

    pub fn new(settings: &S3Settings) -> Self {
        Self {
            client: build_client(settings),
            bucket: settings.bucket.clone(),
        }
    }

    fn kind_prefix(kind: ReleaseKind) -> String {
        format!("{}/{}/", Self::PREFIX, kind)
    }

    fn key_for(id: &ReleaseId, kind: ReleaseKind) -> String {
        format!("{}{}", Self::kind_prefix(kind), id)
    }

    /// Extracts the release identifier from an index object key.
    ///
    /// Keys that do not parse as a valid identifier are skipped with a
    /// warning rather than failing the listing; a single malformed
    /// object must not block outage recovery for everything else.
    fn id_from_key(key: &str, kind: ReleaseKind) -> Option<ReleaseId> {
        let rest = key.strip_prefix(&Self::kind_prefix(kind))?;
        match ReleaseId::new(rest.to_string()) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(key, error = %format!("{:#}", e), "skipping malformed release index key");
                None
            }
        }
    }

    fn to_chrono(ts: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(ts.secs(), ts.subsec_nanos()).single()
    }
}

#[async_trait]
impl ReleaseSource for S3ReleaseSource {
    async fn releases_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        kind: ReleaseKind,
    ) -> Result<Vec<Release>> {
        let prefix = Self::kind_prefix(kind);
        debug!(bucket = %self.bucket, %prefix, %since, %until, "listing release index");

        let mut releases = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.context("failed to list release index")?;
            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                let Some(id) = Self::id_from_key(key, kind) else {
                    continue;
                };
                let created_at = object.last_modified().and_then(Self::to_chrono);
                let in_window = created_at
                    .map(|t| t >= since && t < until)
                    .unwrap_or(false);
                if in_window {
                    releases.push(Release::new(id, kind, created_at));
                }
            }
        }

        debug!(count = releases.len(), "release index query complete");
        Ok(releases)
    }

    async fn releases_by_id(&self, ids: &[ReleaseId]) -> Result<Vec<Release>> {
        let mut releases = Vec::new();
        for id in ids {
            for kind in [ReleaseKind::Component, ReleaseKind::Product] {
                let head = self
                    .client
                    .head_object()
                    .bucket(&self.bucket)
                    .key(Self::key_for(id, kind))
                    .send()
                    .await;
                match head {
                    Ok(output) => {
                        let created_at = output.last_modified().and_then(Self::to_chrono);
                        releases.push(Release::new(id.clone(), kind, created_at));
                        break;
                    }
                    Err(e) => {
                        let not_found = e
                            .as_service_error()
                            .is_some_and(|service| service.is_not_found());
                        if !not_found {
                            return Err(e).context("failed to query release index");
                        }
                    }
                }
            }
        }
        Ok(releases)
    }
}
