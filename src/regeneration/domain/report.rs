use crate::regeneration::domain::{ReleaseId, ReleaseKind, UploadOutcome};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Which selection mode populated the candidate set for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionMode {
    Explicit,
    OutageWindow {
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    },
    ReleaseIdFile,
}

/// Aggregate counts over all entries in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub candidates: usize,
    pub delivered: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Aggregate of all per-release outcomes for a run plus run metadata.
///
/// Serialization is deterministic byte-for-byte for a given multiset of
/// outcomes: entries live in a map keyed by release id (stable key
/// ordering) and struct fields serialize in declaration order. This
/// supports downstream diffing of reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerationReport {
    pub run_id: Uuid,
    pub kind: ReleaseKind,
    #[serde(flatten)]
    pub mode: SelectionMode,
    pub totals: ReportTotals,
    entries: BTreeMap<ReleaseId, UploadOutcome>,
}

impl RegenerationReport {
    /// Build a report from collected outcomes.
    ///
    /// Outcomes may arrive in any order; the constructor is where the
    /// "at most once per release" invariant is enforced. A duplicate
    /// release id is a pipeline bug, not an operational condition.
    pub fn from_outcomes(
        run_id: Uuid,
        kind: ReleaseKind,
        mode: SelectionMode,
        outcomes: Vec<(ReleaseId, UploadOutcome)>,
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut totals = ReportTotals::default();

        for (release_id, outcome) in outcomes {
            match &outcome {
                UploadOutcome::Delivered => totals.delivered += 1,
                UploadOutcome::Failed { .. } => totals.failed += 1,
                UploadOutcome::Skipped { .. } => totals.skipped += 1,
            }
            if entries.insert(release_id.clone(), outcome).is_some() {
                anyhow::bail!(
                    "Duplicate outcome recorded for release: {}",
                    release_id
                );
            }
        }
        totals.candidates = entries.len();

        Ok(Self {
            run_id,
            kind,
            mode,
            totals,
            entries,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ReleaseId, &UploadOutcome)> {
        self.entries.iter()
    }

    pub fn outcome_for(&self, id: &ReleaseId) -> Option<&UploadOutcome> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize with the top-level wrapper that distinguishes
    /// component-kind from product-kind reports. Both wrap the same
    /// inner summary schema.
    pub fn to_json(&self) -> Result<String> {
        let json = match self.kind {
            ReleaseKind::Component => serde_json::to_string_pretty(&ComponentReport {
                component_regeneration_report: self,
            })?,
            ReleaseKind::Product => serde_json::to_string_pretty(&ProductReport {
                product_regeneration_report: self,
            })?,
        };
        Ok(json)
    }
}

/// Wrapper for component-kind reports.
#[derive(Serialize)]
struct ComponentReport<'a> {
    component_regeneration_report: &'a RegenerationReport,
}

/// Wrapper for product-kind reports.
#[derive(Serialize)]
struct ProductReport<'a> {
    product_regeneration_report: &'a RegenerationReport,
}
