use async_trait::async_trait;
use sbom_regen::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock ReportSink for testing
#[derive(Clone, Default)]
pub struct MockReportSink {
    published: Arc<Mutex<Vec<RegenerationReport>>>,
}

impl MockReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<RegenerationReport> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for MockReportSink {
    async fn publish(&self, report: &RegenerationReport) -> Result<()> {
        self.published.lock().unwrap().push(report.clone());
        Ok(())
    }
}
