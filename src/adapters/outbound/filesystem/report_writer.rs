use crate::ports::outbound::ReportSink;
use crate::regeneration::domain::RegenerationReport;
use crate::shared::error::RegenError;
use crate::shared::Result;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// FileReportWriter adapter publishing the run report as a JSON file.
///
/// The report is written to a temporary file in the destination
/// directory and persisted into place, so a crash mid-write never
/// leaves a truncated report behind for downstream tooling to parse.
pub struct FileReportWriter {
    report_path: PathBuf,
}

impl FileReportWriter {
    pub fn new(report_path: PathBuf) -> Self {
        Self { report_path }
    }

    fn write_error(&self, details: String) -> anyhow::Error {
        RegenError::ReportPublishError {
            path: self.report_path.clone(),
            details,
        }
        .into()
    }

    fn validate_parent_directory(&self) -> Result<()> {
        if let Some(parent) = self.report_path.parent() {
            if !parent.exists() && parent != Path::new("") {
                return Err(self.write_error(format!(
                    "parent directory does not exist: {}",
                    parent.display()
                )));
            }
        }
        Ok(())
    }

    fn write_atomically(&self, content: &str) -> Result<()> {
        let directory = match self.report_path.parent() {
            Some(parent) if parent != Path::new("") => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(directory)
            .map_err(|e| self.write_error(format!("failed to create temporary file: {}", e)))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| self.write_error(format!("failed to write report: {}", e)))?;
        temp.persist(&self.report_path)
            .map_err(|e| self.write_error(format!("failed to persist report: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl ReportSink for FileReportWriter {
    async fn publish(&self, report: &RegenerationReport) -> Result<()> {
        self.validate_parent_directory()?;
        let content = report.to_json()?;
        self.write_atomically(&content)?;
        info!(path = %self.report_path.display(), entries = report.len(), "report published");
        Ok(())
    }
}
