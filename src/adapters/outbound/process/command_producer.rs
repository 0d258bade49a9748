use crate::ports::outbound::SbomProducer;
use crate::regeneration::domain::{Release, SbomDocument};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// SbomProducer that shells out to an external generator program.
///
/// The program is invoked once per release as
/// `<program> --release-id <id> --sbom-type <kind>` and must print the
/// regenerated document to stdout. Exit code zero with empty output
/// means the release needs no document and is skipped; a non-zero exit
/// is a produce failure for that release, with stderr carried into the
/// failure details.
pub struct CommandProducer {
    program: PathBuf,
}

impl CommandProducer {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

#[async_trait]
impl SbomProducer for CommandProducer {
    async fn produce(&self, release: &Release) -> Result<Option<SbomDocument>> {
        debug!(release = %release.id, program = %self.program.display(), "invoking producer");
        let output = Command::new(&self.program)
            .arg("--release-id")
            .arg(release.id.as_str())
            .arg("--sbom-type")
            .arg(release.kind.to_string())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to launch producer {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "producer exited with {} for release {}: {}",
                output.status,
                release.id,
                stderr.trim()
            );
        }

        if output.stdout.is_empty() {
            debug!(release = %release.id, "producer emitted no document");
            return Ok(None);
        }

        Ok(Some(SbomDocument::new(
            release.id.clone(),
            output.stdout,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regeneration::domain::{ReleaseId, ReleaseKind};
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    fn release(id: &str) -> Release {
        Release::new(
            ReleaseId::new(id.to_string()).unwrap(),
            ReleaseKind::Component,
            None,
        )
    }

    fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("producer.sh");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{}", body).unwrap();
        let mut perms = file.metadata().unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[tokio::test]
    async fn test_stdout_becomes_document() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "printf '{\"spdxVersion\":\"SPDX-2.3\"}'");
        let producer = CommandProducer::new(program);

        let document = producer.produce(&release("rel-1")).await.unwrap().unwrap();
        assert_eq!(document.content, b"{\"spdxVersion\":\"SPDX-2.3\"}");
        assert_eq!(document.release_id.as_str(), "rel-1");
    }

    #[tokio::test]
    async fn test_empty_output_means_skip() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "exit 0");
        let producer = CommandProducer::new(program);

        assert!(producer.produce(&release("rel-1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_an_error_with_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "echo 'no build metadata' >&2; exit 3");
        let producer = CommandProducer::new(program);

        let err = producer.produce(&release("rel-1")).await.unwrap_err();
        assert!(format!("{:#}", err).contains("no build metadata"));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let producer = CommandProducer::new(PathBuf::from("/nonexistent/producer"));
        assert!(producer.produce(&release("rel-1")).await.is_err());
    }
}
