use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::dto::DEFAULT_CONCURRENCY;
use crate::regeneration::domain::ReleaseKind;
use crate::regeneration::strategy::SelectionStrategy;
use crate::shared::error::RegenError;
use crate::shared::Result;

/// Regenerate SBOM documents and deliver them to the archive
#[derive(Parser, Debug)]
#[command(name = "sbom-regen")]
#[command(version)]
#[command(about = "Regenerate SBOM documents and deliver them to the archive", long_about = None)]
pub struct Args {
    /// Which kind of releases this run regenerates
    #[arg(long = "sbom-type", value_enum, default_value_t = ReleaseKind::Component, global = true)]
    pub sbom_type: ReleaseKind,

    /// Archive API root URL
    #[arg(long, env = "SBOM_REGEN_ARCHIVE_URL", global = true)]
    pub archive_base_url: Option<String>,

    /// Bucket holding the release index and the retry ledger
    #[arg(long, env = "SBOM_REGEN_LEDGER_BUCKET", global = true)]
    pub ledger_bucket: Option<String>,

    /// Custom S3 endpoint URL for the ledger bucket
    #[arg(long, env = "SBOM_REGEN_LEDGER_ENDPOINT_URL", global = true)]
    pub ledger_endpoint_url: Option<String>,

    /// Where the run report is written
    #[arg(long, default_value = "report.json", global = true)]
    pub report_path: PathBuf,

    /// Maximum number of releases processed in parallel
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, global = true)]
    pub concurrency: usize,

    /// Produce documents but skip archive delivery and ledger updates
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process the releases named on the command line
    Explicit {
        /// Release identifiers to process
        #[arg(value_name = "RELEASE_ID")]
        release_ids: Vec<String>,
    },
    /// Process every release created during an outage window
    Outage {
        /// Window start, inclusive (RFC 3339)
        #[arg(long)]
        since: DateTime<Utc>,
        /// Window end, exclusive (RFC 3339)
        #[arg(long)]
        until: DateTime<Utc>,
    },
    /// Process the releases listed in a file, one identifier per line
    ReleaseIds {
        /// Path to the identifier file
        #[arg(long)]
        file: PathBuf,
    },
    /// List ledger records of releases that still owe an SBOM
    Pending {
        /// Only records first failed at or after this time (RFC 3339)
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        /// Only records first failed before this time (RFC 3339)
        #[arg(long)]
        until: Option<DateTime<Utc>>,
        /// Restrict the listing to specific release identifiers
        #[arg(long = "release-id", value_name = "RELEASE_ID")]
        release_ids: Vec<String>,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the selection strategy described by the chosen subcommand.
    ///
    /// # Errors
    /// Returns an invalid-selection error for an empty identifier list,
    /// an inverted window, or an unreadable identifier file.
    pub fn selection_strategy(&self) -> Result<SelectionStrategy> {
        match &self.command {
            Command::Explicit { release_ids } => {
                SelectionStrategy::explicit_from_raw(release_ids)
            }
            Command::Outage { since, until } => {
                SelectionStrategy::outage_window(*since, *until)
            }
            Command::ReleaseIds { file } => SelectionStrategy::from_release_id_file(file),
            Command::Pending { .. } => Err(RegenError::InvalidSelection {
                reason: "the pending subcommand does not run a regeneration".to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_outage_parses_rfc3339_window() {
        let args = Args::try_parse_from([
            "sbom-regen",
            "outage",
            "--since",
            "2024-01-01T00:00:00Z",
            "--until",
            "2024-01-02T00:00:00Z",
        ])
        .unwrap();
        assert!(matches!(args.command, Command::Outage { .. }));
        assert!(args.selection_strategy().is_ok());
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let args = Args::try_parse_from([
            "sbom-regen",
            "outage",
            "--since",
            "2024-01-02T00:00:00Z",
            "--until",
            "2024-01-01T00:00:00Z",
        ])
        .unwrap();
        assert!(args.selection_strategy().is_err());
    }

    #[test]
    fn test_explicit_with_no_ids_is_rejected() {
        let args = Args::try_parse_from(["sbom-regen", "explicit"]).unwrap();
        assert!(args.selection_strategy().is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sbom-regen", "explicit", "rel-1"]).unwrap();
        assert_eq!(args.sbom_type, ReleaseKind::Component);
        assert_eq!(args.concurrency, DEFAULT_CONCURRENCY);
        assert!(!args.dry_run);
        assert_eq!(args.report_path, PathBuf::from("report.json"));
    }

    #[test]
    fn test_pending_accepts_filters() {
        let args = Args::try_parse_from([
            "sbom-regen",
            "pending",
            "--since",
            "2024-01-01T00:00:00Z",
            "--release-id",
            "rel-1",
            "--release-id",
            "rel-2",
        ])
        .unwrap();
        match &args.command {
            Command::Pending {
                since, release_ids, ..
            } => {
                assert!(since.is_some());
                assert_eq!(release_ids, &vec!["rel-1", "rel-2"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        // Pending is not a regeneration; it carries no selection strategy.
        assert!(args.selection_strategy().is_err());
    }

    #[test]
    fn test_product_sbom_type() {
        let args =
            Args::try_parse_from(["sbom-regen", "--sbom-type", "product", "explicit", "rel-1"])
                .unwrap();
        assert_eq!(args.sbom_type, ReleaseKind::Product);
    }
}
