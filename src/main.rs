use sbom_regen::adapters::outbound::filesystem::FileReportWriter;
use sbom_regen::adapters::outbound::network::{TokenCache, TpaClient};
use sbom_regen::adapters::outbound::process::CommandProducer;
use sbom_regen::adapters::outbound::storage::{S3ReleaseSource, S3RetryLedger};
use sbom_regen::application::dto::RegenerationRequest;
use sbom_regen::application::use_cases::RegenerateSbomsUseCase;
use sbom_regen::cli::{Args, Command};
use sbom_regen::config;
use sbom_regen::ports::outbound::RetryLedger;
use sbom_regen::regeneration::domain::ReleaseId;
use sbom_regen::shared::error::{ExitCode, RegenError};
use sbom_regen::shared::logging::setup_logging;
use sbom_regen::shared::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    setup_logging(args.verbose);

    let exit_code = match run(&args).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            error!("{:#}", e);
            classify_error(&e)
        }
    };
    std::process::exit(exit_code.as_i32());
}

/// Maps a run failure to the process exit code contract: argument and
/// configuration problems exit 2, everything else run-fatal exits 1.
fn classify_error(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<RegenError>() {
        Some(
            RegenError::InvalidSelection { .. }
            | RegenError::ReleaseIdFileError { .. }
            | RegenError::Configuration { .. },
        ) => ExitCode::InvalidArguments,
        _ => ExitCode::RunFatal,
    }
}

async fn run(args: &Args) -> Result<()> {
    if let Command::Pending {
        since,
        until,
        release_ids,
    } = &args.command
    {
        return list_pending(args, *since, *until, release_ids).await;
    }

    let strategy = args.selection_strategy()?;

    let archive_base_url = args.archive_base_url.clone().ok_or_else(|| {
        RegenError::Configuration {
            reason: "--archive-base-url (or SBOM_REGEN_ARCHIVE_URL) is required".to_string(),
        }
    })?;
    let s3_settings = ledger_settings(args)?;
    let auth = match config::oidc_from_env()? {
        Some(credentials) => Some(TokenCache::new(credentials, reqwest::Client::new())),
        None => {
            info!("archive authentication is disabled");
            None
        }
    };

    let request = RegenerationRequest::new(
        strategy,
        args.sbom_type,
        args.report_path.clone(),
        args.concurrency,
        args.dry_run,
    )?;

    let use_case = RegenerateSbomsUseCase::new(
        S3ReleaseSource::new(&s3_settings),
        CommandProducer::new(config::producer_from_env()?),
        TpaClient::new(archive_base_url, auth)?,
        S3RetryLedger::new(&s3_settings),
        FileReportWriter::new(args.report_path.clone()),
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; finishing in-flight releases");
            signal_cancel.cancel();
        }
    });

    let report = use_case.execute(&request, cancel).await?;
    info!(
        candidates = report.totals.candidates,
        delivered = report.totals.delivered,
        failed = report.totals.failed,
        skipped = report.totals.skipped,
        report = %args.report_path.display(),
        "regeneration run complete"
    );
    Ok(())
}

fn ledger_settings(args: &Args) -> Result<sbom_regen::adapters::outbound::storage::S3Settings> {
    let ledger_bucket = args.ledger_bucket.clone().ok_or_else(|| {
        RegenError::Configuration {
            reason: "--ledger-bucket (or SBOM_REGEN_LEDGER_BUCKET) is required".to_string(),
        }
    })?;
    config::s3_from_env(ledger_bucket, args.ledger_endpoint_url.clone())
}

/// Prints the retry ledger records matching the filters to stdout as
/// JSON, so an operator can see which releases still owe an SBOM and
/// decide what to re-run.
async fn list_pending(
    args: &Args,
    since: Option<chrono::DateTime<chrono::Utc>>,
    until: Option<chrono::DateTime<chrono::Utc>>,
    release_ids: &[String],
) -> Result<()> {
    let ledger = S3RetryLedger::new(&ledger_settings(args)?);
    ledger.ping().await.map_err(|e| RegenError::LedgerUnreachable {
        details: format!("{:#}", e),
    })?;

    let records = if release_ids.is_empty() {
        let since = since.unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH);
        let until = until.unwrap_or_else(chrono::Utc::now);
        ledger.get_between(since, until).await?
    } else {
        let ids = release_ids
            .iter()
            .map(|raw| ReleaseId::new(raw.clone()))
            .collect::<Result<Vec<_>>>()?;
        ledger.get(&ids).await?
    };

    println!("{}", serde_json::to_string_pretty(&records)?);
    info!(count = records.len(), "pending records listed");
    Ok(())
}
