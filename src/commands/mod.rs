//! Command dispatch.

pub mod setup;

use std::env;
use std::path::PathBuf;

use crate::cassette::session::RecordingSession;
use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Error, Result};

use self::setup::{SetupReport, SetupRequest};

/// Environment variable naming a directory to record port traffic into.
pub const RECORD_VAR: &str = "POC_RECORD";

/// Run a parsed invocation against the live toolchain.
///
/// When `POC_RECORD` is set to a directory path, shell and explorer
/// interactions are recorded to per-port cassette files under it.
///
/// # Errors
///
/// Returns the first error raised by configuration or the pipeline.
pub fn dispatch(cli: &Cli) -> Result<()> {
    let config = Config::from_env()?;
    let base_dir = env::current_dir()
        .map_err(|e| Error::io("failed to read the current directory", e.into()))?;

    let (ctx, session) = if let Ok(path) = env::var(RECORD_VAR) {
        let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(path), &config)
            .map_err(|e| Error::io("failed to start recording", e.into()))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let result = dispatch_with_context(cli, &ctx, base_dir);

    // Finish recording even when the run failed
    if let Some(session) = session {
        drop(ctx);
        finish_recording(session)?;
    }

    let report = result?;
    print_report(&report);
    Ok(())
}

/// Run a parsed invocation against the ports in `ctx`, creating the project
/// under `base_dir`.
///
/// # Errors
///
/// Returns the first error raised by the pipeline.
pub fn dispatch_with_context(
    cli: &Cli,
    ctx: &ServiceContext,
    base_dir: PathBuf,
) -> Result<SetupReport> {
    let request =
        SetupRequest { address: cli.address.clone(), folder: cli.folder.clone(), base_dir };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::io("failed to start the async runtime", e.into()))?;
    runtime.block_on(setup::run_with_context(ctx, &request))
}

fn finish_recording(session: RecordingSession) -> Result<()> {
    let output_dir =
        session.finish().map_err(|e| Error::io("failed to write cassettes", e.into()))?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

fn print_report(report: &SetupReport) {
    let SetupReport {
        project_dir,
        resolution,
        metadata,
        disputed_implementation,
        sources,
        test_file,
        assets,
    } = report;
    println!("Created {}", project_dir.display());
    println!("  contract:  {} ({})", metadata.contract_name, metadata.compiler_version);
    if resolution.is_proxy() {
        println!("  proxy:     {}", resolution.data);
        println!("  logic:     {}", resolution.logic);
    } else {
        println!("  address:   {}", resolution.data);
    }
    if let Some(reported) = disputed_implementation {
        println!("  warning:   explorer reports implementation {reported}; using the slot value");
    }
    println!("  sources:   {}", sources.join(", "));
    println!("  test:      {}", test_file.display());
    for asset in assets {
        println!("  asset:     {}", asset.display());
    }
}
