//! CLI entry point for the mesh routing resilience simulator.
//!
//! Parses command-line arguments with clap, drives the periodic
//! failure-and-recompute loop on a current-thread tokio runtime, renders the
//! run summary to stdout, and maps errors to appropriate exit codes. Logging
//! is initialized eagerly so subsequent operations can emit structured
//! diagnostics via `tracing`.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use meshsim_cli::{
    cli::{Cli, CliError, render_run_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        print_logging_failure(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = simulation_error_code(&err).map(field::display);
            error!(error = %err, code = code, "command execution failed");
            ExitCode::FAILURE
        }
    }
}

/// Parse CLI arguments, execute the command, render the run summary, and
/// flush the output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let summary = runtime
        .block_on(run_cli(cli))
        .context("failed to execute command")?;

    let mut stdout = io::stdout().lock();
    render_run_summary(&summary, &mut stdout).context("failed to render summary")?;
    stdout.flush().context("failed to flush output")?;
    Ok(())
}

/// Extracts the stable error code when the failure originated in the
/// simulation core.
fn simulation_error_code(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<CliError>()? {
        CliError::Core(core) => Some(core.code().as_str()),
        _ => None,
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Logging is unavailable while its own setup is failing"
)]
fn print_logging_failure(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
