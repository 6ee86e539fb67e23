//! Command implementations and argument parsing for the meshsim CLI.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use meshsim_core::{
    CycleBudget, DEFAULT_CYCLE_COUNT, DEFAULT_NODE_COUNT, NodeId, SimError, SimulationBuilder,
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{Span, field, info, instrument};

use crate::activity::{ActivityLog, ActivityLogError};
use crate::driver::{self, RunSummary};
use crate::edge_list::{self, EdgeListError};

const DEFAULT_INTERVAL_MS: u64 = 9000;
const DEFAULT_LOG_PATH: &str = "activity-log.txt";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "meshsim",
    about = "Simulate mesh routing resilience under transient node failures."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the periodic failure-and-recompute loop.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the edge list file, one `a b` pair per line.
    #[arg(long)]
    pub edges: PathBuf,

    /// Number of mesh nodes, numbered upwards from 1.
    #[arg(long, default_value_t = DEFAULT_NODE_COUNT)]
    pub nodes: u32,

    /// Source node for route computation.
    #[arg(long, default_value_t = 1)]
    pub source: u32,

    /// Destination node for route computation (defaults to the highest node).
    #[arg(long)]
    pub destination: Option<u32>,

    /// Number of cycles to run.
    #[arg(long, default_value_t = DEFAULT_CYCLE_COUNT, conflicts_with = "repeat")]
    pub cycles: u32,

    /// Keep cycling until interrupted.
    #[arg(long)]
    pub repeat: bool,

    /// Milliseconds between cycle starts.
    #[arg(long = "interval-ms", default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Seed for the failure selector; omit for entropy seeding.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path of the activity log to append to.
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    pub log: PathBuf,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Edge list loading failed.
    #[error(transparent)]
    EdgeList(#[from] EdgeListError),
    /// Activity log I/O failed.
    #[error(transparent)]
    Activity(#[from] ActivityLogError),
    /// Writing a cycle report to the console failed.
    #[error("failed to render cycle report: {source}")]
    Report {
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Simulation configuration or execution failed.
    #[error(transparent)]
    Core(#[from] SimError),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading inputs, running cycles, or writing
/// reports fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use meshsim_cli::cli::{Cli, Command, RunCommand, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let edges = dir.path().join("mesh.txt");
/// std::fs::write(&edges, "1 2\n2 3\n1 3\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         edges,
///         nodes: 3,
///         source: 1,
///         destination: None,
///         cycles: 1,
///         repeat: false,
///         interval_ms: 1,
///         seed: Some(7),
///         log: dir.path().join("activity-log.txt"),
///     }),
/// };
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .enable_all()
///     .build()?;
/// let summary = runtime.block_on(run_cli(cli))?;
/// assert_eq!(summary.cycles(), 1);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub async fn run_cli(cli: Cli) -> Result<RunSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run).await
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        edges = field::Empty,
        nodes = field::Empty,
        cycles = field::Empty,
        interval_ms = field::Empty,
    ),
)]
pub(super) async fn run_command(command: RunCommand) -> Result<RunSummary, CliError> {
    let span = Span::current();
    span.record("edges", field::display(command.edges.display()));
    span.record("nodes", command.nodes);
    span.record("interval_ms", command.interval_ms);

    let budget = if command.repeat {
        span.record("cycles", field::display("unbounded"));
        CycleBudget::Forever
    } else {
        span.record("cycles", command.cycles);
        CycleBudget::Bounded(command.cycles)
    };

    let edges = edge_list::load(&command.edges)?;
    let destination = command.destination.unwrap_or(command.nodes);
    let mut builder = SimulationBuilder::new()
        .with_node_count(command.nodes)
        .with_source(NodeId::new(command.source))
        .with_destination(NodeId::new(destination))
        .with_edges(edges)
        .with_budget(budget);
    if let Some(seed) = command.seed {
        builder = builder.with_seed(seed);
    }
    let mut simulation = builder.build()?;

    let mut log = ActivityLog::create(&command.log)?;
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    let mut console = io::stdout();
    let summary = driver::drive(
        &mut simulation,
        Duration::from_millis(command.interval_ms),
        shutdown_rx,
        &mut console,
        &mut log,
    )
    .await?;
    log.flush()?;

    info!(
        cycles = summary.cycles(),
        unreachable = summary.unreachable(),
        log = field::display(log.path().display()),
        "simulation completed"
    );
    Ok(summary)
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::io::Cursor;
/// # use meshsim_cli::cli::render_run_summary;
/// # use meshsim_cli::driver::RunSummary;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = RunSummary::default();
/// let mut buffer = Cursor::new(Vec::new());
/// render_run_summary(&summary, &mut buffer)?;
/// assert_eq!(buffer.into_inner().len(), 52);
/// # Ok(())
/// # }
/// ```
pub fn render_run_summary(summary: &RunSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "cycles completed: {}", summary.cycles())?;
    writeln!(
        writer,
        "destination unreachable: {} of {}",
        summary.unreachable(),
        summary.cycles()
    )?;
    Ok(())
}
