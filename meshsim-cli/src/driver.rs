//! Periodic cycle driver with cooperative shutdown.
//!
//! Runs the simulation on a fixed interval, mirroring each cycle report to
//! the console and the activity log. The first cycle fires immediately;
//! later cycles wait out the interval. A shutdown signal takes priority over
//! a due tick, so an interrupt never races a fresh cycle.

use std::io::Write;
use std::time::Duration;

use meshsim_core::{CycleReport, Simulation};
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::activity::{ActivityLog, render_report};
use crate::cli::CliError;

/// Aggregate outcome of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    cycles: u32,
    unreachable: u32,
}

impl RunSummary {
    /// Returns how many cycles ran.
    #[rustfmt::skip]
    #[must_use]
    pub fn cycles(self) -> u32 { self.cycles }

    /// Returns how many cycles left the destination unreachable.
    #[rustfmt::skip]
    #[must_use]
    pub fn unreachable(self) -> u32 { self.unreachable }

    fn observe(&mut self, report: &CycleReport) {
        self.cycles += 1;
        if !report.route().is_reachable() {
            self.unreachable += 1;
        }
    }
}

/// Drives the simulation until its cycle budget is exhausted or shutdown is
/// signalled.
///
/// # Errors
/// Returns [`CliError`] when a cycle fails or a report cannot be written to
/// the console or the activity log.
pub async fn drive<W: Write>(
    simulation: &mut Simulation,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
    console: &mut W,
    log: &mut ActivityLog,
) -> Result<RunSummary, CliError> {
    let mut summary = RunSummary::default();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !simulation.is_complete() {
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                info!(cycles = summary.cycles(), "shutdown requested; stopping run");
                break;
            }
            _ = ticker.tick() => {
                let report = simulation.run_cycle()?;
                render_report(&report, &mut *console)
                    .map_err(|source| CliError::Report { source })?;
                console
                    .flush()
                    .map_err(|source| CliError::Report { source })?;
                log.record(&report)?;
                summary.observe(&report);
            }
        }
    }

    Ok(summary)
}
