//! Cycle report rendering and the activity log file.
//!
//! The same per-cycle block is written to the console and appended to the
//! activity log, so the on-disk record matches what the operator saw. The
//! log is append-only: repeated runs against the same file accumulate, each
//! starting with a fresh header block.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use meshsim_core::CycleReport;
use thiserror::Error;

/// Error raised when the activity log cannot be opened or written.
#[derive(Debug, Error)]
#[error("failed to write activity log `{path}`: {source}")]
pub struct ActivityLogError {
    /// Path of the log file.
    path: PathBuf,
    /// Underlying operating system error.
    #[source]
    source: io::Error,
}

impl ActivityLogError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Renders one cycle report as a text block.
///
/// The block names the cycle, the failed nodes in ascending order, and
/// either the chosen route with its hop count or an unreachable notice. A
/// trailing blank line separates consecutive cycles.
///
/// # Errors
/// Returns [`io::Error`] when the underlying writer fails.
pub fn render_report(report: &CycleReport, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "Cycle {}", report.cycle())?;
    writeln!(writer, "Node failures: {}", join_ids(report))?;
    match report.route().path() {
        Some(path) => {
            let steps: Vec<String> = path.nodes().iter().map(ToString::to_string).collect();
            writeln!(writer, "Shortest path: {}", steps.join(" -> "))?;
            writeln!(writer, "Hop count: {}", path.hop_count())?;
        }
        None => {
            writeln!(
                writer,
                "No path between node {} and node {}.",
                report.source(),
                report.destination(),
            )?;
            writeln!(writer, "Destination unreachable.")?;
        }
    }
    writeln!(writer)
}

fn join_ids(report: &CycleReport) -> String {
    report
        .failures()
        .nodes()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Append-only activity log mirroring the console output.
pub struct ActivityLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ActivityLog {
    /// Opens the log at `path`, creating it if needed, and writes the run
    /// header.
    ///
    /// # Errors
    /// Returns [`ActivityLogError`] when the file cannot be opened or the
    /// header cannot be written.
    pub fn create(path: &Path) -> Result<Self, ActivityLogError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| ActivityLogError::new(path, source))?;
        let mut log = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        };
        log.write_header()?;
        Ok(log)
    }

    fn write_header(&mut self) -> Result<(), ActivityLogError> {
        let write = |writer: &mut BufWriter<File>| -> io::Result<()> {
            writeln!(writer, "meshsim activity log")?;
            writeln!(writer, "--------------------")?;
            writeln!(writer)
        };
        write(&mut self.writer).map_err(|source| ActivityLogError::new(&self.path, source))
    }

    /// Appends one cycle report to the log.
    ///
    /// # Errors
    /// Returns [`ActivityLogError`] when the report cannot be written.
    pub fn record(&mut self, report: &CycleReport) -> Result<(), ActivityLogError> {
        render_report(report, &mut self.writer)
            .map_err(|source| ActivityLogError::new(&self.path, source))
    }

    /// Flushes buffered output to disk.
    ///
    /// # Errors
    /// Returns [`ActivityLogError`] when the flush fails.
    pub fn flush(&mut self) -> Result<(), ActivityLogError> {
        self.writer
            .flush()
            .map_err(|source| ActivityLogError::new(&self.path, source))
    }

    /// Returns the path this log writes to.
    #[rustfmt::skip]
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }
}
