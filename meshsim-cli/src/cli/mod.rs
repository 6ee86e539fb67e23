//! Command-line interface orchestration for the meshsim binary.
//!
//! The CLI offers a single `run` command that loads an edge list and drives
//! the periodic failure-and-recompute loop, mirroring each cycle report to
//! stdout and the activity log.

mod commands;

pub use commands::{Cli, CliError, Command, RunCommand, render_run_summary, run_cli};
