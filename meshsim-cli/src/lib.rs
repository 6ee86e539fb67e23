//! Support library for the meshsim CLI binary.
//!
//! Exposes the command pipeline so integration tests and doctests can drive
//! it in-process without forking a subprocess.

pub mod activity;
pub mod cli;
pub mod driver;
pub mod edge_list;
pub mod logging;
