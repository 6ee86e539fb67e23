//! Shared test utilities used across meshsim crates.

pub mod pbt;
pub mod tracing;
