//! Property-based tests for the failure-and-recompute cycle primitives.
//!
//! Verifies breadth-first routing against a Floyd-Warshall distance oracle,
//! validates restoration round-trips across generated meshes and failure
//! draws, and checks that reachable-link extraction never strays off the
//! active topology.

mod oracle;
mod restoration;
mod routing;
mod strategies;
