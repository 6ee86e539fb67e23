//! Property: removal followed by restoration is an exact round-trip.
//!
//! For any generated mesh and failure draw, removing the drawn nodes and
//! restoring the capture must reproduce the baseline membership snapshot,
//! and restoring the same capture again must change nothing.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use super::strategies::MeshFixture;

/// Runs the restoration round-trip property for the given fixture.
pub(super) fn run_restoration_round_trip_property(fixture: &MeshFixture) -> TestCaseResult {
    let mut topology = fixture.topology().map_err(|e| {
        TestCaseError::fail(format!(
            "fixture topology failed to build: {e} (nodes={}, edges={})",
            fixture.node_count,
            fixture.edges.len(),
        ))
    })?;
    let baseline = topology.snapshot();

    let removed = topology.remove_nodes(&fixture.failures);
    for &node in removed.nodes() {
        if topology.is_active(node) {
            return Err(TestCaseError::fail(format!(
                "node {node} still active after removal (nodes={}, failures={:?})",
                fixture.node_count, fixture.failures,
            )));
        }
    }

    topology.restore(&removed).map_err(|e| {
        TestCaseError::fail(format!(
            "restore failed: {e} (nodes={}, failures={:?})",
            fixture.node_count, fixture.failures,
        ))
    })?;
    if topology.snapshot() != baseline {
        return Err(TestCaseError::fail(format!(
            "restored membership diverged from baseline: {}/{} nodes, {}/{} edges",
            topology.snapshot().node_count(),
            baseline.node_count(),
            topology.snapshot().edge_count(),
            baseline.edge_count(),
        )));
    }

    topology.restore(&removed).map_err(|e| {
        TestCaseError::fail(format!(
            "second restore failed: {e} (nodes={}, failures={:?})",
            fixture.node_count, fixture.failures,
        ))
    })?;
    if topology.snapshot() != baseline {
        return Err(TestCaseError::fail(
            "second restore changed the membership".to_string(),
        ));
    }
    Ok(())
}
