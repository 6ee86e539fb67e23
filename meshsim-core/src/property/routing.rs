//! Properties: breadth-first routes are minimal and well-formed.
//!
//! Checks every pair of active nodes on the degraded topology against the
//! Floyd-Warshall oracle: reachability must agree, hop counts must match
//! the oracle's distances, and returned paths must walk adjacent active
//! nodes from source to destination. A separate property confirms that
//! reachable-link extraction only ever reports links present on the active
//! topology.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::extract::{edges_from_map, edges_from_path};
use crate::routes::all_pairs_shortest_paths;
use crate::topology::Topology;

use super::oracle::all_pairs_distances;
use super::strategies::MeshFixture;

fn degraded_topology(fixture: &MeshFixture) -> Result<Topology, TestCaseError> {
    let mut topology = fixture.topology().map_err(|e| {
        TestCaseError::fail(format!(
            "fixture topology failed to build: {e} (nodes={}, edges={})",
            fixture.node_count,
            fixture.edges.len(),
        ))
    })?;
    topology.remove_nodes(&fixture.failures);
    Ok(topology)
}

/// Runs the route minimality property for the given fixture.
pub(super) fn run_route_minimality_property(fixture: &MeshFixture) -> TestCaseResult {
    let topology = degraded_topology(fixture)?;
    let oracle = all_pairs_distances(&topology);
    let map = all_pairs_shortest_paths(&topology);
    let active_edges = topology.edge_set();

    for source in topology.active_nodes() {
        for destination in topology.active_nodes() {
            let expected = oracle.get(source, destination);
            let path = map.path(source, destination);
            match (path, expected) {
                (Some(path), Some(distance)) => {
                    if path.hop_count() != distance {
                        return Err(TestCaseError::fail(format!(
                            "path {source}->{destination} has {} hops, oracle says {distance}",
                            path.hop_count(),
                        )));
                    }
                    if path.nodes().first() != Some(&source)
                        || path.nodes().last() != Some(&destination)
                    {
                        return Err(TestCaseError::fail(format!(
                            "path {source}->{destination} has wrong endpoints: {:?}",
                            path.nodes(),
                        )));
                    }
                    for link in edges_from_path(path) {
                        if !active_edges.contains(&link) {
                            return Err(TestCaseError::fail(format!(
                                "path {source}->{destination} walks absent link \
                                 {}-{}",
                                link.lower(),
                                link.upper(),
                            )));
                        }
                    }
                }
                (None, None) => {}
                (Some(_), None) => {
                    return Err(TestCaseError::fail(format!(
                        "route {source}->{destination} found but oracle says disconnected",
                    )));
                }
                (None, Some(distance)) => {
                    return Err(TestCaseError::fail(format!(
                        "route {source}->{destination} missing but oracle says {distance} hops",
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Runs the reachable-link extraction property for the given fixture.
pub(super) fn run_reachable_edges_property(fixture: &MeshFixture) -> TestCaseResult {
    let topology = degraded_topology(fixture)?;
    let map = all_pairs_shortest_paths(&topology);
    let active_edges = topology.edge_set();

    for link in edges_from_map(&map) {
        if !active_edges.contains(&link) {
            return Err(TestCaseError::fail(format!(
                "reachable link {}-{} is not on the active topology (nodes={}, failures={:?})",
                link.lower(),
                link.upper(),
                fixture.node_count,
                fixture.failures,
            )));
        }
    }
    Ok(())
}
