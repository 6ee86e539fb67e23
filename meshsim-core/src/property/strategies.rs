//! Mesh and failure-draw generation for property tests.
//!
//! Provides a proptest strategy for arbitrary meshes plus a deterministic
//! generator over named shapes so rstest cases can pin coverage to specific
//! structures (chains, rings, stars, disconnected halves).

use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::error::Result;
use crate::failure::MAX_FAILURES_PER_CYCLE;
use crate::topology::{Edge, NodeId, Topology};

/// A generated mesh with a failure draw to apply against it.
///
/// Edges are distinct-endpoint pairs within `1..=node_count`; failures never
/// include node 1, matching the engine's candidate pool.
#[derive(Debug, Clone)]
pub(super) struct MeshFixture {
    pub(super) node_count: u32,
    pub(super) edges: Vec<(u32, u32)>,
    pub(super) failures: BTreeSet<NodeId>,
}

impl MeshFixture {
    /// Builds the baseline topology described by the fixture.
    pub(super) fn topology(&self) -> Result<Topology> {
        let edges = self
            .edges
            .iter()
            .map(|&(a, b)| Edge::try_new(NodeId::new(a), NodeId::new(b)))
            .collect::<Result<Vec<_>>>()?;
        Topology::from_edges(self.node_count, edges)
    }
}

/// Named mesh structures for parameterised coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MeshShape {
    /// A single chain from node 1 to the highest node.
    Line,
    /// A chain closed back to node 1.
    Ring,
    /// Every node linked directly to node 1.
    Star,
    /// A few random links, usually leaving parts unreachable.
    Sparse,
    /// Roughly half of all possible links present.
    Dense,
    /// Two internally chained halves with no bridge between them.
    Disconnected,
}

impl MeshShape {
    fn edges(self, node_count: u32, rng: &mut SmallRng) -> Vec<(u32, u32)> {
        match self {
            Self::Line => (1..node_count).map(|i| (i, i + 1)).collect(),
            Self::Ring => {
                let mut edges: Vec<_> = (1..node_count).map(|i| (i, i + 1)).collect();
                edges.push((node_count, 1));
                edges
            }
            Self::Star => (2..=node_count).map(|i| (1, i)).collect(),
            Self::Sparse => (0..node_count)
                .filter_map(|_| {
                    let a = rng.gen_range(1..=node_count);
                    let b = rng.gen_range(1..=node_count);
                    (a != b).then_some((a, b))
                })
                .collect(),
            Self::Dense => {
                let mut edges = Vec::new();
                for a in 1..node_count {
                    for b in (a + 1)..=node_count {
                        if rng.gen_bool(0.5) {
                            edges.push((a, b));
                        }
                    }
                }
                edges
            }
            Self::Disconnected => {
                let half = node_count / 2;
                (1..half)
                    .map(|i| (i, i + 1))
                    .chain(((half + 1)..node_count).map(|i| (i, i + 1)))
                    .collect()
            }
        }
    }
}

/// Generates a fixture of the given shape from a seeded RNG.
pub(super) fn generate_fixture(shape: MeshShape, rng: &mut SmallRng) -> MeshFixture {
    let node_count = rng.gen_range(6..=24);
    let edges = shape.edges(node_count, rng);
    let picks = rng.gen_range(1..=MAX_FAILURES_PER_CYCLE);
    let mut failures = BTreeSet::new();
    for _ in 0..picks {
        failures.insert(NodeId::new(rng.gen_range(2..=node_count)));
    }
    MeshFixture {
        node_count,
        edges,
        failures,
    }
}

/// Strategy over arbitrary meshes and failure draws.
pub(super) fn mesh_fixture_strategy() -> impl Strategy<Value = MeshFixture> {
    (2u32..=32)
        .prop_flat_map(|node_count| {
            let pair = (1..=node_count, 1..=node_count);
            let max_edges = node_count as usize * 2;
            (
                Just(node_count),
                prop::collection::vec(pair, 0..=max_edges),
                prop::collection::vec(2..=node_count, 0..=MAX_FAILURES_PER_CYCLE),
            )
        })
        .prop_map(|(node_count, raw_edges, raw_failures)| MeshFixture {
            node_count,
            edges: raw_edges.into_iter().filter(|&(a, b)| a != b).collect(),
            failures: raw_failures.into_iter().map(NodeId::new).collect(),
        })
}
