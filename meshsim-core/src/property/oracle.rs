//! Floyd-Warshall distance oracle for routing equivalence checks.
//!
//! Computes unit-weight shortest-path distances over the active topology by
//! relaxation, with no tie-breaking concerns, so breadth-first results can
//! be checked for minimality independently of traversal order.

use std::collections::BTreeMap;

use crate::topology::{NodeId, Topology};

/// Pairwise hop distances between active nodes.
pub(super) struct DistanceMatrix {
    distances: BTreeMap<(NodeId, NodeId), usize>,
}

impl DistanceMatrix {
    /// Returns the hop distance between a pair, or `None` when disconnected.
    pub(super) fn get(&self, source: NodeId, destination: NodeId) -> Option<usize> {
        self.distances.get(&(source, destination)).copied()
    }
}

/// Computes all pairwise distances over the active topology.
pub(super) fn all_pairs_distances(topology: &Topology) -> DistanceMatrix {
    let nodes: Vec<NodeId> = topology.active_nodes().collect();
    let mut distances = BTreeMap::new();
    for &node in &nodes {
        distances.insert((node, node), 0);
        for neighbour in topology.neighbours(node) {
            distances.insert((node, neighbour), 1);
        }
    }
    for &via in &nodes {
        for &from in &nodes {
            for &to in &nodes {
                let through = match (distances.get(&(from, via)), distances.get(&(via, to))) {
                    (Some(&head), Some(&tail)) => head + tail,
                    _ => continue,
                };
                if distances
                    .get(&(from, to))
                    .is_none_or(|&current| through < current)
                {
                    distances.insert((from, to), through);
                }
            }
        }
    }
    DistanceMatrix { distances }
}
