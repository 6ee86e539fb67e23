//! Shared fixtures for the simulation integration tests.

use std::collections::{BTreeSet, VecDeque};

use meshsim_core::{FailureDraw, FailureSelector, NodeId};

/// Selector that replays a fixed sequence of failure sets, then draws
/// nothing.
pub struct ScriptedSelector {
    draws: VecDeque<BTreeSet<NodeId>>,
}

impl ScriptedSelector {
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = BTreeSet<NodeId>>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }
}

impl FailureSelector for ScriptedSelector {
    fn select(&mut self, _candidates: &[NodeId]) -> FailureDraw {
        let nodes = self.draws.pop_front().unwrap_or_default();
        FailureDraw::new(nodes.len(), nodes)
    }
}

/// Edge list of a well-connected 25-node mesh: a ring with long chords.
#[must_use]
pub fn demo_mesh_edges() -> Vec<(u32, u32)> {
    let mut edges: Vec<(u32, u32)> = (1..25).map(|i| (i, i + 1)).collect();
    edges.push((25, 1));
    edges.extend([
        (1, 5),
        (5, 10),
        (10, 15),
        (15, 20),
        (20, 25),
        (2, 14),
        (4, 22),
        (7, 19),
        (9, 17),
        (12, 24),
        (3, 16),
        (6, 21),
        (8, 23),
        (11, 18),
    ]);
    edges
}
