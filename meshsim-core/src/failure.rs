//! Random failure selection for simulation cycles.
//!
//! Each cycle draws a batch of nodes to take offline. The draw count is
//! sampled uniformly, then that many picks are made from the candidate pool
//! with replacement, so the distinct failure set can be smaller than the
//! number of picks. Selection is pluggable through [`FailureSelector`] so
//! tests can script exact failure sequences.

use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::topology::NodeId;

/// Upper bound on the number of failure picks per cycle.
pub const MAX_FAILURES_PER_CYCLE: usize = 5;

/// Outcome of one failure draw.
///
/// `requested` counts the picks made; `nodes` holds the distinct nodes those
/// picks landed on. Repeated picks of the same node collapse, so
/// `nodes.len() <= requested` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDraw {
    requested: usize,
    nodes: BTreeSet<NodeId>,
}

impl FailureDraw {
    /// Creates a draw from a pick count and the distinct nodes picked.
    #[must_use]
    pub fn new(requested: usize, nodes: BTreeSet<NodeId>) -> Self {
        Self { requested, nodes }
    }

    /// Returns the number of picks made, including repeats.
    #[rustfmt::skip]
    #[must_use]
    pub fn requested(&self) -> usize { self.requested }

    /// Returns the distinct nodes selected to fail, in ascending order.
    #[rustfmt::skip]
    #[must_use]
    pub fn nodes(&self) -> &BTreeSet<NodeId> { &self.nodes }
}

/// Source of per-cycle failure draws.
///
/// Implementations pick only from the `candidates` slice they are given and
/// keep `requested` within `1..=`[`MAX_FAILURES_PER_CYCLE`] whenever the
/// slice is non-empty. An empty slice yields an empty draw.
pub trait FailureSelector {
    /// Draws the nodes that fail this cycle.
    fn select(&mut self, candidates: &[NodeId]) -> FailureDraw;
}

/// Selector that picks uniformly at random from the candidate pool.
///
/// # Examples
/// ```
/// use meshsim_core::{
///     FailureSelector, MAX_FAILURES_PER_CYCLE, NodeId, UniformFailureSelector,
/// };
///
/// let candidates: Vec<NodeId> = (2..=25).map(NodeId::new).collect();
/// let mut selector = UniformFailureSelector::from_seed(42);
/// let draw = selector.select(&candidates);
///
/// assert!((1..=MAX_FAILURES_PER_CYCLE).contains(&draw.requested()));
/// assert!(draw.nodes().len() <= draw.requested());
/// assert!(draw.nodes().iter().all(|node| candidates.contains(node)));
/// ```
#[derive(Debug, Clone)]
pub struct UniformFailureSelector {
    rng: SmallRng,
}

impl UniformFailureSelector {
    /// Creates a selector with a fixed seed for reproducible runs.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates a selector seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl FailureSelector for UniformFailureSelector {
    fn select(&mut self, candidates: &[NodeId]) -> FailureDraw {
        if candidates.is_empty() {
            return FailureDraw::new(0, BTreeSet::new());
        }
        let requested = self.rng.gen_range(1..=MAX_FAILURES_PER_CYCLE);
        let mut nodes = BTreeSet::new();
        for _ in 0..requested {
            if let Some(&node) = candidates.choose(&mut self.rng) {
                nodes.insert(node);
            }
        }
        FailureDraw::new(requested, nodes)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn candidate_pool() -> Vec<NodeId> {
        (2..=25).map(NodeId::new).collect()
    }

    #[rstest]
    #[case::zero(0)]
    #[case::small(17)]
    #[case::large(0xDEAD_BEEF)]
    fn draws_stay_within_bounds(#[case] seed: u64) {
        let candidates = candidate_pool();
        let mut selector = UniformFailureSelector::from_seed(seed);
        for _ in 0..50 {
            let draw = selector.select(&candidates);
            assert!((1..=MAX_FAILURES_PER_CYCLE).contains(&draw.requested()));
            assert!(!draw.nodes().is_empty());
            assert!(draw.nodes().len() <= draw.requested());
            assert!(draw.nodes().iter().all(|node| candidates.contains(node)));
        }
    }

    #[test]
    fn same_seed_yields_the_same_sequence() {
        let candidates = candidate_pool();
        let mut left = UniformFailureSelector::from_seed(7);
        let mut right = UniformFailureSelector::from_seed(7);
        for _ in 0..10 {
            assert_eq!(left.select(&candidates), right.select(&candidates));
        }
    }

    #[test]
    fn empty_candidate_pool_yields_an_empty_draw() {
        let mut selector = UniformFailureSelector::from_seed(0);
        let draw = selector.select(&[]);
        assert_eq!(draw.requested(), 0);
        assert!(draw.nodes().is_empty());
    }

    #[test]
    fn single_candidate_pools_always_pick_that_node() {
        let only = NodeId::new(9);
        let mut selector = UniformFailureSelector::from_seed(3);
        for _ in 0..10 {
            let draw = selector.select(&[only]);
            assert_eq!(draw.nodes(), &BTreeSet::from([only]));
        }
    }
}
