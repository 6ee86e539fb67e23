//! Builder for configuring and validating a [`Simulation`].

use std::fmt;

use crate::error::{Endpoint, Result, SimError};
use crate::failure::{FailureSelector, UniformFailureSelector};
use crate::sim::{CycleBudget, Simulation};
use crate::topology::{Edge, NodeId, Topology};

/// Default number of mesh nodes.
pub const DEFAULT_NODE_COUNT: u32 = 25;

/// Default number of cycles for a bounded run.
pub const DEFAULT_CYCLE_COUNT: u32 = 30;

const DEFAULT_SOURCE: NodeId = NodeId::new(1);

/// Configures and validates a [`Simulation`].
///
/// Unset endpoints default to node `1` for the source and the highest node
/// id for the destination. When neither a selector nor a seed is supplied,
/// failures are drawn from an entropy-seeded selector.
///
/// # Examples
/// ```
/// use meshsim_core::{CycleBudget, SimulationBuilder};
///
/// let mut simulation = SimulationBuilder::new()
///     .with_node_count(4)
///     .with_edges([(1, 2), (2, 4), (1, 3), (3, 4)])
///     .with_seed(7)
///     .with_budget(CycleBudget::Bounded(2))
///     .build()?;
///
/// while !simulation.is_complete() {
///     simulation.run_cycle()?;
/// }
/// assert_eq!(simulation.cycles_completed(), 2);
/// # Ok::<(), meshsim_core::SimError>(())
/// ```
pub struct SimulationBuilder {
    node_count: u32,
    source: Option<NodeId>,
    destination: Option<NodeId>,
    edges: Vec<(u32, u32)>,
    budget: CycleBudget,
    seed: Option<u64>,
    selector: Option<Box<dyn FailureSelector>>,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            source: None,
            destination: None,
            edges: Vec::new(),
            budget: CycleBudget::Bounded(DEFAULT_CYCLE_COUNT),
            seed: None,
            selector: None,
        }
    }
}

impl SimulationBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of mesh nodes, numbered `1..=node_count`.
    #[must_use]
    pub fn with_node_count(mut self, node_count: u32) -> Self {
        self.node_count = node_count;
        self
    }

    /// Sets the routing source node.
    #[must_use]
    pub fn with_source(mut self, source: NodeId) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the routing destination node.
    #[must_use]
    pub fn with_destination(mut self, destination: NodeId) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Replaces the mesh link list with `edges`, given as endpoint id pairs.
    #[must_use]
    pub fn with_edges(mut self, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.edges = edges.into_iter().collect();
        self
    }

    /// Sets the cycle budget.
    #[must_use]
    pub fn with_budget(mut self, budget: CycleBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Seeds the default failure selector for reproducible runs.
    ///
    /// Ignored when [`SimulationBuilder::with_selector`] supplies a selector.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the failure selector.
    #[must_use]
    pub fn with_selector(mut self, selector: Box<dyn FailureSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Returns the configured node count.
    #[rustfmt::skip]
    #[must_use]
    pub fn node_count(&self) -> u32 { self.node_count }

    /// Returns the configured cycle budget.
    #[rustfmt::skip]
    #[must_use]
    pub fn budget(&self) -> CycleBudget { self.budget }

    /// Returns the configured selector seed, if any.
    #[rustfmt::skip]
    #[must_use]
    pub fn seed(&self) -> Option<u64> { self.seed }

    /// Validates the configuration and builds the simulation.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidNodeCount`] when fewer than two nodes are
    /// configured, [`SimError::EndpointOutOfRange`] or
    /// [`SimError::IdenticalEndpoints`] for invalid endpoints, and
    /// [`SimError::SelfLoopEdge`] or [`SimError::NodeOutOfRange`] for
    /// invalid links.
    pub fn build(self) -> Result<Simulation> {
        if self.node_count < 2 {
            return Err(SimError::InvalidNodeCount {
                got: self.node_count,
            });
        }
        let source = self.source.unwrap_or(DEFAULT_SOURCE);
        let destination = self
            .destination
            .unwrap_or_else(|| NodeId::new(self.node_count));
        for (endpoint, node) in [
            (Endpoint::Source, source),
            (Endpoint::Destination, destination),
        ] {
            if node.get() < 1 || node.get() > self.node_count {
                return Err(SimError::EndpointOutOfRange {
                    endpoint,
                    node,
                    node_count: self.node_count,
                });
            }
        }
        if source == destination {
            return Err(SimError::IdenticalEndpoints { node: source });
        }
        let edges = self
            .edges
            .iter()
            .map(|&(a, b)| Edge::try_new(NodeId::new(a), NodeId::new(b)))
            .collect::<Result<Vec<_>>>()?;
        let topology = Topology::from_edges(self.node_count, edges)?;
        let selector: Box<dyn FailureSelector> = match (self.selector, self.seed) {
            (Some(selector), _) => selector,
            (None, Some(seed)) => Box::new(UniformFailureSelector::from_seed(seed)),
            (None, None) => Box::new(UniformFailureSelector::from_entropy()),
        };
        Ok(Simulation::new(
            topology,
            selector,
            source,
            destination,
            self.budget,
        ))
    }
}

impl fmt::Debug for SimulationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationBuilder")
            .field("node_count", &self.node_count)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("edges", &self.edges)
            .field("budget", &self.budget)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
