//! The failure-injection-and-recompute cycle engine.
//!
//! Each cycle draws a batch of nodes to fail, takes them offline, recomputes
//! shortest paths over the degraded topology, reports the outcome, and
//! restores the topology to its baseline. Restoration is verified against a
//! snapshot taken at cycle start; any divergence aborts the run rather than
//! letting later cycles observe a corrupted mesh.

use tracing::{Span, field, info, instrument};

use crate::error::{Result, SimError};
use crate::extract::edges_from_map;
use crate::failure::FailureSelector;
use crate::report::{CycleReport, RoutingContext};
use crate::routes::all_pairs_shortest_paths;
use crate::topology::{NodeId, Topology};

/// Number of cycles a simulation runs before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleBudget {
    /// Run exactly this many cycles.
    Bounded(u32),
    /// Run until the caller stops the simulation.
    Forever,
}

/// Position of the engine within a cycle.
///
/// A healthy simulation reads [`CyclePhase::Idle`] between cycles. After a
/// failed [`Simulation::run_cycle`] the phase reports where the cycle
/// stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Between cycles; the topology is at baseline.
    Idle,
    /// Drawing the failure batch.
    Selecting,
    /// Failed nodes are offline.
    Mutated,
    /// Shortest paths recomputed over the degraded topology.
    Computed,
    /// The cycle report has been assembled.
    Reported,
    /// The topology has been restored and awaits verification.
    Restored,
}

/// Simulation engine driving repeated failure-and-recompute cycles.
///
/// Built through [`crate::SimulationBuilder`]. Each [`Simulation::run_cycle`]
/// call performs one complete cycle and returns an owned [`CycleReport`];
/// the topology is back at baseline when the call returns successfully.
pub struct Simulation {
    topology: Topology,
    selector: Box<dyn FailureSelector>,
    source: NodeId,
    destination: NodeId,
    budget: CycleBudget,
    candidates: Vec<NodeId>,
    cycles_completed: u32,
    phase: CyclePhase,
}

impl Simulation {
    pub(crate) fn new(
        topology: Topology,
        selector: Box<dyn FailureSelector>,
        source: NodeId,
        destination: NodeId,
        budget: CycleBudget,
    ) -> Self {
        let candidates = (1..=topology.node_count())
            .map(NodeId::new)
            .filter(|&node| node != source)
            .collect();
        Self {
            topology,
            selector,
            source,
            destination,
            budget,
            candidates,
            cycles_completed: 0,
            phase: CyclePhase::Idle,
        }
    }

    /// Runs one failure-and-recompute cycle.
    ///
    /// # Errors
    /// Returns [`SimError::RestoreMismatch`] when the restored topology does
    /// not match the snapshot captured at cycle start, and propagates any
    /// restoration failure. Both leave the simulation mid-cycle; see
    /// [`Simulation::phase`].
    pub fn run_cycle(&mut self) -> Result<CycleReport> {
        let cycle = self.cycles_completed + 1;
        self.run_cycle_inner(cycle)
    }

    #[instrument(
        name = "sim.cycle",
        err,
        skip(self),
        fields(
            cycle = cycle,
            failures = field::Empty,
            outcome = field::Empty,
            hops = field::Empty,
        )
    )]
    fn run_cycle_inner(&mut self, cycle: u32) -> Result<CycleReport> {
        let baseline = self.topology.snapshot();

        self.phase = CyclePhase::Selecting;
        let draw = self.selector.select(&self.candidates);
        Span::current().record("failures", draw.nodes().len());

        self.phase = CyclePhase::Mutated;
        let removed = self.topology.remove_nodes(draw.nodes());

        self.phase = CyclePhase::Computed;
        let map = all_pairs_shortest_paths(&self.topology);
        let route = map.route(self.source, self.destination);
        let reachable_edges = edges_from_map(&map);
        match route.hop_count() {
            Some(hops) => {
                Span::current().record("outcome", "reachable");
                Span::current().record("hops", hops);
            }
            None => {
                Span::current().record("outcome", "unreachable");
            }
        }

        self.phase = CyclePhase::Reported;
        let report = CycleReport::new(
            cycle,
            draw,
            removed.edges().to_vec(),
            route,
            reachable_edges,
            RoutingContext {
                source: self.source,
                destination: self.destination,
                node_count: self.topology.node_count(),
            },
        );

        self.phase = CyclePhase::Restored;
        self.topology.restore(&removed)?;
        let restored = self.topology.snapshot();
        if restored != baseline {
            return Err(SimError::RestoreMismatch {
                cycle,
                expected_nodes: baseline.node_count(),
                actual_nodes: restored.node_count(),
                expected_edges: baseline.edge_count(),
                actual_edges: restored.edge_count(),
            });
        }

        self.cycles_completed = cycle;
        self.phase = CyclePhase::Idle;
        info!(cycle, "cycle completed");
        Ok(report)
    }

    /// Returns the baseline topology.
    #[rustfmt::skip]
    #[must_use]
    pub fn topology(&self) -> &Topology { &self.topology }

    /// Returns the routing source node.
    #[rustfmt::skip]
    #[must_use]
    pub fn source(&self) -> NodeId { self.source }

    /// Returns the routing destination node.
    #[rustfmt::skip]
    #[must_use]
    pub fn destination(&self) -> NodeId { self.destination }

    /// Returns the configured cycle budget.
    #[rustfmt::skip]
    #[must_use]
    pub fn budget(&self) -> CycleBudget { self.budget }

    /// Returns the number of cycles completed so far.
    #[rustfmt::skip]
    #[must_use]
    pub fn cycles_completed(&self) -> u32 { self.cycles_completed }

    /// Returns the engine's position within the current cycle.
    #[rustfmt::skip]
    #[must_use]
    pub fn phase(&self) -> CyclePhase { self.phase }

    /// Returns the nodes eligible to fail, in ascending id order.
    ///
    /// The source is never eligible; the destination is.
    #[rustfmt::skip]
    #[must_use]
    pub fn failure_candidates(&self) -> &[NodeId] { &self.candidates }

    /// Returns whether the cycle budget has been exhausted.
    ///
    /// A [`CycleBudget::Forever`] simulation never completes on its own.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.budget {
            CycleBudget::Bounded(cycles) => self.cycles_completed >= cycles,
            CycleBudget::Forever => false,
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("topology", &self.topology)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("budget", &self.budget)
            .field("cycles_completed", &self.cycles_completed)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
