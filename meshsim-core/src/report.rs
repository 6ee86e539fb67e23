//! Owned per-cycle outcome reports.
//!
//! A report captures everything a renderer needs about one completed cycle
//! without borrowing simulator state, so callers can keep reports after the
//! topology has been restored and mutated again.

use std::collections::BTreeSet;

use crate::extract::edges_from_path;
use crate::failure::FailureDraw;
use crate::routes::Route;
use crate::topology::{Edge, NodeId};

/// Classification of a node at report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// The node was drawn to fail this cycle.
    Failed,
    /// The node lies on the chosen source-to-destination path.
    OnPath,
    /// The node is active and off the chosen path.
    Active,
}

/// Mesh shape and routing endpoints a report describes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoutingContext {
    pub(crate) source: NodeId,
    pub(crate) destination: NodeId,
    pub(crate) node_count: u32,
}

/// Outcome of a single failure-and-recompute cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    cycle: u32,
    source: NodeId,
    destination: NodeId,
    draw: FailureDraw,
    removed_edges: Vec<Edge>,
    route: Route,
    reachable_edges: BTreeSet<Edge>,
    path_edges: Vec<Edge>,
    statuses: Vec<(NodeId, NodeStatus)>,
}

impl CycleReport {
    pub(crate) fn new(
        cycle: u32,
        draw: FailureDraw,
        removed_edges: Vec<Edge>,
        route: Route,
        reachable_edges: BTreeSet<Edge>,
        context: RoutingContext,
    ) -> Self {
        let path_edges = route.path().map_or_else(Vec::new, edges_from_path);
        let statuses = annotate_nodes(context.node_count, &draw, &route);
        Self {
            cycle,
            source: context.source,
            destination: context.destination,
            draw,
            removed_edges,
            route,
            reachable_edges,
            path_edges,
            statuses,
        }
    }

    /// Returns the one-based cycle number.
    #[rustfmt::skip]
    #[must_use]
    pub fn cycle(&self) -> u32 { self.cycle }

    /// Returns the routing source node.
    #[rustfmt::skip]
    #[must_use]
    pub fn source(&self) -> NodeId { self.source }

    /// Returns the routing destination node.
    #[rustfmt::skip]
    #[must_use]
    pub fn destination(&self) -> NodeId { self.destination }

    /// Returns the failure draw applied during the cycle.
    #[rustfmt::skip]
    #[must_use]
    pub fn failures(&self) -> &FailureDraw { &self.draw }

    /// Returns the links captured when the drawn nodes went offline.
    #[rustfmt::skip]
    #[must_use]
    pub fn removed_edges(&self) -> &[Edge] { &self.removed_edges }

    /// Returns the routing outcome between source and destination.
    #[rustfmt::skip]
    #[must_use]
    pub fn route(&self) -> &Route { &self.route }

    /// Returns the hop count of the chosen route, or `None` when the
    /// destination was unreachable.
    #[must_use]
    pub fn hop_count(&self) -> Option<usize> {
        self.route.hop_count()
    }

    /// Returns every link used by any shortest path over the degraded
    /// topology.
    #[rustfmt::skip]
    #[must_use]
    pub fn reachable_edges(&self) -> &BTreeSet<Edge> { &self.reachable_edges }

    /// Returns the links of the chosen route in traversal order.
    #[rustfmt::skip]
    #[must_use]
    pub fn path_edges(&self) -> &[Edge] { &self.path_edges }

    /// Returns one status per node, in ascending id order.
    #[rustfmt::skip]
    #[must_use]
    pub fn node_statuses(&self) -> &[(NodeId, NodeStatus)] { &self.statuses }
}

/// Classifies every node id, failed status taking precedence over path
/// membership.
fn annotate_nodes(
    node_count: u32,
    draw: &FailureDraw,
    route: &Route,
) -> Vec<(NodeId, NodeStatus)> {
    let on_path: BTreeSet<NodeId> = route
        .path()
        .map_or_else(BTreeSet::new, |path| path.nodes().iter().copied().collect());
    (1..=node_count)
        .map(NodeId::new)
        .map(|node| {
            let status = if draw.nodes().contains(&node) {
                NodeStatus::Failed
            } else if on_path.contains(&node) {
                NodeStatus::OnPath
            } else {
                NodeStatus::Active
            };
            (node, status)
        })
        .collect()
}
