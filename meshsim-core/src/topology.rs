//! Mesh topology storage with reversible node removal.
//!
//! Nodes are fixed at construction and only ever marked present or absent.
//! Failure injection deactivates nodes after capturing their incident links
//! so a later [`Topology::restore`] can reinstate the pre-failure state
//! exactly. Adjacency is held in ordered collections, which makes neighbour
//! iteration ascend by node id and keeps traversal order deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{Result, SimError};

/// Identifier for a mesh node.
///
/// Valid identifiers run from `1` to the topology's node count.
///
/// # Examples
/// ```
/// use meshsim_core::NodeId;
///
/// let id = NodeId::new(7);
/// assert_eq!(id.get(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new node identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u32) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Undirected link between two distinct nodes.
///
/// Endpoints are stored in ascending order so `{u, v}` and `{v, u}` compare
/// equal.
///
/// # Examples
/// ```
/// use meshsim_core::{Edge, NodeId};
///
/// let forward = Edge::try_new(NodeId::new(4), NodeId::new(9))?;
/// let reverse = Edge::try_new(NodeId::new(9), NodeId::new(4))?;
/// assert_eq!(forward, reverse);
/// assert_eq!(forward.lower().get(), 4);
/// # Ok::<(), meshsim_core::SimError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    lower: NodeId,
    upper: NodeId,
}

impl Edge {
    /// Creates an edge, normalising endpoint order.
    ///
    /// # Errors
    /// Returns [`SimError::SelfLoopEdge`] when both endpoints are the same
    /// node.
    pub fn try_new(a: NodeId, b: NodeId) -> Result<Self> {
        if a == b {
            return Err(SimError::SelfLoopEdge { node: a });
        }
        Ok(Self::ordered(a, b))
    }

    /// Normalises a pair of distinct endpoints without self-loop checking.
    pub(crate) fn ordered(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    /// Returns the smaller endpoint id.
    #[rustfmt::skip]
    #[must_use]
    pub fn lower(self) -> NodeId { self.lower }

    /// Returns the larger endpoint id.
    #[rustfmt::skip]
    #[must_use]
    pub fn upper(self) -> NodeId { self.upper }

    /// Returns the endpoint opposite `node`, or `None` when `node` is not an
    /// endpoint of this edge.
    #[must_use]
    pub fn opposite(self, node: NodeId) -> Option<NodeId> {
        if node == self.lower {
            Some(self.upper)
        } else if node == self.upper {
            Some(self.lower)
        } else {
            None
        }
    }
}

/// Nodes and incident links captured by [`Topology::remove_nodes`].
///
/// The edge list is the flattened concatenation of each failed node's
/// incidence list, captured before any removal took place. A link between
/// two failed nodes therefore appears twice; [`Topology::restore`] tolerates
/// the duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedTopology {
    nodes: BTreeSet<NodeId>,
    edges: Vec<Edge>,
}

impl RemovedTopology {
    /// Returns the nodes that were deactivated.
    #[rustfmt::skip]
    #[must_use]
    pub fn nodes(&self) -> &BTreeSet<NodeId> { &self.nodes }

    /// Returns the captured incident links in capture order.
    #[rustfmt::skip]
    #[must_use]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns whether the capture deactivated any node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Membership snapshot of a topology, used to verify restoration.
///
/// Two snapshots compare equal exactly when their active node sets and
/// active edge sets are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologySnapshot {
    nodes: BTreeSet<NodeId>,
    edges: BTreeSet<Edge>,
}

impl TopologySnapshot {
    /// Returns the active nodes at capture time.
    #[rustfmt::skip]
    #[must_use]
    pub fn nodes(&self) -> &BTreeSet<NodeId> { &self.nodes }

    /// Returns the active edges at capture time.
    #[rustfmt::skip]
    #[must_use]
    pub fn edges(&self) -> &BTreeSet<Edge> { &self.edges }

    /// Returns the number of active nodes at capture time.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of active edges at capture time.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Fixed-size mesh topology whose nodes can be taken offline and restored.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
///
/// use meshsim_core::{Edge, NodeId, Topology};
///
/// let edges = [
///     Edge::try_new(NodeId::new(1), NodeId::new(2))?,
///     Edge::try_new(NodeId::new(2), NodeId::new(3))?,
/// ];
/// let mut topology = Topology::from_edges(3, edges)?;
///
/// let failures = BTreeSet::from([NodeId::new(2)]);
/// let removed = topology.remove_nodes(&failures);
/// assert_eq!(topology.edge_count(), 0);
///
/// topology.restore(&removed)?;
/// assert_eq!(topology.edge_count(), 2);
/// # Ok::<(), meshsim_core::SimError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    node_count: u32,
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl Topology {
    /// Creates a topology with nodes `1..=node_count`, all active, no links.
    #[must_use]
    pub fn new(node_count: u32) -> Self {
        let adjacency = (1..=node_count)
            .map(|id| (NodeId::new(id), BTreeSet::new()))
            .collect();
        Self {
            node_count,
            adjacency,
        }
    }

    /// Creates a topology and inserts every edge in `edges`.
    ///
    /// Duplicate edges are tolerated; links have set semantics.
    ///
    /// # Errors
    /// Returns [`SimError::NodeOutOfRange`] when an edge endpoint falls
    /// outside `1..=node_count`.
    pub fn from_edges(node_count: u32, edges: impl IntoIterator<Item = Edge>) -> Result<Self> {
        let mut topology = Self::new(node_count);
        for edge in edges {
            topology.insert_edge(edge)?;
        }
        Ok(topology)
    }

    /// Returns the fixed number of nodes this topology was built with.
    #[rustfmt::skip]
    #[must_use]
    pub fn node_count(&self) -> u32 { self.node_count }

    /// Returns whether `node` lies within the topology's id range.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        node.get() >= 1 && node.get() <= self.node_count
    }

    /// Returns whether `node` is currently active.
    #[must_use]
    pub fn is_active(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Iterates the active nodes in ascending id order.
    pub fn active_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Returns the number of currently active nodes.
    #[must_use]
    pub fn active_node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Iterates the active neighbours of `node` in ascending id order.
    ///
    /// Yields nothing when `node` is inactive or unknown.
    pub fn neighbours(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Returns the set of active edges in canonical form.
    #[must_use]
    pub fn edge_set(&self) -> BTreeSet<Edge> {
        self.adjacency
            .iter()
            .flat_map(|(&node, neighbours)| {
                neighbours
                    .iter()
                    .filter(move |&&neighbour| neighbour > node)
                    .map(move |&neighbour| Edge::ordered(node, neighbour))
            })
            .collect()
    }

    /// Returns the number of active edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency
            .iter()
            .map(|(node, neighbours)| {
                neighbours
                    .iter()
                    .filter(|&&neighbour| neighbour > *node)
                    .count()
            })
            .sum()
    }

    /// Captures the current membership state for later comparison.
    #[must_use]
    pub fn snapshot(&self) -> TopologySnapshot {
        TopologySnapshot {
            nodes: self.adjacency.keys().copied().collect(),
            edges: self.edge_set(),
        }
    }

    /// Inserts an edge between two active nodes.
    ///
    /// Inserting a link that is already present is a no-op.
    ///
    /// # Errors
    /// Returns [`SimError::NodeOutOfRange`] when an endpoint falls outside
    /// the topology, and [`SimError::EndpointInactive`] when an endpoint is
    /// currently offline.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<()> {
        for node in [edge.lower(), edge.upper()] {
            if !self.contains(node) {
                return Err(SimError::NodeOutOfRange {
                    node,
                    node_count: self.node_count,
                });
            }
            if !self.is_active(node) {
                return Err(SimError::EndpointInactive { node });
            }
        }
        if let Some(set) = self.adjacency.get_mut(&edge.lower()) {
            set.insert(edge.upper());
        }
        if let Some(set) = self.adjacency.get_mut(&edge.upper()) {
            set.insert(edge.lower());
        }
        Ok(())
    }

    /// Deactivates every node in `failures`, capturing their incident links
    /// first.
    ///
    /// All incidence lists are captured before any node is removed, so a
    /// link between two failed nodes is captured once per endpoint. Nodes
    /// that are already inactive or unknown contribute nothing.
    pub fn remove_nodes(&mut self, failures: &BTreeSet<NodeId>) -> RemovedTopology {
        let mut nodes = BTreeSet::new();
        let mut edges = Vec::new();
        for &node in failures {
            let Some(neighbours) = self.adjacency.get(&node) else {
                continue;
            };
            nodes.insert(node);
            for &neighbour in neighbours {
                edges.push(Edge::ordered(node, neighbour));
            }
        }
        for &node in &nodes {
            self.deactivate(node);
        }
        RemovedTopology { nodes, edges }
    }

    /// Reactivates the captured nodes and reinstates their links.
    ///
    /// Restoration is idempotent: reactivating an active node and
    /// reinserting a present link are no-ops, so restoring the same capture
    /// twice leaves the topology unchanged.
    ///
    /// # Errors
    /// Returns [`SimError::EndpointInactive`] when a captured link touches a
    /// node that is still offline. This cannot happen when restoring the
    /// capture produced by the matching [`Topology::remove_nodes`] call; it
    /// guards interleaved removals restored out of order.
    pub fn restore(&mut self, removed: &RemovedTopology) -> Result<()> {
        for &node in removed.nodes() {
            self.adjacency.entry(node).or_default();
        }
        for &edge in removed.edges() {
            self.insert_edge(edge)?;
        }
        Ok(())
    }

    fn deactivate(&mut self, node: NodeId) {
        if let Some(neighbours) = self.adjacency.remove(&node) {
            for neighbour in neighbours {
                if let Some(set) = self.adjacency.get_mut(&neighbour) {
                    set.remove(&node);
                }
            }
        }
    }
}
