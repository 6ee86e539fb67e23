//! Breadth-first shortest-path computation over the active topology.
//!
//! Paths are discovered with a FIFO queue and ascending-id neighbour
//! iteration, so among equally short paths the one with the
//! lexicographically smallest node sequence always wins. Recomputing over
//! an unchanged topology therefore yields identical results, which keeps
//! cycle reports reproducible for a fixed failure sequence.

use std::collections::{BTreeMap, VecDeque};

use crate::topology::{NodeId, Topology};

/// Node sequence of a single shortest path, source first.
///
/// Paths are non-empty by construction; a path from a node to itself holds
/// just that node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeId>,
}

impl Path {
    pub(crate) fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    /// Returns the nodes along the path in traversal order.
    #[rustfmt::skip]
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] { &self.nodes }

    /// Returns the number of links traversed, one less than the node count.
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Routing outcome between a source and destination pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A shortest path exists; the payload is the chosen path.
    Reachable(Path),
    /// No path connects the pair over the active topology.
    Unreachable,
}

impl Route {
    /// Returns whether a path was found.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }

    /// Returns the chosen path, or `None` when the pair is disconnected.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Reachable(path) => Some(path),
            Self::Unreachable => None,
        }
    }

    /// Returns the hop count of the chosen path, or `None` when the pair is
    /// disconnected.
    #[must_use]
    pub fn hop_count(&self) -> Option<usize> {
        self.path().map(Path::hop_count)
    }
}

/// Shortest paths from one source to every node it can reach.
///
/// Includes the trivial path from the source to itself. A tree computed for
/// an inactive source is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTree {
    source: NodeId,
    paths: BTreeMap<NodeId, Path>,
}

impl PathTree {
    /// Returns the source node this tree was computed from.
    #[rustfmt::skip]
    #[must_use]
    pub fn source(&self) -> NodeId { self.source }

    /// Returns the shortest path to `node`, or `None` when unreachable.
    #[must_use]
    pub fn path_to(&self, node: NodeId) -> Option<&Path> {
        self.paths.get(&node)
    }

    /// Returns the number of nodes reachable from the source, itself
    /// included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.paths.len()
    }

    /// Iterates the reachable nodes and their paths in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Path)> + '_ {
        self.paths.iter().map(|(&node, path)| (node, path))
    }
}

/// Shortest paths between every ordered pair of active nodes.
///
/// # Examples
/// ```
/// use meshsim_core::{Edge, NodeId, Topology, all_pairs_shortest_paths};
///
/// let edges = [
///     Edge::try_new(NodeId::new(1), NodeId::new(2))?,
///     Edge::try_new(NodeId::new(2), NodeId::new(3))?,
/// ];
/// let topology = Topology::from_edges(3, edges)?;
/// let map = all_pairs_shortest_paths(&topology);
///
/// let path = map.path(NodeId::new(1), NodeId::new(3)).expect("reachable");
/// assert_eq!(path.hop_count(), 2);
/// # Ok::<(), meshsim_core::SimError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityMap {
    trees: BTreeMap<NodeId, PathTree>,
}

impl ReachabilityMap {
    /// Returns the path tree rooted at `source`, or `None` when `source`
    /// was inactive at computation time.
    #[must_use]
    pub fn tree(&self, source: NodeId) -> Option<&PathTree> {
        self.trees.get(&source)
    }

    /// Iterates the path trees in ascending source order.
    pub fn trees(&self) -> impl Iterator<Item = &PathTree> + '_ {
        self.trees.values()
    }

    /// Returns the shortest path between an ordered pair, or `None` when the
    /// pair is disconnected.
    #[must_use]
    pub fn path(&self, source: NodeId, destination: NodeId) -> Option<&Path> {
        self.tree(source).and_then(|tree| tree.path_to(destination))
    }

    /// Resolves the routing outcome for an ordered pair.
    #[must_use]
    pub fn route(&self, source: NodeId, destination: NodeId) -> Route {
        self.path(source, destination)
            .cloned()
            .map_or(Route::Unreachable, Route::Reachable)
    }
}

/// Computes the shortest-path tree rooted at `source`.
///
/// Breadth-first search over ascending neighbour ids; among equally short
/// paths the lexicographically smallest node sequence is chosen. An
/// inactive source yields an empty tree.
#[must_use]
pub fn shortest_path_tree(topology: &Topology, source: NodeId) -> PathTree {
    let mut paths = BTreeMap::new();
    if !topology.is_active(source) {
        return PathTree { source, paths };
    }
    paths.insert(source, Path::new(vec![source]));
    let mut queue = VecDeque::from([source]);
    while let Some(current) = queue.pop_front() {
        let base = paths
            .get(&current)
            .map_or_else(Vec::new, |path| path.nodes().to_vec());
        for neighbour in topology.neighbours(current) {
            if paths.contains_key(&neighbour) {
                continue;
            }
            let mut nodes = base.clone();
            nodes.push(neighbour);
            paths.insert(neighbour, Path::new(nodes));
            queue.push_back(neighbour);
        }
    }
    PathTree { source, paths }
}

/// Computes shortest paths from every active node to every node it can
/// reach.
#[must_use]
pub fn all_pairs_shortest_paths(topology: &Topology) -> ReachabilityMap {
    let trees = topology
        .active_nodes()
        .map(|source| (source, shortest_path_tree(topology, source)))
        .collect();
    ReachabilityMap { trees }
}

/// Resolves the routing outcome between `source` and `destination`.
///
/// # Examples
/// ```
/// use meshsim_core::{Edge, NodeId, Route, Topology, route};
///
/// let topology = Topology::from_edges(
///     3,
///     [Edge::try_new(NodeId::new(1), NodeId::new(2))?],
/// )?;
/// let outcome = route(&topology, NodeId::new(1), NodeId::new(3));
/// assert!(matches!(outcome, Route::Unreachable));
/// # Ok::<(), meshsim_core::SimError>(())
/// ```
#[must_use]
pub fn route(topology: &Topology, source: NodeId, destination: NodeId) -> Route {
    shortest_path_tree(topology, source)
        .path_to(destination)
        .cloned()
        .map_or(Route::Unreachable, Route::Reachable)
}
