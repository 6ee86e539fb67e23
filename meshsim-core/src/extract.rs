//! Flattening of shortest paths into link sets.
//!
//! Cycle reports describe both the chosen route (an ordered walk) and the
//! wider set of links that carry any shortest path. These helpers convert
//! between the two representations.

use std::collections::BTreeSet;

use crate::routes::{Path, PathTree, ReachabilityMap};
use crate::topology::Edge;

/// Returns the links a path traverses, in traversal order.
///
/// Each link is canonical (smaller endpoint first) even when the path walks
/// it from the larger endpoint. A single-node path traverses no links.
#[must_use]
pub fn edges_from_path(path: &Path) -> Vec<Edge> {
    path.nodes()
        .windows(2)
        .filter_map(|pair| match pair {
            [a, b] => Some(Edge::ordered(*a, *b)),
            _ => None,
        })
        .collect()
}

/// Returns the set of links used by any path in the tree.
#[must_use]
pub fn edges_from_tree(tree: &PathTree) -> BTreeSet<Edge> {
    tree.iter()
        .flat_map(|(_, path)| edges_from_path(path))
        .collect()
}

/// Returns the set of links used by any shortest path in the map.
///
/// # Examples
/// ```
/// use meshsim_core::{Edge, NodeId, Topology, all_pairs_shortest_paths, edges_from_map};
///
/// let topology = Topology::from_edges(
///     3,
///     [Edge::try_new(NodeId::new(1), NodeId::new(2))?],
/// )?;
/// let reachable = edges_from_map(&all_pairs_shortest_paths(&topology));
/// assert_eq!(reachable.len(), 1);
/// # Ok::<(), meshsim_core::SimError>(())
/// ```
#[must_use]
pub fn edges_from_map(map: &ReachabilityMap) -> BTreeSet<Edge> {
    map.trees().flat_map(edges_from_tree).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{all_pairs_shortest_paths, shortest_path_tree};
    use crate::topology::{NodeId, Topology};

    fn node(id: u32) -> NodeId {
        NodeId::new(id)
    }

    fn edge(a: u32, b: u32) -> Edge {
        Edge::try_new(node(a), node(b)).expect("endpoints must be distinct")
    }

    fn diamond() -> Topology {
        Topology::from_edges(4, [edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 4)])
            .expect("diamond edges must be in range")
    }

    #[test]
    fn path_flattens_into_consecutive_links() {
        let path = Path::new(vec![node(1), node(4), node(9), node(25)]);
        assert_eq!(
            edges_from_path(&path),
            vec![edge(1, 4), edge(4, 9), edge(9, 25)],
        );
    }

    #[test]
    fn descending_walks_yield_canonical_links() {
        let path = Path::new(vec![node(25), node(9), node(4)]);
        assert_eq!(edges_from_path(&path), vec![edge(9, 25), edge(4, 9)]);
    }

    #[test]
    fn single_node_path_has_no_links() {
        let path = Path::new(vec![node(7)]);
        assert!(edges_from_path(&path).is_empty());
    }

    #[test]
    fn tree_union_keeps_only_links_on_chosen_paths() {
        // From source 1 the diamond resolves to 1-2-4, so the 3-4 link
        // carries no chosen path.
        let topology = diamond();
        let tree = shortest_path_tree(&topology, node(1));

        let links = edges_from_tree(&tree);
        assert_eq!(
            links,
            BTreeSet::from([edge(1, 2), edge(1, 3), edge(2, 4)]),
        );
    }

    #[test]
    fn map_union_covers_every_source() {
        // The 3-4 link is unused from source 1 but carries the 3 to 4 path.
        let topology = diamond();
        let links = edges_from_map(&all_pairs_shortest_paths(&topology));

        assert_eq!(
            links,
            BTreeSet::from([edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 4)]),
        );
    }
}
