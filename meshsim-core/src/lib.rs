//! Mesh routing resilience simulator core library.
//!
//! Models a fixed mesh of numbered nodes, injects transient node failures,
//! recomputes shortest-hop routes over the degraded topology, and restores
//! the mesh to its baseline before the next cycle. [`SimulationBuilder`] is
//! the entry point; each [`Simulation::run_cycle`] call yields an owned
//! [`CycleReport`] describing one failure-and-recompute cycle.

mod builder;
mod error;
mod extract;
mod failure;
mod report;
mod routes;
mod sim;
mod topology;

#[cfg(test)]
mod property;

pub use crate::{
    builder::{DEFAULT_CYCLE_COUNT, DEFAULT_NODE_COUNT, SimulationBuilder},
    error::{Endpoint, Result, SimError, SimErrorCode},
    extract::{edges_from_map, edges_from_path, edges_from_tree},
    failure::{FailureDraw, FailureSelector, MAX_FAILURES_PER_CYCLE, UniformFailureSelector},
    report::{CycleReport, NodeStatus},
    routes::{
        Path, PathTree, ReachabilityMap, Route, all_pairs_shortest_paths, route,
        shortest_path_tree,
    },
    sim::{CycleBudget, CyclePhase, Simulation},
    topology::{Edge, NodeId, RemovedTopology, Topology, TopologySnapshot},
};
