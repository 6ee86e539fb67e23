//! Error types for the meshsim core library.
//!
//! Defines the error enum exposed by the public API, its stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::topology::NodeId;

/// Role of a configured traffic endpoint, used in error reporting.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Endpoint {
    /// The node that originates traffic.
    Source,
    /// The node that traffic is routed towards.
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

/// Error type produced when configuring or running a [`crate::Simulation`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SimError {
    /// The topology must contain at least a source and a destination.
    #[error("node count must be at least 2 (got {got})")]
    InvalidNodeCount {
        /// The invalid node count supplied by the caller.
        got: u32,
    },
    /// A configured endpoint referenced a node outside the topology.
    #[error("{endpoint} node {node} is outside the topology (node count {node_count})")]
    EndpointOutOfRange {
        /// Which endpoint was misconfigured.
        endpoint: Endpoint,
        /// The out-of-range node id.
        node: NodeId,
        /// Number of nodes in the topology.
        node_count: u32,
    },
    /// Source and destination must be distinct nodes.
    #[error("source and destination are both node {node}")]
    IdenticalEndpoints {
        /// The node configured for both roles.
        node: NodeId,
    },
    /// An edge referenced a node outside the topology.
    #[error("edge endpoint {node} is outside the topology (node count {node_count})")]
    NodeOutOfRange {
        /// The out-of-range node id.
        node: NodeId,
        /// Number of nodes in the topology.
        node_count: u32,
    },
    /// An edge connected a node to itself.
    #[error("edge connects node {node} to itself")]
    SelfLoopEdge {
        /// The node appearing at both ends of the edge.
        node: NodeId,
    },
    /// A link could not be reinstated because an endpoint is offline.
    #[error("cannot restore a link to offline node {node}")]
    EndpointInactive {
        /// The offline endpoint.
        node: NodeId,
    },
    /// The topology did not return to its pre-cycle state after restoration.
    #[error(
        "topology mismatch after restoring cycle {cycle}: \
         expected {expected_nodes} nodes and {expected_edges} edges, \
         found {actual_nodes} and {actual_edges}"
    )]
    RestoreMismatch {
        /// Cycle whose restoration failed verification.
        cycle: u32,
        /// Active node count captured before the cycle.
        expected_nodes: usize,
        /// Active node count observed after restoration.
        actual_nodes: usize,
        /// Active edge count captured before the cycle.
        expected_edges: usize,
        /// Active edge count observed after restoration.
        actual_edges: usize,
    },
}

impl SimError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> SimErrorCode {
        match self {
            Self::InvalidNodeCount { .. } => SimErrorCode::InvalidNodeCount,
            Self::EndpointOutOfRange { .. } => SimErrorCode::EndpointOutOfRange,
            Self::IdenticalEndpoints { .. } => SimErrorCode::IdenticalEndpoints,
            Self::NodeOutOfRange { .. } => SimErrorCode::NodeOutOfRange,
            Self::SelfLoopEdge { .. } => SimErrorCode::SelfLoopEdge,
            Self::EndpointInactive { .. } => SimErrorCode::EndpointInactive,
            Self::RestoreMismatch { .. } => SimErrorCode::RestoreMismatch,
        }
    }
}

/// Machine-readable error codes for [`SimError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SimErrorCode {
    /// The topology must contain at least a source and a destination.
    InvalidNodeCount,
    /// A configured endpoint referenced a node outside the topology.
    EndpointOutOfRange,
    /// Source and destination must be distinct nodes.
    IdenticalEndpoints,
    /// An edge referenced a node outside the topology.
    NodeOutOfRange,
    /// An edge connected a node to itself.
    SelfLoopEdge,
    /// A link could not be reinstated because an endpoint is offline.
    EndpointInactive,
    /// The topology did not return to its pre-cycle state after restoration.
    RestoreMismatch,
}

impl SimErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidNodeCount => "INVALID_NODE_COUNT",
            Self::EndpointOutOfRange => "ENDPOINT_OUT_OF_RANGE",
            Self::IdenticalEndpoints => "IDENTICAL_ENDPOINTS",
            Self::NodeOutOfRange => "NODE_OUT_OF_RANGE",
            Self::SelfLoopEdge => "SELF_LOOP_EDGE",
            Self::EndpointInactive => "ENDPOINT_INACTIVE",
            Self::RestoreMismatch => "RESTORE_MISMATCH",
        }
    }
}

impl fmt::Display for SimErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SimError>;
