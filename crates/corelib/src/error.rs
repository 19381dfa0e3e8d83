//! Error types for the core library.

use crate::node::NodeId;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a ring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Ring size is zero, not a power of two, or above the allocation ceiling
    #[error("invalid ring size {0}: must be a power of two no larger than 2^20 (e.g. 2^5 = 32)")]
    InvalidSize(u64),
    /// Activation index outside `0..size`
    #[error("node {id} is outside the ring (size {size})")]
    OutOfRange { id: u64, size: u64 },
    /// Successor resolution attempted with no active node
    #[error("ring has no active nodes")]
    NoActiveNodes,
    /// Finger table size is zero or too large for the identifier width
    #[error("invalid finger table size {0}")]
    InvalidTableSize(u32),
    /// Finger tables requested before successors were resolved
    #[error("successors have not been resolved")]
    SuccessorsUnresolved,
    /// Lookup visited a node that has no finger table
    #[error("node {0} has no finger table")]
    MissingFingerTable(NodeId),
    /// Lookup started outside `0..size`
    #[error("start node {node} is outside the ring (size {size})")]
    InvalidStartNode { node: u64, size: u64 },
    /// Lookup exceeded its hop ceiling
    #[error("lookup for key {key} from node {start} did not settle within {hops} hops")]
    LookupDivergence { start: NodeId, key: u64, hops: usize },
}
