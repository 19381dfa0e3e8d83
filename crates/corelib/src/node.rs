//! Node abstractions for the Chord ring.
//!
//! Every identifier `0..size` on the ring has exactly one [`NodeRecord`]. A
//! record starts inactive with no successor and no finger table; the ring
//! fills those in phase by phase.

use crate::finger::FingerTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a position on the ring.
///
/// Newtype over `u64` so identifiers and raw keys are not mixed up by accident.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Position of this identifier in the ring's node container.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// State held for a single identifier on the ring.
///
/// # Lifecycle
///
/// 1. Created inactive with `id` equal to its index.
/// 2. `active` is set during activation.
/// 3. `successor` is filled by successor resolution.
/// 4. `table` is filled by finger table construction.
///
/// Changing activation clears steps 3 and 4.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    id: NodeId,
    active: bool,
    successor: Option<NodeId>,
    table: Option<FingerTable>,
}

impl NodeRecord {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            active: false,
            successor: None,
            table: None,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Nearest active node at or after this identifier, once resolved.
    #[inline]
    pub fn successor(&self) -> Option<NodeId> {
        self.successor
    }

    /// Finger table, once built.
    #[inline]
    pub fn table(&self) -> Option<&FingerTable> {
        self.table.as_ref()
    }

    pub(crate) fn set_active(&mut self) {
        self.active = true;
    }

    pub(crate) fn set_successor(&mut self, successor: NodeId) {
        self.successor = Some(successor);
    }

    pub(crate) fn set_table(&mut self, table: FingerTable) {
        self.table = Some(table);
    }

    pub(crate) fn clear_derived(&mut self) {
        self.successor = None;
        self.table = None;
    }
}
