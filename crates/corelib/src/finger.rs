//! Finger tables.
//!
//! Slot `i` of node `n`'s table points at key `(n + 2^i) mod size` and records
//! the successor of that key as it stood when the table was built. Entries
//! are snapshots; rebuilding the ring's successors does not update them.

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::ring::Ring;
use serde::Serialize;
use std::ops::Index;
use tracing::debug;

/// Largest table that still fits `2^i` in a `u64` identifier.
pub const MAX_TABLE_SIZE: u32 = u64::BITS - 1;

/// A single finger: a key on the ring and the active node owning it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FingerEntry {
    pub key: NodeId,
    #[serde(rename = "successor")]
    pub successor_at_key: NodeId,
}

/// Ordered shortcut pointers for one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FingerTable {
    entries: Vec<FingerEntry>,
}

impl FingerTable {
    /// Compute the table for `owner` from a resolved successor array.
    ///
    /// `successors[k]` must hold the successor of identifier `k` and its
    /// length must equal the ring size.
    fn compute(owner: NodeId, table_size: u32, successors: &[NodeId]) -> Self {
        let size = successors.len() as u64;
        let entries = (0..table_size)
            .map(|i| {
                let key = NodeId((owner.0 + (1u64 << i) % size) % size);
                FingerEntry {
                    key,
                    successor_at_key: successors[key.index()],
                }
            })
            .collect();
        Self { entries }
    }

    /// First finger, i.e. the next active node after the owner.
    pub fn first(&self) -> Option<&FingerEntry> {
        self.entries.first()
    }

    pub fn get(&self, index: usize) -> Option<&FingerEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[FingerEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FingerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<usize> for FingerTable {
    type Output = FingerEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a FingerTable {
    type Item = &'a FingerEntry;
    type IntoIter = std::slice::Iter<'a, FingerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Ring {
    /// Build a finger table of `table_size` entries for every identifier.
    ///
    /// Successors must already be resolved. Tables are computed from a
    /// snapshot of the successor array and then stored on each node, so the
    /// call is idempotent while activation is unchanged.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidTableSize`] if `table_size` is zero or larger than
    ///   [`MAX_TABLE_SIZE`].
    /// * [`Error::SuccessorsUnresolved`] if any node lacks a successor.
    pub fn build_finger_tables(&mut self, table_size: u32) -> Result<()> {
        if table_size == 0 || table_size > MAX_TABLE_SIZE {
            return Err(Error::InvalidTableSize(table_size));
        }

        let successors = self
            .nodes
            .iter()
            .map(|node| node.successor().ok_or(Error::SuccessorsUnresolved))
            .collect::<Result<Vec<_>>>()?;

        for (k, node) in self.nodes.iter_mut().enumerate() {
            node.set_table(FingerTable::compute(NodeId(k as u64), table_size, &successors));
        }
        self.table_size = Some(table_size);

        debug!(size = self.size, table_size, "built finger tables");
        Ok(())
    }

    /// Number of entries per finger table, once built.
    pub fn table_size(&self) -> Option<u32> {
        self.table_size
    }
}
