//! Successor resolution.
//!
//! # Algorithm
//!
//! Walk identifiers in ascending order keeping a cursor at the first
//! identifier without a successor. Each active node `k` becomes the successor
//! of every identifier from the cursor up to and including `k`. Identifiers
//! left after the last active node wrap around to the first active node.

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::ring::Ring;
use tracing::debug;

impl Ring {
    /// Assign every identifier the nearest active node at or after it.
    ///
    /// Idempotent while activation is unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::NoActiveNodes`] if nothing is active; the ring is left
    /// unchanged.
    pub fn resolve_successors(&mut self) -> Result<()> {
        let first = self
            .nodes
            .iter()
            .find(|n| n.is_active())
            .map(|n| n.id())
            .ok_or(Error::NoActiveNodes)?;

        let mut cursor = 0usize;
        for k in 0..self.nodes.len() {
            if !self.nodes[k].is_active() {
                continue;
            }
            let owner = NodeId(k as u64);
            for node in &mut self.nodes[cursor..=k] {
                node.set_successor(owner);
            }
            cursor = k + 1;
        }

        // Wraparound: the tail belongs to the first active node.
        for node in &mut self.nodes[cursor..] {
            node.set_successor(first);
        }

        debug!(size = self.size, first = %first, "resolved successors");
        Ok(())
    }

    /// Resolved successor of `key`, reduced modulo the ring size.
    ///
    /// Reads the successor array directly without consulting finger tables.
    pub fn successor_of(&self, key: u64) -> Option<NodeId> {
        self.nodes.get((key % self.size) as usize)?.successor()
    }
}
