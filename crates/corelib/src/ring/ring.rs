//! Ring data structure and activation.

use crate::error::{Error, Result};
use crate::generator::{ActivationSource, Lcg};
use crate::node::{NodeId, NodeRecord};
use serde::Serialize;
use tracing::debug;

/// Largest ring [`Ring::new`] will allocate: one record per identifier,
/// each carrying a finger table, so `2^20` keeps a built ring in the
/// hundreds of megabytes.
pub const MAX_RING_SIZE: u64 = 1 << 20;

/// Number of finger table entries for a ring of `size` identifiers.
///
/// # Errors
///
/// [`Error::InvalidSize`] unless `size = 2^k` for some `k >= 0`.
///
/// # Example
///
/// ```rust
/// use corelib::ring::finger_table_size;
///
/// assert_eq!(finger_table_size(32), Ok(5));
/// assert!(finger_table_size(24).is_err());
/// ```
pub fn finger_table_size(size: u64) -> Result<u32> {
    if !size.is_power_of_two() {
        return Err(Error::InvalidSize(size));
    }
    Ok(size.trailing_zeros())
}

/// A ring of `size` identifiers, each flagged active or inactive.
///
/// # Invariants
///
/// - `size` is a power of two and is the modulus for all ring arithmetic
/// - `nodes[i].id() == NodeId(i)` for every `i` in `0..size`
/// - successors and finger tables are either absent or consistent with the
///   current activation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ring {
    pub(crate) size: u64,
    pub(crate) nodes: Vec<NodeRecord>,
    pub(crate) table_size: Option<u32>,
}

impl Ring {
    /// Create a ring with every identifier inactive.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSize`] if `size` is zero, not a power of two, or
    /// larger than [`MAX_RING_SIZE`].
    pub fn new(size: u64) -> Result<Self> {
        finger_table_size(size)?;
        if size > MAX_RING_SIZE {
            return Err(Error::InvalidSize(size));
        }

        let nodes = (0..size).map(|id| NodeRecord::new(NodeId(id))).collect();
        debug!(size, "initialized ring");

        Ok(Self {
            size,
            nodes,
            table_size: None,
        })
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id.index())
    }

    pub fn active_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter(|n| n.is_active()).map(|n| n.id())
    }

    pub fn active_count(&self) -> usize {
        self.active_nodes().count()
    }

    /// Mark the given identifiers active.
    ///
    /// All ids are bounds-checked before any is applied, so a failed call
    /// leaves the ring untouched. Any newly activated node invalidates
    /// resolved successors and finger tables.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if any id is not in `0..size`.
    pub fn activate<I>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = u64>,
    {
        let ids: Vec<u64> = ids.into_iter().collect();
        if let Some(&id) = ids.iter().find(|&&id| id >= self.size) {
            return Err(Error::OutOfRange { id, size: self.size });
        }

        let mut changed = 0usize;
        for id in ids {
            let node = &mut self.nodes[id as usize];
            if !node.is_active() {
                node.set_active();
                changed += 1;
            }
        }

        if changed > 0 {
            self.invalidate();
        }
        debug!(activated = changed, active = self.active_count(), "activated nodes");
        Ok(())
    }

    /// Activate whatever identifiers `source` produces for this ring size.
    pub fn activate_from<S>(&mut self, source: &S) -> Result<()>
    where
        S: ActivationSource + ?Sized,
    {
        let ids = source.active_ids(self.size);
        self.activate(ids)
    }

    /// Activate the identifiers produced by the linear-congruential
    /// generator `x' = (multiplier * x + increment) mod size`.
    pub fn activate_by_generator(&mut self, seed: u64, increment: u64, multiplier: u64) -> Result<()> {
        self.activate_from(&Lcg::new(seed, increment, multiplier))
    }

    /// Drop successors and finger tables derived from an older activation.
    fn invalidate(&mut self) {
        for node in &mut self.nodes {
            node.clear_derived();
        }
        self.table_size = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finger_table_size() {
        for (size, expected) in [(1, 0), (4, 2), (8, 3), (16, 4), (32, 5), (64, 6)] {
            assert_eq!(finger_table_size(size), Ok(expected), "size {}", size);
        }
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        for size in [0, 3, 6, 24, 100] {
            assert_eq!(Ring::new(size), Err(Error::InvalidSize(size)));
        }
    }

    #[test]
    fn test_rejects_size_above_ceiling() {
        for size in [MAX_RING_SIZE << 1, 1 << 40, 1 << 63] {
            assert_eq!(Ring::new(size), Err(Error::InvalidSize(size)));
        }
        // The ceiling only bounds allocation; table sizing stays pure.
        assert_eq!(finger_table_size(1 << 63), Ok(63));
    }

    #[test]
    fn test_new_ring_ids_match_index() {
        for size in [4, 8, 16, 32, 64] {
            let ring = Ring::new(size).unwrap();
            assert_eq!(ring.size(), size);
            assert_eq!(ring.nodes().len() as u64, size);
            for (index, node) in ring.nodes().iter().enumerate() {
                assert_eq!(node.id(), NodeId(index as u64));
                assert!(!node.is_active());
            }
        }
    }

    #[test]
    fn test_activate_out_of_range_is_atomic() {
        let mut ring = Ring::new(8).unwrap();
        assert_eq!(
            ring.activate([1, 2, 8]),
            Err(Error::OutOfRange { id: 8, size: 8 })
        );
        assert_eq!(ring.active_count(), 0);
    }

    #[test]
    fn test_activation_invalidates_successors() {
        let mut ring = Ring::new(8).unwrap();
        ring.activate([2]).unwrap();
        ring.resolve_successors().unwrap();
        ring.build_finger_tables(3).unwrap();

        ring.activate([5]).unwrap();
        assert!(ring.nodes().iter().all(|n| n.successor().is_none() && n.table().is_none()));
        assert_eq!(ring.table_size(), None);
    }

    #[test]
    fn test_reactivating_keeps_derived_state() {
        let mut ring = Ring::new(8).unwrap();
        ring.activate([2]).unwrap();
        ring.resolve_successors().unwrap();

        ring.activate([2]).unwrap();
        assert_eq!(ring.node(NodeId(0)).unwrap().successor(), Some(NodeId(2)));
    }

    #[test]
    fn test_snapshot_serializes_resolved_state() {
        let mut ring = Ring::new(4).unwrap();
        ring.activate([2]).unwrap();
        ring.resolve_successors().unwrap();
        ring.build_finger_tables(2).unwrap();

        let json = serde_json::to_value(&ring).unwrap();
        assert_eq!(json["size"], 4);
        assert_eq!(json["table_size"], 2);
        assert_eq!(json["nodes"][3]["active"], false);
        assert_eq!(json["nodes"][3]["successor"], 2);
        assert_eq!(json["nodes"][3]["table"][0]["key"], 0);
        assert_eq!(json["nodes"][3]["table"][0]["successor"], 2);
    }

    #[test]
    fn test_activate_by_generator() {
        let mut ring = Ring::new(32).unwrap();
        ring.activate_by_generator(1, 3, 5).unwrap();

        let expected: Vec<NodeId> = Lcg::new(1, 3, 5).active_ids(32).into_iter().map(NodeId).collect();
        assert_eq!(ring.active_nodes().collect::<Vec<_>>(), expected);
    }
}
