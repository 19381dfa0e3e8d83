//! Finger-table lookup.
//!
//! # Algorithm
//!
//! Starting at some node, each step inspects the current node's finger table:
//!
//! 1. **Trivial**: the key is the current node, which owns it (an inactive
//!    start owns nothing and answers with its successor).
//! 2. **Direct interval**: the key lies between the current node and its
//!    next active node (first finger), possibly across the wrap point. The
//!    next active node owns it.
//! 3. **Scan**: walk the fingers while their keys are below the target,
//!    remembering the last finger's successor as the closest predecessor.
//!    The first finger at or past the target ends the scan.
//! 4. **Resolve or forward**: if the closest predecessor is the current node
//!    (or, with no predecessor, the next active node is), the current node
//!    owns the key. Otherwise move to that node and repeat.
//!
//! # Termination
//!
//! Fingers are geometrically spaced so a well-formed ring usually settles in
//! a handful of hops. Inconsistent tables can cycle, so every lookup carries
//! a hop ceiling and fails with [`Error::LookupDivergence`] past it.
//!
//! # Concurrency
//!
//! Lookups only read the ring. A built `Ring` can be shared behind an `Arc`
//! and queried from many threads at once.

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::ring::Ring;
use serde::Serialize;
use tracing::{trace, warn};

/// Outcome of a lookup together with the nodes it passed through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Active node owning the key.
    pub owner: NodeId,
    /// Visited nodes, starting node first.
    pub path: Vec<NodeId>,
}

impl Route {
    /// Number of forwards between visited nodes.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// What a single visit decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Owner(NodeId),
    Forward(NodeId),
}

impl Ring {
    /// Hop ceiling used by [`Ring::lookup`]: twice the finger table size.
    pub fn default_hop_limit(&self) -> usize {
        (self.table_size.unwrap_or(0) as usize * 2).max(1)
    }

    /// Find the active node owning `key`, starting at node `start`.
    ///
    /// `start` need not be active. `key` is reduced modulo the ring size,
    /// matching [`Ring::successor_of`].
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidStartNode`] if `start` is not in `0..size`.
    /// * [`Error::MissingFingerTable`] if finger tables were not built.
    /// * [`Error::LookupDivergence`] if the search exceeds
    ///   [`Ring::default_hop_limit`] hops.
    pub fn lookup(&self, start: u64, key: u64) -> Result<NodeId> {
        self.route(start, key).map(|route| route.owner)
    }

    /// Like [`Ring::lookup`] with a caller-chosen hop ceiling.
    pub fn lookup_with_limit(&self, start: u64, key: u64, max_hops: usize) -> Result<NodeId> {
        self.route_with_limit(start, key, max_hops).map(|route| route.owner)
    }

    /// Like [`Ring::lookup`] but also returns the visited nodes.
    pub fn route(&self, start: u64, key: u64) -> Result<Route> {
        self.route_with_limit(start, key, self.default_hop_limit())
    }

    pub fn route_with_limit(&self, start: u64, key: u64, max_hops: usize) -> Result<Route> {
        if start >= self.size {
            return Err(Error::InvalidStartNode {
                node: start,
                size: self.size,
            });
        }

        let key = key % self.size;
        let start = NodeId(start);
        let mut path = vec![start];
        let mut node = start;

        loop {
            match self.step(node, key)? {
                Step::Owner(owner) => {
                    trace!(key, owner = %owner, hops = path.len() - 1, "lookup settled");
                    return Ok(Route { owner, path });
                }
                Step::Forward(next) => {
                    let hops = path.len() - 1;
                    if hops >= max_hops {
                        warn!(start = %start, key, hops, "lookup exceeded hop limit");
                        return Err(Error::LookupDivergence { start, key, hops });
                    }
                    path.push(next);
                    node = next;
                }
            }
        }
    }

    /// One visit of the lookup at `node`.
    fn step(&self, node: NodeId, find: u64) -> Result<Step> {
        let record = &self.nodes[node.index()];
        let table = record.table().ok_or(Error::MissingFingerTable(node))?;
        let next_active = table.first().ok_or(Error::MissingFingerTable(node))?.successor_at_key;

        trace!(node = %node, next_active = %next_active, find, "visiting node");

        if find == node.0 {
            if record.is_active() {
                return Ok(Step::Owner(node));
            }
            return record
                .successor()
                .map(Step::Owner)
                .ok_or(Error::SuccessorsUnresolved);
        }

        let (n, next) = (node.0, next_active.0);
        // find in (node, next_active)
        if next > find && n < find {
            return Ok(Step::Owner(next_active));
        }
        // same interval when next_active has wrapped past zero
        if n > next && n > find && next < find.saturating_add(self.size) {
            return Ok(Step::Owner(next_active));
        }

        let mut closest = None;
        for entry in table {
            if entry.key.0 >= find {
                break;
            }
            closest = Some(entry.successor_at_key);
        }

        let next_hop = closest.unwrap_or(next_active);
        if next_hop == node {
            return Ok(Step::Owner(node));
        }
        trace!(node = %node, next_hop = %next_hop, "forwarding to closest predecessor");
        Ok(Step::Forward(next_hop))
    }
}
