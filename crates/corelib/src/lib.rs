//! Core library for the Chord ring model.
//!
//! This crate provides the structural core of a Chord distributed hash table
//! over a fixed, in-memory ring snapshot:
//! - Ring model with active/inactive identifiers
//! - Successor resolution with wraparound
//! - Finger table construction
//! - Finger-table lookup of the node owning a key
//!
//! # Example
//!
//! ```rust
//! use corelib::{NodeId, Ring};
//!
//! let mut ring = Ring::new(32)?;
//! ring.activate([1, 31])?;
//! ring.resolve_successors()?;
//! ring.build_finger_tables(5)?;
//!
//! assert_eq!(ring.lookup(1, 20)?, NodeId(31));
//! # Ok::<(), corelib::Error>(())
//! ```

pub mod error;
pub mod finger;
pub mod generator;
pub mod lookup;
pub mod node;
pub mod ring;

pub use error::{Error, Result};
pub use finger::{FingerEntry, FingerTable};
pub use generator::{ActivationSource, Lcg};
pub use lookup::Route;
pub use node::{NodeId, NodeRecord};
pub use ring::{finger_table_size, Ring, RingBuilder, MAX_RING_SIZE};
