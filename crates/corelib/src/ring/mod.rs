//! Chord ring model.
//!
//! The ring owns one [`NodeRecord`](crate::node::NodeRecord) per identifier
//! and is driven through its phases in order: activation, successor
//! resolution, finger table construction. Once built it is read-only and can
//! be shared across threads for lookups.

pub mod builder;
pub mod ring;
pub mod successor;

pub use builder::RingBuilder;
pub use ring::{finger_table_size, Ring, MAX_RING_SIZE};
