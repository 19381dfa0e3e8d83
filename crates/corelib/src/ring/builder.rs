//! Builder running the whole ring pipeline.

use crate::error::Result;
use crate::generator::ActivationSource;
use crate::ring::{finger_table_size, Ring};

/// Builds a ready-to-query [`Ring`]: activation, successor resolution and
/// finger tables in one call.
///
/// # Example
///
/// ```rust
/// use corelib::{NodeId, RingBuilder};
///
/// let ring = RingBuilder::new(32)
///     .with_active([1, 4, 7, 12, 15, 20, 27])
///     .build()
///     .unwrap();
///
/// assert_eq!(ring.lookup(1, 14).unwrap(), NodeId(15));
/// ```
pub struct RingBuilder {
    size: u64,
    active: Vec<u64>,
    sources: Vec<Box<dyn ActivationSource>>,
    table_size: Option<u32>,
}

impl RingBuilder {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            active: Vec::new(),
            sources: Vec::new(),
            table_size: None,
        }
    }

    /// Add explicitly chosen active identifiers.
    pub fn with_active<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        self.active.extend(ids);
        self
    }

    /// Add identifiers produced by an activation source.
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: ActivationSource + 'static,
    {
        self.sources.push(Box::new(source));
        self
    }

    /// Override the finger table size (defaults to `log2(size)`).
    pub fn with_table_size(mut self, table_size: u32) -> Self {
        self.table_size = Some(table_size);
        self
    }

    /// Run the pipeline.
    ///
    /// Fails with the first error any phase reports; see [`Ring::new`],
    /// [`Ring::activate`], [`Ring::resolve_successors`] and
    /// [`Ring::build_finger_tables`].
    pub fn build(self) -> Result<Ring> {
        let mut ring = Ring::new(self.size)?;

        ring.activate(self.active)?;
        for source in &self.sources {
            ring.activate_from(source.as_ref())?;
        }

        ring.resolve_successors()?;

        let table_size = match self.table_size {
            Some(table_size) => table_size,
            None => finger_table_size(self.size)?,
        };
        ring.build_finger_tables(table_size)?;

        Ok(ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::generator::Lcg;

    #[test]
    fn test_builder_default_table_size() {
        let ring = RingBuilder::new(32).with_active([1, 2]).build().unwrap();
        assert_eq!(ring.table_size(), Some(5));
        assert!(ring.nodes().iter().all(|n| n.table().map(|t| t.len()) == Some(5)));
    }

    #[test]
    fn test_builder_custom_table_size() {
        let ring = RingBuilder::new(16)
            .with_active([0])
            .with_table_size(2)
            .build()
            .unwrap();
        assert_eq!(ring.table_size(), Some(2));
    }

    #[test]
    fn test_builder_combines_sources() {
        let ring = RingBuilder::new(16)
            .with_active([0])
            .with_source(Lcg::new(2, 1, 3))
            .build()
            .unwrap();

        let mut expected = Lcg::new(2, 1, 3).active_ids(16);
        expected.insert(0);
        let active: Vec<u64> = ring.active_nodes().map(|id| id.0).collect();
        assert_eq!(active, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_builder_errors() {
        assert_eq!(RingBuilder::new(12).build().unwrap_err(), Error::InvalidSize(12));
        assert_eq!(RingBuilder::new(8).build().unwrap_err(), Error::NoActiveNodes);
        assert_eq!(
            RingBuilder::new(8).with_active([9]).build().unwrap_err(),
            Error::OutOfRange { id: 9, size: 8 }
        );
        // A single-identifier ring has no room for fingers.
        assert_eq!(
            RingBuilder::new(1).with_active([0]).build().unwrap_err(),
            Error::InvalidTableSize(0)
        );
    }
}
