//! Point store abstraction.
//!
//! The search engine needs exactly one capability from storage: fetch every
//! point indexed under an exact geocell prefix ([`PointLookup`]). Anything
//! that can answer an equality query on a point's prefix list will do, from a
//! hash map to a datastore secondary index. [`PointStore`] adds the writes a
//! [`GeoIndex`](crate::db::GeoIndex) performs on top of that.

use crate::error::Result;
use crate::point::IndexedPoint;

mod memory;

pub use memory::MemoryPointStore;

/// Exact-prefix lookup, the only capability the search engine relies on.
///
/// Implementations report their own failures (I/O, timeouts) as
/// [`GeocellError::Store`](crate::GeocellError::Store); the engine hands them
/// back to the caller without retrying.
pub trait PointLookup: Send + Sync {
    /// Every point whose prefix list contains `prefix`. The empty prefix
    /// matches every point.
    fn lookup_by_exact_prefix(&self, prefix: &str) -> Result<Vec<IndexedPoint>>;
}

/// A point store that can also be written to.
pub trait PointStore: PointLookup {
    /// Insert or replace a point by key, returning the replaced point.
    fn put(&mut self, point: IndexedPoint) -> Result<Option<IndexedPoint>>;

    /// Get a point by key
    fn get(&self, key: &str) -> Result<Option<IndexedPoint>>;

    /// Remove a point and its prefixes, returning it if it existed.
    fn remove(&mut self, key: &str) -> Result<Option<IndexedPoint>>;

    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Number of stored points
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Iterator over all stored points, in no particular order.
    fn iter(&self) -> Result<Box<dyn Iterator<Item = IndexedPoint> + '_>>;

    fn stats(&self) -> Result<StoreStats>;
}

/// Point store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored points
    pub point_count: usize,
    /// Number of distinct prefixes in the secondary index
    pub prefix_count: usize,
    /// Prefix lookups served so far
    pub lookups: u64,
    /// Writes (puts and removes) performed so far
    pub writes: u64,
}

/// A plain slice of points acts as a store by scanning, which is how a batch
/// of already-loaded candidates can be searched without building an index.
impl PointLookup for [IndexedPoint] {
    fn lookup_by_exact_prefix(&self, prefix: &str) -> Result<Vec<IndexedPoint>> {
        Ok(self
            .iter()
            .filter(|point| point.has_prefix(prefix))
            .cloned()
            .collect())
    }
}
