//! In-memory point store.

use super::{PointLookup, PointStore, StoreStats};
use crate::error::Result;
use crate::point::IndexedPoint;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory point store with a prefix -> keys secondary index.
///
/// Keys under a prefix are kept in a `BTreeSet`, so lookups return points in
/// key order.
pub struct MemoryPointStore {
    points: FxHashMap<String, IndexedPoint>,
    prefixes: FxHashMap<String, BTreeSet<String>>,
    lookups: AtomicU64,
    writes: u64,
}

impl MemoryPointStore {
    pub fn new() -> Self {
        Self {
            points: FxHashMap::default(),
            prefixes: FxHashMap::default(),
            lookups: AtomicU64::new(0),
            writes: 0,
        }
    }

    /// Create with initial capacity hint (in points)
    pub fn with_capacity(capacity: usize) -> Self {
        let mut store = Self::new();
        store.points.reserve(capacity);
        store
    }

    pub fn iter_ref(&self) -> impl Iterator<Item = &IndexedPoint> {
        self.points.values()
    }

    /// Number of points indexed under `prefix`, without cloning them.
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.prefixes.get(prefix).map_or(0, BTreeSet::len)
    }

    fn index(&mut self, point: &IndexedPoint) {
        for cell in point.cells() {
            self.prefixes
                .entry(cell.clone())
                .or_default()
                .insert(point.key().to_string());
        }
    }

    fn unindex(&mut self, point: &IndexedPoint) {
        for cell in point.cells() {
            if let Some(keys) = self.prefixes.get_mut(cell) {
                keys.remove(point.key());
                if keys.is_empty() {
                    self.prefixes.remove(cell);
                }
            }
        }
    }
}

impl Default for MemoryPointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PointLookup for MemoryPointStore {
    fn lookup_by_exact_prefix(&self, prefix: &str) -> Result<Vec<IndexedPoint>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        let Some(keys) = self.prefixes.get(prefix) else {
            return Ok(Vec::new());
        };

        Ok(keys
            .iter()
            .filter_map(|key| self.points.get(key))
            .cloned()
            .collect())
    }
}

impl PointStore for MemoryPointStore {
    fn put(&mut self, point: IndexedPoint) -> Result<Option<IndexedPoint>> {
        let old = self.points.remove(point.key());
        if let Some(old) = &old {
            self.unindex(old);
        }

        log::trace!(
            "Indexing point {} at {} under {}",
            point.key(),
            point.coordinate(),
            point.geocell()
        );
        self.index(&point);
        self.points.insert(point.key().to_string(), point);
        self.writes += 1;

        Ok(old)
    }

    fn get(&self, key: &str) -> Result<Option<IndexedPoint>> {
        Ok(self.points.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<Option<IndexedPoint>> {
        let old = self.points.remove(key);
        if let Some(old) = &old {
            log::trace!("Removing point {} from {}", key, old.geocell());
            self.unindex(old);
            self.writes += 1;
        }

        Ok(old)
    }

    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.points.contains_key(key))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.points.len())
    }

    fn iter(&self) -> Result<Box<dyn Iterator<Item = IndexedPoint> + '_>> {
        Ok(Box::new(self.iter_ref().cloned()))
    }

    fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            point_count: self.points.len(),
            prefix_count: self.prefixes.len(),
            lookups: self.lookups.load(Ordering::Relaxed),
            writes: self.writes,
        })
    }
}
