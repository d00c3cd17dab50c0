//! Thread-safe wrapper for concurrent index access.
//!
//! Searches take the read lock and run in parallel; writes take the write
//! lock. The search engine itself holds no state, so the lock only guards the
//! store.

use super::GeoIndex;
use crate::compute::search::Neighbor;
use crate::config::IndexConfig;
use crate::error::Result;
use crate::point::IndexedPoint;
use crate::storage::{MemoryPointStore, PointStore, StoreStats};
use bytes::Bytes;
use geocell_types::bbox::BoundingBox;
use geocell_types::coord::Coordinate;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable, thread-safe handle to a [`GeoIndex`].
pub struct SyncGeoIndex<S = MemoryPointStore> {
    inner: Arc<RwLock<GeoIndex<S>>>,
}

impl<S> Clone for SyncGeoIndex<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SyncGeoIndex<MemoryPointStore> {
    /// Create an in-memory index.
    pub fn memory() -> Result<Self> {
        Ok(Self::new(GeoIndex::memory()?))
    }

    /// Create an in-memory index with custom configuration.
    pub fn memory_with_config(config: IndexConfig) -> Result<Self> {
        Ok(Self::new(GeoIndex::memory_with_config(config)?))
    }
}

impl<S: PointStore> SyncGeoIndex<S> {
    pub fn new(index: GeoIndex<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    pub fn config(&self) -> IndexConfig {
        self.inner.read().config().clone()
    }

    pub fn insert_point(
        &self,
        key: impl Into<String>,
        coordinate: Coordinate,
        data: impl Into<Bytes>,
    ) -> Result<Option<IndexedPoint>> {
        self.inner.write().insert_point(key, coordinate, data)
    }

    pub fn insert_point_auto(&self, coordinate: Coordinate, data: impl Into<Bytes>) -> Result<String> {
        self.inner.write().insert_point_auto(coordinate, data)
    }

    pub fn get(&self, key: &str) -> Result<Option<IndexedPoint>> {
        self.inner.read().get(key)
    }

    pub fn relocate(&self, key: &str, coordinate: Coordinate) -> Result<IndexedPoint> {
        self.inner.write().relocate(key, coordinate)
    }

    pub fn update_data(&self, key: &str, data: impl Into<Bytes>) -> Result<IndexedPoint> {
        self.inner.write().update_data(key, data)
    }

    pub fn delete(&self, key: &str) -> Result<Option<IndexedPoint>> {
        self.inner.write().delete(key)
    }

    pub fn query_all(&self, max_results: Option<usize>) -> Result<Vec<IndexedPoint>> {
        self.inner.read().query_all(max_results)
    }

    pub fn nearest(
        &self,
        center: &Coordinate,
        max_distance: f64,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        self.inner.read().nearest(center, max_distance, max_results)
    }

    pub fn nearest_to_point(
        &self,
        key: &str,
        max_distance: f64,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        self.inner
            .read()
            .nearest_to_point(key, max_distance, max_results)
    }

    pub fn query_box(
        &self,
        southwest: &Coordinate,
        northeast: &Coordinate,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        self.inner.read().query_box(southwest, northeast, max_results)
    }

    pub fn query_box_exact(
        &self,
        southwest: &Coordinate,
        northeast: &Coordinate,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        self.inner
            .read()
            .query_box_exact(southwest, northeast, max_results)
    }

    pub fn query_bbox(
        &self,
        bbox: &BoundingBox,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        self.inner.read().query_bbox(bbox, max_results)
    }

    pub fn len(&self) -> Result<usize> {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.inner.read().stats()
    }
}
