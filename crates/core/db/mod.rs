//! Point index facade.
//!
//! `GeoIndex` owns a point store and an [`IndexConfig`], computes each
//! point's geocell prefixes on the way in, and answers proximity queries at
//! the configured resolution.

mod sync;

pub use sync::SyncGeoIndex;

use crate::compute::search::{self, Neighbor};
use crate::compute::validation::{validate_coordinate, validate_finite};
use crate::config::IndexConfig;
use crate::error::{GeocellError, Result};
use crate::point::IndexedPoint;
use crate::storage::{MemoryPointStore, PointStore, StoreStats};
use bytes::Bytes;
use geocell_types::bbox::BoundingBox;
use geocell_types::coord::Coordinate;

/// Proximity index over a [`PointStore`].
///
/// # Examples
///
/// ```
/// use geocell::{Coordinate, GeoIndex};
///
/// let mut index = GeoIndex::memory()?;
/// index.insert_point("bga", Coordinate::new(7.1333, -73.0), "Bucaramanga")?;
/// index.insert_point("zrh", Coordinate::new(47.3667, 8.55), "Zurich")?;
///
/// let hits = index.nearest(&Coordinate::new(7.1233, -73.0), 2000.0, Some(5))?;
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].point.data().as_ref(), b"Bucaramanga");
/// # Ok::<(), geocell::GeocellError>(())
/// ```
pub struct GeoIndex<S = MemoryPointStore> {
    store: S,
    config: IndexConfig,
}

impl GeoIndex<MemoryPointStore> {
    /// In-memory index with the default configuration.
    pub fn memory() -> Result<Self> {
        Self::memory_with_config(IndexConfig::default())
    }

    pub fn memory_with_config(config: IndexConfig) -> Result<Self> {
        Self::with_store(MemoryPointStore::new(), config)
    }
}

impl<S: PointStore> GeoIndex<S> {
    /// Index backed by an existing store. Points already in the store are
    /// used as they are and should be indexed at `config.max_resolution`.
    pub fn with_store(store: S, config: IndexConfig) -> Result<Self> {
        config.validate().map_err(GeocellError::Config)?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Insert or replace a point, returning the point it replaced.
    pub fn insert_point(
        &mut self,
        key: impl Into<String>,
        coordinate: Coordinate,
        data: impl Into<Bytes>,
    ) -> Result<Option<IndexedPoint>> {
        let coordinate = self.admit(coordinate)?;
        let point = IndexedPoint::new(key, coordinate, data, self.config.max_resolution)?;
        self.store.put(point)
    }

    /// Insert a point under a freshly generated UUID key.
    pub fn insert_point_auto(
        &mut self,
        coordinate: Coordinate,
        data: impl Into<Bytes>,
    ) -> Result<String> {
        let key = uuid::Uuid::new_v4().to_string();
        self.insert_point(key.clone(), coordinate, data)?;
        Ok(key)
    }

    pub fn get(&self, key: &str) -> Result<Option<IndexedPoint>> {
        self.store.get(key)
    }

    /// Move an existing point, recomputing its prefixes before the write.
    pub fn relocate(&mut self, key: &str, coordinate: Coordinate) -> Result<IndexedPoint> {
        let coordinate = self.admit(coordinate)?;
        let mut point = self
            .store
            .get(key)?
            .ok_or_else(|| GeocellError::PointNotFound(key.to_string()))?;

        point.relocate(coordinate, self.config.max_resolution)?;
        self.store.put(point.clone())?;
        Ok(point)
    }

    /// Replace a point's payload, keeping its location and prefixes.
    pub fn update_data(&mut self, key: &str, data: impl Into<Bytes>) -> Result<IndexedPoint> {
        let mut point = self
            .store
            .get(key)?
            .ok_or_else(|| GeocellError::PointNotFound(key.to_string()))?;

        point.set_data(data);
        self.store.put(point.clone())?;
        Ok(point)
    }

    pub fn delete(&mut self, key: &str) -> Result<Option<IndexedPoint>> {
        self.store.remove(key)
    }

    /// Every point ordered by key, up to `max_results` (or the configured
    /// default cap).
    pub fn query_all(&self, max_results: Option<usize>) -> Result<Vec<IndexedPoint>> {
        let limit = self.limit(max_results);
        let mut points: Vec<IndexedPoint> = self.store.iter()?.collect();
        points.sort_by(|a, b| a.key().cmp(b.key()));
        points.truncate(limit);
        Ok(points)
    }

    /// Points within `max_distance` meters of `center`, nearest first.
    /// `None` for `max_results` applies `config.default_max_results`.
    pub fn nearest(
        &self,
        center: &Coordinate,
        max_distance: f64,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        search::nearest(
            &self.store,
            center,
            max_distance,
            Some(self.limit(max_results)),
            self.config.max_resolution,
        )
    }

    /// Points near a stored point, excluding the point itself.
    pub fn nearest_to_point(
        &self,
        key: &str,
        max_distance: f64,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        let target = self
            .store
            .get(key)?
            .ok_or_else(|| GeocellError::PointNotFound(key.to_string()))?;

        // One extra slot for the target, which always matches at distance zero.
        let limit = self.limit(max_results);
        let mut hits = search::nearest(
            &self.store,
            target.coordinate(),
            max_distance,
            Some(limit.saturating_add(1)),
            self.config.max_resolution,
        )?;
        hits.retain(|hit| hit.key() != key);
        hits.truncate(limit);
        Ok(hits)
    }

    /// Covering-circle box query; may include points just outside the box.
    pub fn query_box(
        &self,
        southwest: &Coordinate,
        northeast: &Coordinate,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        search::query_box(
            &self.store,
            southwest,
            northeast,
            Some(self.limit(max_results)),
            self.config.max_resolution,
        )
    }

    /// Box query that only returns points inside the box.
    pub fn query_box_exact(
        &self,
        southwest: &Coordinate,
        northeast: &Coordinate,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        search::query_box_exact(
            &self.store,
            southwest,
            northeast,
            Some(self.limit(max_results)),
            self.config.max_resolution,
        )
    }

    /// [`query_box`](Self::query_box) taking a [`BoundingBox`].
    pub fn query_bbox(
        &self,
        bbox: &BoundingBox,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor>> {
        self.query_box(&bbox.southwest, &bbox.northeast, max_results)
    }

    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    fn limit(&self, max_results: Option<usize>) -> usize {
        max_results.unwrap_or(self.config.default_max_results)
    }

    fn admit(&self, coordinate: Coordinate) -> Result<Coordinate> {
        if self.config.strict_coordinates {
            validate_coordinate(&coordinate)?;
            Ok(coordinate)
        } else {
            validate_finite(&coordinate)?;
            Ok(coordinate.clamped())
        }
    }
}
