//! Index builder for flexible configuration
//!
//! Collects configuration up front and builds either a plain [`GeoIndex`]
//! or a thread-safe [`SyncGeoIndex`] over any [`PointStore`].

use crate::config::IndexConfig;
use crate::db::{GeoIndex, SyncGeoIndex};
use crate::error::Result;
use crate::storage::{MemoryPointStore, PointStore};
use std::path::Path;

/// Builder for index configuration.
#[derive(Debug, Clone, Default)]
pub struct GeoIndexBuilder {
    config: IndexConfig,
}

impl GeoIndexBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a configuration file (see [`IndexConfig::from_path`]).
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            config: IndexConfig::from_path(path)?,
        })
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolution points are indexed at and searches start from.
    pub fn max_resolution(mut self, resolution: usize) -> Self {
        self.config = self.config.with_max_resolution(resolution);
        self
    }

    /// Result cap for queries that pass `None`.
    pub fn default_max_results(mut self, max_results: usize) -> Self {
        self.config = self.config.with_default_max_results(max_results);
        self
    }

    /// Reject (true) or clamp (false) out-of-range coordinates on insert.
    pub fn strict_coordinates(mut self, strict: bool) -> Self {
        self.config = self.config.with_strict_coordinates(strict);
        self
    }

    /// Build an in-memory index.
    pub fn build(self) -> Result<GeoIndex<MemoryPointStore>> {
        GeoIndex::memory_with_config(self.config)
    }

    /// Build an index over a caller-supplied store.
    pub fn build_with_store<S: PointStore>(self, store: S) -> Result<GeoIndex<S>> {
        GeoIndex::with_store(store, self.config)
    }

    /// Build a thread-safe in-memory index.
    pub fn build_sync(self) -> Result<SyncGeoIndex<MemoryPointStore>> {
        Ok(SyncGeoIndex::new(self.build()?))
    }
}
