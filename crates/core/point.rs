//! Points as they are kept by a point store.

use crate::compute::geocell::{encode_coordinate, index_prefixes};
use crate::error::{GeocellError, Result};
use bytes::Bytes;
use geocell_types::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// A stored point: identity, location, opaque payload, and the geocell
/// prefixes a store indexes it under.
///
/// `cells[i]` is the prefix of length `i`, from the empty root cell up to the
/// full code at the point's resolution. The list is computed on creation and
/// on [`relocate`](IndexedPoint::relocate); nothing else touches it.
/// Deserialization recomputes the list from the coordinate and rejects a
/// stored list that disagrees with it.
///
/// # Examples
///
/// ```
/// use geocell::{Coordinate, IndexedPoint};
///
/// let point = IndexedPoint::new("zurich", Coordinate::new(47.3667, 8.55), "HB", 12)?;
/// assert_eq!(point.geocell(), "e01e23b29f44");
/// assert!(point.has_prefix("e01e"));
/// assert!(!point.has_prefix("e02"));
/// # Ok::<(), geocell::GeocellError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredPoint")]
pub struct IndexedPoint {
    key: String,
    coordinate: Coordinate,
    cells: Vec<String>,
    data: Bytes,
}

/// Wire form of an [`IndexedPoint`], checked before it becomes one.
#[derive(Deserialize)]
struct StoredPoint {
    key: String,
    coordinate: Coordinate,
    cells: Vec<String>,
    data: Bytes,
}

impl TryFrom<StoredPoint> for IndexedPoint {
    type Error = GeocellError;

    fn try_from(stored: StoredPoint) -> Result<Self> {
        let resolution = stored.cells.len().checked_sub(1).ok_or_else(|| {
            GeocellError::InvalidGeocell(format!("point {} has no indexed cells", stored.key))
        })?;

        let point = IndexedPoint::new(stored.key, stored.coordinate, stored.data, resolution)?;
        if point.cells != stored.cells {
            return Err(GeocellError::InvalidGeocell(format!(
                "cells of point {} do not match its coordinate {}",
                point.key, point.coordinate
            )));
        }
        Ok(point)
    }
}

impl IndexedPoint {
    pub fn new(
        key: impl Into<String>,
        coordinate: Coordinate,
        data: impl Into<Bytes>,
        resolution: usize,
    ) -> Result<Self> {
        let cells = index_prefixes(&encode_coordinate(&coordinate, resolution)?);
        Ok(Self {
            key: key.into(),
            coordinate,
            cells,
            data: data.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Every indexed prefix, root first.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Resolution the point was indexed at.
    pub fn resolution(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// The full-resolution geocell code.
    pub fn geocell(&self) -> &str {
        self.cells.last().map(String::as_str).unwrap_or("")
    }

    /// True if `prefix` is one of the point's indexed cells.
    #[inline]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.cells
            .get(prefix.len())
            .is_some_and(|cell| cell == prefix)
    }

    /// Move the point, recomputing its prefixes at `resolution`.
    pub fn relocate(&mut self, coordinate: Coordinate, resolution: usize) -> Result<()> {
        self.cells = index_prefixes(&encode_coordinate(&coordinate, resolution)?);
        self.coordinate = coordinate;
        Ok(())
    }

    /// Replace the payload. Leaves the location and prefixes untouched.
    pub fn set_data(&mut self, data: impl Into<Bytes>) {
        self.data = data.into();
    }
}
