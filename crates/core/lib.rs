//! Geocell spatial index: proximity search without a geospatial database.
//!
//! ## Features
//! - **Geocell encoding**: latitude/longitude to a hierarchical 16-symbol code whose
//!   prefixes name the enclosing cells
//! - **Great-circle distance**: spherical Vincenty formula on the WGS-84 equatorial radius
//! - **Proximity search**: k-nearest within a radius, and bounding box queries, answered
//!   with exact-prefix lookups at decreasing resolution
//! - **Pluggable storage**: any backend implementing [`PointLookup`] can be searched; an
//!   in-memory [`MemoryPointStore`] is included
//!
//! ## Approximation
//! Searches stop at the first resolution whose cell holds enough qualifying points, so a
//! point just across a cell boundary may be passed over for a farther one inside the
//! cell. Every returned point is still within the requested distance and count.
//!
//! ```rust
//! use geocell::{Coordinate, GeoIndex};
//!
//! let mut index = GeoIndex::memory()?;
//! index.insert_point("bga", Coordinate::new(7.1333, -73.0), "Bucaramanga")?;
//! index.insert_point("zrh", Coordinate::new(47.3667, 8.55), "Zurich")?;
//!
//! let nearby = index.nearest(&Coordinate::new(7.1233, -73.0), 2000.0, Some(10))?;
//! assert_eq!(nearby[0].key(), "bga");
//!
//! let in_box = index.query_box(
//!     &Coordinate::new(47.0, 8.0),
//!     &Coordinate::new(48.0, 9.0),
//!     None,
//! )?;
//! assert_eq!(in_box[0].key(), "zrh");
//! # Ok::<(), geocell::GeocellError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod db;
pub mod error;
pub mod point;
pub mod storage;

pub use builder::GeoIndexBuilder;
pub use config::IndexConfig;
pub use db::{GeoIndex, SyncGeoIndex};
pub use error::{GeocellError, Result};
pub use point::IndexedPoint;

pub use geocell_types::bbox::BoundingBox;
pub use geocell_types::coord::Coordinate;

pub use compute::distance::{EARTH_RADIUS_METERS, distance};
pub use compute::geocell::{GEO_MAPPING, MAX_RESOLUTION, ancestor_codes, cell_bounds, encode};
pub use compute::search::{Neighbor, covering_circle, nearest, query_box, query_box_exact};

pub use storage::{MemoryPointStore, PointLookup, PointStore, StoreStats};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeoIndex, GeoIndexBuilder, GeocellError, Result, SyncGeoIndex};

    pub use crate::{BoundingBox, Coordinate, IndexedPoint, Neighbor};

    pub use crate::IndexConfig;

    pub use crate::{MemoryPointStore, PointLookup, PointStore};
}
