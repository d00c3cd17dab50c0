//! # geocell-types
//!
//! Value types shared by the geocell proximity index:
//!
//! - **Coordinate**: a latitude/longitude pair in degrees
//! - **BoundingBox**: a southwest/northeast rectangle on the globe
//!
//! Both are plain `Copy` values, serializable with Serde and convertible to
//! the `geo` crate's primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geocell_types::bbox::BoundingBox;
//! use geocell_types::coord::Coordinate;
//!
//! let zurich = Coordinate::new(47.3667, 8.5500);
//! let canton = BoundingBox::new(Coordinate::new(47.15, 8.35), Coordinate::new(47.70, 8.99));
//! assert!(canton.contains(&zurich));
//! ```

pub mod bbox;
pub mod coord;
