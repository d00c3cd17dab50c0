//! Validation for query inputs.

use crate::error::{GeocellError, Result};
use geocell_types::bbox::BoundingBox;
use geocell_types::coord::Coordinate;

/// Validates a coordinate has finite, in-range latitude and longitude.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]
///
/// # Examples
///
/// ```
/// use geocell::compute::validation::validate_coordinate;
/// use geocell::Coordinate;
///
/// assert!(validate_coordinate(&Coordinate::new(47.3667, 8.55)).is_ok());
/// assert!(validate_coordinate(&Coordinate::new(95.0, 8.55)).is_err());
/// assert!(validate_coordinate(&Coordinate::new(47.0, -200.0)).is_err());
/// ```
pub fn validate_coordinate(coordinate: &Coordinate) -> Result<()> {
    let (lat, lon) = (coordinate.lat(), coordinate.lon());

    if !lat.is_finite() {
        return Err(not_finite("Latitude", lat));
    }

    if !lon.is_finite() {
        return Err(not_finite("Longitude", lon));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeocellError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(GeocellError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }

    Ok(())
}

/// Only finiteness is required; clamping handles the range.
pub fn validate_finite(coordinate: &Coordinate) -> Result<()> {
    if !coordinate.lat().is_finite() {
        return Err(not_finite("Latitude", coordinate.lat()));
    }
    if !coordinate.lon().is_finite() {
        return Err(not_finite("Longitude", coordinate.lon()));
    }
    Ok(())
}

/// A search radius must be a non-negative number. `f64::INFINITY` means unbounded.
pub fn validate_distance(max_distance: f64) -> Result<()> {
    if max_distance.is_nan() || max_distance < 0.0 {
        return Err(GeocellError::InvalidInput(format!(
            "Distance must be a non-negative number of meters, got: {}",
            max_distance
        )));
    }
    Ok(())
}

/// Validates both corners and their ordering.
///
/// Boxes whose southwest longitude is east of the northeast longitude would
/// cross the antimeridian, which the covering-circle reduction cannot express,
/// so they are rejected.
///
/// # Examples
///
/// ```
/// use geocell::compute::validation::validate_bounding_box;
/// use geocell::{BoundingBox, Coordinate};
///
/// let ok = BoundingBox::new(Coordinate::new(40.7, -74.0), Coordinate::new(40.8, -73.9));
/// assert!(validate_bounding_box(&ok).is_ok());
///
/// let inverted = BoundingBox::new(Coordinate::new(40.8, -74.0), Coordinate::new(40.7, -73.9));
/// assert!(validate_bounding_box(&inverted).is_err());
/// ```
pub fn validate_bounding_box(bbox: &BoundingBox) -> Result<()> {
    validate_coordinate(&bbox.southwest)?;
    validate_coordinate(&bbox.northeast)?;

    if bbox.south() > bbox.north() {
        return Err(GeocellError::InvalidInput(format!(
            "Southwest latitude {} is north of northeast latitude {}",
            bbox.south(),
            bbox.north()
        )));
    }

    if bbox.west() > bbox.east() {
        return Err(GeocellError::InvalidInput(format!(
            "Southwest longitude {} is east of northeast longitude {}; \
            boxes crossing the antimeridian are not supported",
            bbox.west(),
            bbox.east()
        )));
    }

    Ok(())
}

fn not_finite(axis: &str, value: f64) -> GeocellError {
    GeocellError::InvalidInput(format!("{} must be finite, got: {}", axis, value))
}
