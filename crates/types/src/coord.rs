use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A geographic location in degrees.
///
/// Unlike `geo::Point`, the constructor takes latitude first, which is the
/// order used throughout the geocell encoder. Range checks are left to the
/// caller; see [`Coordinate::is_valid`] and [`Coordinate::clamped`].
///
/// # Examples
///
/// ```
/// use geocell_types::coord::Coordinate;
///
/// let bucaramanga = Coordinate::new(7.1333, -73.0);
/// assert_eq!(bucaramanga.lat(), 7.1333);
/// assert_eq!(bucaramanga.lon(), -73.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.longitude
    }

    /// True if both components are finite and inside the latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (MIN_LATITUDE..=MAX_LATITUDE).contains(&self.latitude)
            && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude)
    }

    /// Clamp both components into range. Non-finite components are left as-is.
    ///
    /// ```
    /// use geocell_types::coord::Coordinate;
    ///
    /// let c = Coordinate::new(95.0, -200.0).clamped();
    /// assert_eq!(c, Coordinate::new(90.0, -180.0));
    /// ```
    pub fn clamped(&self) -> Self {
        Self {
            latitude: self.latitude.clamp(MIN_LATITUDE, MAX_LATITUDE),
            longitude: self.longitude.clamp(MIN_LONGITUDE, MAX_LONGITUDE),
        }
    }

    /// Plain arithmetic midpoint of two coordinates.
    pub fn midpoint(&self, other: &Coordinate) -> Self {
        Self {
            latitude: (self.latitude + other.latitude) / 2.0,
            longitude: (self.longitude + other.longitude) / 2.0,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::coord! { x: coordinate.longitude, y: coordinate.latitude }
    }
}
