use crate::coord::{Coordinate, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
use geo::Rect;
use serde::{Deserialize, Serialize};

/// A rectangle on the globe given by its southwest and northeast corners.
///
/// The corners are stored as given. Boxes that cross the antimeridian
/// (southwest longitude greater than northeast longitude) are not modelled;
/// callers are expected to reject them before querying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub southwest: Coordinate,
    pub northeast: Coordinate,
}

impl BoundingBox {
    /// Create a bounding box from its southwest and northeast corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocell_types::bbox::BoundingBox;
    /// use geocell_types::coord::Coordinate;
    ///
    /// let bbox = BoundingBox::new(Coordinate::new(40.7, -74.0), Coordinate::new(40.8, -73.9));
    /// assert!((bbox.height() - 0.1).abs() < 1e-9);
    /// ```
    pub fn new(southwest: Coordinate, northeast: Coordinate) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    /// The whole world, the starting cell of every geocell encoding.
    pub fn world() -> Self {
        Self::new(
            Coordinate::new(MIN_LATITUDE, MIN_LONGITUDE),
            Coordinate::new(MAX_LATITUDE, MAX_LONGITUDE),
        )
    }

    pub fn south(&self) -> f64 {
        self.southwest.latitude
    }

    pub fn north(&self) -> f64 {
        self.northeast.latitude
    }

    pub fn west(&self) -> f64 {
        self.southwest.longitude
    }

    pub fn east(&self) -> f64 {
        self.northeast.longitude
    }

    pub fn northwest(&self) -> Coordinate {
        Coordinate::new(self.north(), self.west())
    }

    pub fn southeast(&self) -> Coordinate {
        Coordinate::new(self.south(), self.east())
    }

    /// Arithmetic midpoint of the two corners.
    pub fn center(&self) -> Coordinate {
        self.southwest.midpoint(&self.northeast)
    }

    /// Latitude extent in degrees.
    pub fn height(&self) -> f64 {
        self.north() - self.south()
    }

    /// Longitude extent in degrees.
    pub fn width(&self) -> f64 {
        self.east() - self.west()
    }

    /// Inclusive membership test on both axes.
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        coordinate.latitude >= self.south()
            && coordinate.latitude <= self.north()
            && coordinate.longitude >= self.west()
            && coordinate.longitude <= self.east()
    }

    /// True if the box is fully contained in `other`.
    pub fn is_within(&self, other: &BoundingBox) -> bool {
        other.contains(&self.southwest) && other.contains(&self.northeast)
    }

    /// Convert to a `geo::Rect` (x = longitude, y = latitude).
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::Coord::from(self.southwest),
            geo::Coord::from(self.northeast),
        )
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::new(
            Coordinate::new(rect.min().y, rect.min().x),
            Coordinate::new(rect.max().y, rect.max().x),
        )
    }
}
