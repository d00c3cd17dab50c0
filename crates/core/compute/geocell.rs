//! Geocell encoding.
//!
//! A geocell code names a rectangle of the globe. Each symbol picks one cell
//! of a 4x4 grid laid over the previous cell, starting from the whole world,
//! so a code of length `r` is always a prefix of the longer codes computed
//! for the same coordinate. Stored points keep every prefix of their code,
//! which turns "points in this cell" into an exact-match lookup.
//!
//! ```text
//!          west ─────────────► east
//!   north  +---+---+---+---+
//!     ▲    | a | b | e | f |
//!     │    +---+---+---+---+
//!     │    | 8 | 9 | c | d |
//!     │    +---+---+---+---+
//!     │    | 2 | 3 | 6 | 7 |
//!     │    +---+---+---+---+
//!   south  | 0 | 1 | 4 | 5 |
//!          +---+---+---+---+
//! ```
//!
//! | Resolution | Cell height (approx) |
//! |------------|----------------------|
//! | 4          | ~78km                |
//! | 6          | ~4.9km               |
//! | 8          | ~305m                |
//! | 10         | ~19m                 |
//! | 12         | ~1.2m                |

use crate::error::{GeocellError, Result};
use geocell_types::bbox::BoundingBox;
use geocell_types::coord::Coordinate;

/// Subdivisions per axis at each level.
pub const GRID_SIZE: usize = 4;

/// Finest supported resolution. Past this, cell edges fall below the
/// spacing of `f64` values near ±180°.
pub const MAX_RESOLUTION: usize = 24;

/// Symbol for each cell, indexed `[latitude row][longitude column]` with row 0
/// at the south edge and column 0 at the west edge.
pub const GEO_MAPPING: [[u8; GRID_SIZE]; GRID_SIZE] = [
    [b'0', b'1', b'4', b'5'],
    [b'2', b'3', b'6', b'7'],
    [b'8', b'9', b'c', b'd'],
    [b'a', b'b', b'e', b'f'],
];

/// Encode a latitude/longitude pair as a geocell code of `resolution` symbols.
///
/// Coordinates outside the valid ranges land in the nearest edge cell; range
/// validation is the caller's job.
///
/// # Examples
///
/// ```
/// use geocell::compute::geocell::encode;
///
/// assert_eq!(encode(0.0, 0.0, 1)?, "c");
/// assert_eq!(encode(47.3667, 8.55, 12)?, "e01e23b29f44");
/// assert!(encode(47.3667, 8.55, 12)?.starts_with(&encode(47.3667, 8.55, 5)?));
/// # Ok::<(), geocell::GeocellError>(())
/// ```
pub fn encode(latitude: f64, longitude: f64, resolution: usize) -> Result<String> {
    validate_resolution(resolution)?;

    let mut cell = BoundingBox::world();
    let mut code = String::with_capacity(resolution);

    for _ in 0..resolution {
        let row = grid_index(latitude, cell.south(), cell.north());
        let column = grid_index(longitude, cell.west(), cell.east());

        cell = subdivide(&cell, row, column);
        code.push(GEO_MAPPING[row][column] as char);
    }

    Ok(code)
}

/// Encode a [`Coordinate`].
pub fn encode_coordinate(coordinate: &Coordinate, resolution: usize) -> Result<String> {
    encode(coordinate.lat(), coordinate.lon(), resolution)
}

/// All non-empty prefixes of `code`, shortest first.
///
/// ```
/// use geocell::compute::geocell::ancestor_codes;
///
/// assert_eq!(ancestor_codes("c0f"), vec!["c", "c0", "c0f"]);
/// assert!(ancestor_codes("").is_empty());
/// ```
pub fn ancestor_codes(code: &str) -> Vec<String> {
    (1..=code.len()).map(|len| code[..len].to_string()).collect()
}

/// Every prefix stored for an indexed point: the empty root cell followed by
/// [`ancestor_codes`]. Position `i` holds the prefix of length `i`.
pub fn index_prefixes(code: &str) -> Vec<String> {
    (0..=code.len()).map(|len| code[..len].to_string()).collect()
}

/// The parent cell, or `None` for the root.
pub fn parent(code: &str) -> Option<&str> {
    if code.is_empty() {
        None
    } else {
        Some(&code[..code.len() - 1])
    }
}

/// Decode a code into the rectangle it names.
///
/// ```
/// use geocell::compute::geocell::cell_bounds;
///
/// let cell = cell_bounds("c")?;
/// assert_eq!(cell.south(), 0.0);
/// assert_eq!(cell.north(), 45.0);
/// assert_eq!(cell.west(), 0.0);
/// assert_eq!(cell.east(), 90.0);
/// # Ok::<(), geocell::GeocellError>(())
/// ```
pub fn cell_bounds(code: &str) -> Result<BoundingBox> {
    validate_geocell(code)?;

    let mut cell = BoundingBox::world();
    for symbol in code.bytes() {
        // validate_geocell guarantees every symbol is in the table
        let (row, column) = symbol_position(symbol)
            .ok_or_else(|| GeocellError::InvalidGeocell(code.to_string()))?;
        cell = subdivide(&cell, row, column);
    }

    Ok(cell)
}

/// Check that `code` only uses symbols from [`GEO_MAPPING`] and is not longer
/// than [`MAX_RESOLUTION`].
pub fn validate_geocell(code: &str) -> Result<()> {
    if code.len() > MAX_RESOLUTION {
        return Err(GeocellError::InvalidGeocell(format!(
            "{} has {} symbols, at most {} are supported",
            code,
            code.len(),
            MAX_RESOLUTION
        )));
    }

    if let Some(bad) = code.bytes().find(|b| symbol_position(*b).is_none()) {
        return Err(GeocellError::InvalidGeocell(format!(
            "{} contains symbol {:?} outside 0-9a-f",
            code, bad as char
        )));
    }

    Ok(())
}

pub fn validate_resolution(resolution: usize) -> Result<()> {
    if resolution > MAX_RESOLUTION {
        return Err(GeocellError::InvalidResolution {
            resolution,
            max: MAX_RESOLUTION,
        });
    }
    Ok(())
}

/// Grid row/column of a symbol.
fn symbol_position(symbol: u8) -> Option<(usize, usize)> {
    GEO_MAPPING.iter().enumerate().find_map(|(row, symbols)| {
        symbols
            .iter()
            .position(|s| *s == symbol)
            .map(|column| (row, column))
    })
}

/// Index of `value` within `[low, high]` split into `GRID_SIZE` slices.
/// `value == high` belongs to the last slice rather than a fifth one.
#[inline]
fn grid_index(value: f64, low: f64, high: f64) -> usize {
    let scaled = ((value - low) * GRID_SIZE as f64 / (high - low)).floor();
    // f64::max/min drop NaN, so non-finite input resolves to slice 0
    scaled.max(0.0).min((GRID_SIZE - 1) as f64) as usize
}

#[inline]
fn subdivide(cell: &BoundingBox, row: usize, column: usize) -> BoundingBox {
    let lat_step = cell.height() / GRID_SIZE as f64;
    let lon_step = cell.width() / GRID_SIZE as f64;

    let south = cell.south() + row as f64 * lat_step;
    let west = cell.west() + column as f64 * lon_step;

    BoundingBox::new(
        Coordinate::new(south, west),
        Coordinate::new(south + lat_step, west + lon_step),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZURICH: (f64, f64) = (47.3667, 8.5500);
    const BUCARAMANGA: (f64, f64) = (7.1333, -73.0);

    fn contains_approx(cell: &BoundingBox, point: &Coordinate) -> bool {
        const EPS: f64 = 1e-9;
        point.lat() >= cell.south() - EPS
            && point.lat() <= cell.north() + EPS
            && point.lon() >= cell.west() - EPS
            && point.lon() <= cell.east() + EPS
    }

    #[test]
    fn test_origin_is_boundary_clamped_center_cell() {
        assert_eq!(encode(0.0, 0.0, 1).unwrap(), "c");
        assert_eq!(encode(0.0, 0.0, 3).unwrap(), "c00");
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(encode(ZURICH.0, ZURICH.1, 12).unwrap(), "e01e23b29f44");
        assert_eq!(
            encode(BUCARAMANGA.0, BUCARAMANGA.1, 12).unwrap(),
            "90d80936582b"
        );
        assert_eq!(encode(7.1233, -73.0, 12).unwrap(), "90d80916d00b");
    }

    #[test]
    fn test_world_corners_clamp_into_grid() {
        assert_eq!(encode(90.0, 180.0, 3).unwrap(), "fff");
        assert_eq!(encode(-90.0, -180.0, 3).unwrap(), "000");
        assert_eq!(encode(90.0, -180.0, 2).unwrap(), "aa");
        assert_eq!(encode(-90.0, 180.0, 2).unwrap(), "55");
    }

    #[test]
    fn test_out_of_range_lands_in_edge_cells() {
        assert_eq!(encode(120.0, 0.0, 2).unwrap(), encode(90.0, 0.0, 2).unwrap());
        assert_eq!(
            encode(0.0, -400.0, 2).unwrap(),
            encode(0.0, -180.0, 2).unwrap()
        );
    }

    #[test]
    fn test_length_matches_resolution() {
        for resolution in 0..=MAX_RESOLUTION {
            let code = encode(ZURICH.0, ZURICH.1, resolution).unwrap();
            assert_eq!(code.len(), resolution);
        }
    }

    #[test]
    fn test_codes_are_prefix_stable() {
        let samples = [
            ZURICH,
            BUCARAMANGA,
            (0.0, 0.0),
            (-33.8688, 151.2093),
            (89.9999, -179.9999),
            (-45.0, 90.0),
        ];
        for (lat, lon) in samples {
            for resolution in 0..MAX_RESOLUTION {
                let coarse = encode(lat, lon, resolution).unwrap();
                let fine = encode(lat, lon, resolution + 1).unwrap();
                assert!(
                    fine.starts_with(&coarse),
                    "{} is not a prefix of {} at ({}, {})",
                    coarse,
                    fine,
                    lat,
                    lon
                );
            }
        }
    }

    #[test]
    fn test_resolution_zero_is_root() {
        assert_eq!(encode(12.0, 34.0, 0).unwrap(), "");
    }

    #[test]
    fn test_resolution_too_large() {
        let err = encode(0.0, 0.0, MAX_RESOLUTION + 1).unwrap_err();
        assert!(matches!(
            err,
            GeocellError::InvalidResolution { resolution, max }
                if resolution == MAX_RESOLUTION + 1 && max == MAX_RESOLUTION
        ));
    }

    #[test]
    fn test_coincident_points_share_codes() {
        let a = encode(ZURICH.0, ZURICH.1, 12).unwrap();
        let b = encode(47.3667, 8.5500, 12).unwrap();
        assert_eq!(a, b);
        assert_eq!(ancestor_codes(&a), ancestor_codes(&b));
    }

    #[test]
    fn test_ancestor_codes() {
        let code = encode(ZURICH.0, ZURICH.1, 12).unwrap();
        let ancestors = ancestor_codes(&code);
        assert_eq!(ancestors.len(), 12);
        assert_eq!(ancestors[0], "e");
        assert_eq!(ancestors[11], code);
        for (i, ancestor) in ancestors.iter().enumerate() {
            assert_eq!(ancestor.len(), i + 1);
            assert!(code.starts_with(ancestor.as_str()));
        }
    }

    #[test]
    fn test_index_prefixes_start_with_root() {
        let prefixes = index_prefixes("c0f");
        assert_eq!(prefixes, vec!["", "c", "c0", "c0f"]);
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("c0f"), Some("c0"));
        assert_eq!(parent("c"), Some(""));
        assert_eq!(parent(""), None);
    }

    #[test]
    fn test_mapping_is_a_permutation() {
        let mut symbols: Vec<u8> = GEO_MAPPING.iter().flatten().copied().collect();
        symbols.sort_unstable();
        assert_eq!(symbols, b"0123456789abcdef".to_vec());
    }

    #[test]
    fn test_mapping_neighbours_share_quadrant() {
        // Each 2x2 quadrant holds four consecutive symbols.
        for quadrant_row in 0..2 {
            for quadrant_col in 0..2 {
                let mut values: Vec<u8> = (0..2)
                    .flat_map(|r| {
                        (0..2).map(move |c| GEO_MAPPING[quadrant_row * 2 + r][quadrant_col * 2 + c])
                    })
                    .map(|s| (s as char).to_digit(16).unwrap() as u8)
                    .collect();
                values.sort_unstable();
                assert_eq!(values[3] - values[0], 3);
                assert_eq!(values[0] % 4, 0);
            }
        }
    }

    #[test]
    fn test_cell_bounds_contain_the_encoded_point() {
        let samples = [ZURICH, BUCARAMANGA, (-33.8688, 151.2093), (0.0, 0.0)];
        for (lat, lon) in samples {
            let point = Coordinate::new(lat, lon);
            for resolution in [1, 4, 8, 12] {
                let code = encode(lat, lon, resolution).unwrap();
                let cell = cell_bounds(&code).unwrap();
                assert!(
                    contains_approx(&cell, &point),
                    "{} does not contain {}",
                    code,
                    point
                );
            }
        }
    }

    #[test]
    fn test_cell_bounds_nest() {
        let code = encode(ZURICH.0, ZURICH.1, 10).unwrap();
        let child = cell_bounds(&code).unwrap();
        let parent_cell = cell_bounds(parent(&code).unwrap()).unwrap();
        assert!(contains_approx(&parent_cell, &child.southwest));
        assert!(contains_approx(&parent_cell, &child.northeast));
        assert!((parent_cell.height() / child.height() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_cell_bounds_root_is_world() {
        assert_eq!(cell_bounds("").unwrap(), BoundingBox::world());
    }

    #[test]
    fn test_invalid_geocells() {
        assert!(matches!(
            cell_bounds("c0g"),
            Err(GeocellError::InvalidGeocell(_))
        ));
        assert!(matches!(
            validate_geocell("C"),
            Err(GeocellError::InvalidGeocell(_))
        ));
        let too_long = "0".repeat(MAX_RESOLUTION + 1);
        assert!(validate_geocell(&too_long).is_err());
        assert!(validate_geocell("0123456789abcdef").is_ok());
    }

    #[test]
    fn test_nan_does_not_panic() {
        let code = encode(f64::NAN, f64::NAN, 4).unwrap();
        assert_eq!(code.len(), 4);
    }
}
