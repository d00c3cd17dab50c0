//! Great-circle distance on a spherical earth.

use geocell_types::coord::Coordinate;
use std::cmp::Ordering;

/// WGS-84 equatorial radius, used as the radius of the sphere.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Great-circle distance in meters between two coordinates.
///
/// Uses the spherical special case of the Vincenty formula, which stays well
/// conditioned for both tiny and antipodal separations. The arguments are put
/// in a canonical order first, so `distance(a, b)` and `distance(b, a)` are
/// bitwise equal.
///
/// # Examples
///
/// ```
/// use geocell::compute::distance::distance;
/// use geocell::Coordinate;
///
/// let a = Coordinate::new(7.1333, -73.0);
/// let b = Coordinate::new(7.1233, -73.0);
/// assert!((distance(&a, &b) - 1113.19).abs() < 0.01);
/// assert_eq!(distance(&a, &a), 0.0);
/// ```
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let (p1, p2) = match canonical_order(a, b) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };

    let phi_1 = p1.lat().to_radians();
    let phi_2 = p2.lat().to_radians();
    let delta_lambda = (p2.lon().to_radians() - p1.lon().to_radians()).abs();

    let (sin_phi_1, cos_phi_1) = phi_1.sin_cos();
    let (sin_phi_2, cos_phi_2) = phi_2.sin_cos();
    let (sin_delta, cos_delta) = delta_lambda.sin_cos();

    let numerator = (cos_phi_2 * sin_delta).powi(2)
        + (cos_phi_1 * sin_phi_2 - sin_phi_1 * cos_phi_2 * cos_delta).powi(2);
    let denominator = sin_phi_1 * sin_phi_2 + cos_phi_1 * cos_phi_2 * cos_delta;

    EARTH_RADIUS_METERS * numerator.sqrt().atan2(denominator)
}

fn canonical_order(a: &Coordinate, b: &Coordinate) -> Ordering {
    a.lat()
        .total_cmp(&b.lat())
        .then_with(|| a.lon().total_cmp(&b.lon()))
}

/// Meters spanned by one degree of latitude on the sphere.
#[inline]
pub fn meters_per_degree() -> f64 {
    EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0
}
