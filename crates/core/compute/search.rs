//! Expanding-resolution proximity search.
//!
//! The store only answers "which points carry this exact prefix", so a radius
//! query is approximated by walking up the query point's own cell hierarchy:
//!
//! ```text
//! 1. Encode the center at max_resolution
//! 2. For r = max_resolution down to 0:
//!    - Look up every point indexed under center_code[..r]
//!    - Keep those strictly closer than max_distance, sorted by distance
//!    - Stop once max_results points qualify
//! 3. Return the first max_results
//! ```
//!
//! Each level replaces the previous candidate set rather than merging with it;
//! the coarser cell already contains everything the finer one did.
//!
//! The result is not an exact k-nearest set. A point just across a cell
//! boundary can lose to a farther point that shares a longer prefix with the
//! center, because the walk stops at the first level that yields enough
//! qualifying points. The distance filter still guarantees that nothing
//! farther than `max_distance` is returned.

use crate::compute::distance::distance;
use crate::compute::geocell::{encode_coordinate, validate_resolution};
use crate::compute::validation::{validate_bounding_box, validate_coordinate, validate_distance};
use crate::error::Result;
use crate::point::IndexedPoint;
use crate::storage::PointLookup;
use geocell_types::bbox::BoundingBox;
use geocell_types::coord::Coordinate;

/// A search hit with its distance to the query center in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub point: IndexedPoint,
    pub distance: f64,
}

impl Neighbor {
    pub fn key(&self) -> &str {
        self.point.key()
    }

    pub fn into_point(self) -> IndexedPoint {
        self.point
    }
}

/// Up to `max_results` points strictly closer than `max_distance` meters to
/// `center`, nearest first. Equal distances are ordered by key.
///
/// `max_results = None` puts no cap on the result count, which walks all the
/// way to the root cell and so examines every stored point.
///
/// Store failures at any level abort the whole search.
///
/// # Examples
///
/// ```
/// use geocell::compute::search::nearest;
/// use geocell::{Coordinate, IndexedPoint, MemoryPointStore, PointStore};
///
/// let mut store = MemoryPointStore::new();
/// store.put(IndexedPoint::new("a", Coordinate::new(7.1233, -73.0), "", 12)?)?;
/// store.put(IndexedPoint::new("b", Coordinate::new(47.3667, 8.55), "", 12)?)?;
///
/// let hits = nearest(&store, &Coordinate::new(7.1333, -73.0), 2000.0, Some(10), 12)?;
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].key(), "a");
/// # Ok::<(), geocell::GeocellError>(())
/// ```
pub fn nearest<L: PointLookup + ?Sized>(
    store: &L,
    center: &Coordinate,
    max_distance: f64,
    max_results: Option<usize>,
    max_resolution: usize,
) -> Result<Vec<Neighbor>> {
    validate_coordinate(center)?;
    validate_distance(max_distance)?;
    validate_resolution(max_resolution)?;

    expand_search(
        store,
        center,
        max_distance,
        max_results,
        max_resolution,
        |_| true,
    )
}

/// Points in the box spanned by `southwest` and `northeast`, nearest to the
/// box center first.
///
/// The box is reduced to its [`covering_circle`] and answered with
/// [`nearest`], so hits may lie slightly outside the box. Use
/// [`query_box_exact`] to drop those.
pub fn query_box<L: PointLookup + ?Sized>(
    store: &L,
    southwest: &Coordinate,
    northeast: &Coordinate,
    max_results: Option<usize>,
    max_resolution: usize,
) -> Result<Vec<Neighbor>> {
    let bbox = BoundingBox::new(*southwest, *northeast);
    validate_bounding_box(&bbox)?;

    let (center, radius) = covering_circle(&bbox);
    nearest(store, &center, radius, max_results, max_resolution)
}

/// Like [`query_box`], but only points inside the box count toward
/// `max_results` and are returned.
pub fn query_box_exact<L: PointLookup + ?Sized>(
    store: &L,
    southwest: &Coordinate,
    northeast: &Coordinate,
    max_results: Option<usize>,
    max_resolution: usize,
) -> Result<Vec<Neighbor>> {
    let bbox = BoundingBox::new(*southwest, *northeast);
    validate_bounding_box(&bbox)?;
    validate_resolution(max_resolution)?;

    let (center, radius) = covering_circle(&bbox);
    expand_search(store, &center, radius, max_results, max_resolution, |point| {
        bbox.contains(point.coordinate())
    })
}

/// Center and radius of a circle around `bbox`.
///
/// The center is the arithmetic midpoint of the corners. The radius is the
/// largest great-circle distance from it to any corner, nudged up by one ulp so
/// that points sitting exactly on a corner pass the strict `<` distance filter.
///
/// ```
/// use geocell::compute::search::covering_circle;
/// use geocell::{BoundingBox, Coordinate};
///
/// let bbox = BoundingBox::new(Coordinate::new(47.0, 8.0), Coordinate::new(48.0, 9.0));
/// let (center, radius) = covering_circle(&bbox);
/// assert_eq!(center, Coordinate::new(47.5, 8.5));
/// assert!(radius > 60_000.0 && radius < 70_000.0);
/// ```
pub fn covering_circle(bbox: &BoundingBox) -> (Coordinate, f64) {
    let center = bbox.center();
    let radius = [
        bbox.southwest,
        bbox.northeast,
        bbox.northwest(),
        bbox.southeast(),
    ]
    .iter()
    .map(|corner| distance(&center, corner))
    .fold(0.0_f64, f64::max);

    (center, radius.next_up())
}

/// [`nearest`] over a batch of already-loaded points, scanning instead of
/// using an index. All points should be indexed at `max_resolution` or finer.
pub fn simple_search(
    center: &Coordinate,
    points: &[IndexedPoint],
    max_results: usize,
    max_distance: f64,
    max_resolution: usize,
) -> Result<Vec<Neighbor>> {
    nearest(
        points,
        center,
        max_distance,
        Some(max_results),
        max_resolution,
    )
}

fn expand_search<L, F>(
    store: &L,
    center: &Coordinate,
    max_distance: f64,
    max_results: Option<usize>,
    max_resolution: usize,
    accept: F,
) -> Result<Vec<Neighbor>>
where
    L: PointLookup + ?Sized,
    F: Fn(&IndexedPoint) -> bool,
{
    let limit = max_results.unwrap_or(usize::MAX);
    if limit == 0 {
        return Ok(Vec::new());
    }

    let code = encode_coordinate(center, max_resolution)?;
    let mut results = Vec::new();

    for resolution in (0..=max_resolution).rev() {
        let prefix = &code[..resolution];
        let candidates = store.lookup_by_exact_prefix(prefix)?;
        let candidate_count = candidates.len();

        results = rank(candidates, center, max_distance, &accept);

        log::debug!(
            "Geocell search at resolution {} (prefix {:?}): {} candidates, {} within {}m",
            resolution,
            prefix,
            candidate_count,
            results.len(),
            max_distance
        );

        if results.len() >= limit {
            break;
        }
    }

    results.truncate(limit);
    Ok(results)
}

fn rank<F>(
    candidates: Vec<IndexedPoint>,
    center: &Coordinate,
    max_distance: f64,
    accept: &F,
) -> Vec<Neighbor>
where
    F: Fn(&IndexedPoint) -> bool,
{
    let mut ranked: Vec<Neighbor> = candidates
        .into_iter()
        .filter(|point| accept(point))
        .filter_map(|point| {
            let distance = distance(point.coordinate(), center);

            // Stored coordinates that bypassed validation can yield NaN
            if !distance.is_finite() {
                log::warn!(
                    "Skipping point {} with non-finite distance from {}",
                    point.key(),
                    center
                );
                return None;
            }

            (distance < max_distance).then_some(Neighbor { point, distance })
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.point.key().cmp(b.point.key()))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::meters_per_degree;
    use crate::error::GeocellError;
    use crate::storage::{MemoryPointStore, PointStore};

    const RESOLUTION: usize = 12;
    const BUCARAMANGA: Coordinate = Coordinate {
        latitude: 7.1333,
        longitude: -73.0,
    };

    fn point(key: &str, coordinate: Coordinate) -> IndexedPoint {
        IndexedPoint::new(key, coordinate, key.to_string(), RESOLUTION).unwrap()
    }

    /// A coordinate `meters` due north of `origin`.
    fn north_of(origin: &Coordinate, meters: f64) -> Coordinate {
        Coordinate::new(origin.lat() + meters / meters_per_degree(), origin.lon())
    }

    fn store_with(points: Vec<IndexedPoint>) -> MemoryPointStore {
        let mut store = MemoryPointStore::new();
        for p in points {
            store.put(p).unwrap();
        }
        store
    }

    fn keys(results: &[Neighbor]) -> Vec<&str> {
        results.iter().map(Neighbor::key).collect()
    }

    /// Fails every lookup for prefixes of a given length or shorter.
    struct FailingStore {
        inner: MemoryPointStore,
        fail_at_or_below: usize,
    }

    impl PointLookup for FailingStore {
        fn lookup_by_exact_prefix(&self, prefix: &str) -> Result<Vec<IndexedPoint>> {
            if prefix.len() <= self.fail_at_or_below {
                return Err(GeocellError::Store(format!("timeout looking up {:?}", prefix)));
            }
            self.inner.lookup_by_exact_prefix(prefix)
        }
    }

    #[test]
    fn test_nearest_filters_and_orders_by_distance() {
        let center = BUCARAMANGA;
        let store = store_with(vec![
            point("far", north_of(&center, 5000.0)),
            point("mid", north_of(&center, 500.0)),
            point("near", north_of(&center, 10.0)),
        ]);

        let results = nearest(&store, &center, 1000.0, Some(10), RESOLUTION).unwrap();

        assert_eq!(keys(&results), vec!["near", "mid"]);
        assert!((results[0].distance - 10.0).abs() < 1e-6);
        assert!((results[1].distance - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_results_requested() {
        let store = store_with(vec![point("a", BUCARAMANGA)]);
        let results = nearest(&store, &BUCARAMANGA, 1000.0, Some(0), RESOLUTION).unwrap();
        assert!(results.is_empty());
        assert_eq!(store.stats().unwrap().lookups, 0);
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryPointStore::new();
        let results = nearest(&store, &BUCARAMANGA, 1e7, Some(5), RESOLUTION).unwrap();
        assert!(results.is_empty());
        assert_eq!(store.stats().unwrap().lookups, RESOLUTION as u64 + 1);
    }

    #[test]
    fn test_stops_at_first_sufficient_level() {
        let store = store_with(vec![
            point("a", BUCARAMANGA),
            point("b", BUCARAMANGA),
            point("c", north_of(&BUCARAMANGA, 300.0)),
        ]);

        let results = nearest(&store, &BUCARAMANGA, 1000.0, Some(2), RESOLUTION).unwrap();

        assert_eq!(keys(&results), vec!["a", "b"]);
        assert_eq!(store.stats().unwrap().lookups, 1);
    }

    #[test]
    fn test_unbounded_results_walk_to_the_root() {
        let store = store_with(vec![
            point("a", BUCARAMANGA),
            point("zurich", Coordinate::new(47.3667, 8.55)),
        ]);

        let results = nearest(&store, &BUCARAMANGA, f64::INFINITY, None, RESOLUTION).unwrap();

        assert_eq!(keys(&results), vec!["a", "zurich"]);
        assert_eq!(store.stats().unwrap().lookups, RESOLUTION as u64 + 1);
    }

    #[test]
    fn test_result_bound_and_containment() {
        let mut points = Vec::new();
        for i in 0..20 {
            for j in 0..20 {
                let c = Coordinate::new(
                    BUCARAMANGA.lat() + (i as f64 - 10.0) * 0.002,
                    BUCARAMANGA.lon() + (j as f64 - 10.0) * 0.002,
                );
                points.push(point(&format!("p{:02}{:02}", i, j), c));
            }
        }
        let store = store_with(points);

        for (max_distance, k) in [(100.0, 3), (500.0, 10), (1500.0, 50), (5000.0, 1000)] {
            let results = nearest(&store, &BUCARAMANGA, max_distance, Some(k), RESOLUTION).unwrap();
            assert!(results.len() <= k);
            for hit in &results {
                assert!(distance(hit.point.coordinate(), &BUCARAMANGA) < max_distance);
            }
            for pair in results.windows(2) {
                assert!(pair[0].distance <= pair[1].distance);
            }
        }
    }

    #[test]
    fn test_ties_are_ordered_by_key() {
        let store = store_with(vec![
            point("charlie", BUCARAMANGA),
            point("alpha", BUCARAMANGA),
            point("bravo", BUCARAMANGA),
        ]);
        let results = nearest(&store, &BUCARAMANGA, 1.0, Some(3), RESOLUTION).unwrap();
        assert_eq!(keys(&results), vec!["alpha", "bravo", "charlie"]);
        assert!(results.iter().all(|hit| hit.distance == 0.0));
    }

    #[test]
    fn test_simple_search_city_scenarios() {
        let points = vec![
            point("nearby", Coordinate::new(7.1233, -73.0)),
            point("zurich", Coordinate::new(47.3667, 8.55)),
        ];

        let close = simple_search(&BUCARAMANGA, &points, 2, 2000.0, RESOLUTION).unwrap();
        assert_eq!(keys(&close), vec!["nearby"]);

        let wide = simple_search(&BUCARAMANGA, &points, 2, 1e7, RESOLUTION).unwrap();
        assert_eq!(keys(&wide), vec!["nearby", "zurich"]);

        let single = simple_search(&BUCARAMANGA, &points, 1, 1e7, RESOLUTION).unwrap();
        assert_eq!(keys(&single), vec!["nearby"]);
    }

    #[test]
    fn test_coarse_match_can_beat_a_closer_point_across_a_cell_edge() {
        // Center and "east" share the top-level cell; "south" sits across the
        // equator and only shares the root with the center.
        let center = Coordinate::new(0.0001, 0.0001);
        let store = store_with(vec![
            point("south", Coordinate::new(-0.0001, 0.0001)),
            point("east", Coordinate::new(0.0001, 0.001)),
        ]);

        let south = distance(&center, &Coordinate::new(-0.0001, 0.0001));
        let east = distance(&center, &Coordinate::new(0.0001, 0.001));
        assert!(south < east);

        let results = nearest(&store, &center, 1000.0, Some(1), RESOLUTION).unwrap();
        assert_eq!(keys(&results), vec!["east"]);

        // With room for both, the walk reaches the root and finds the closer one.
        let results = nearest(&store, &center, 1000.0, Some(2), RESOLUTION).unwrap();
        assert_eq!(keys(&results), vec!["south", "east"]);
    }

    #[test]
    fn test_store_failure_is_propagated() {
        let inner = store_with(vec![point("a", BUCARAMANGA)]);
        let store = FailingStore {
            inner,
            fail_at_or_below: 4,
        };

        // The first levels succeed and find "a", but more results are wanted,
        // so the walk reaches a failing level.
        let err = nearest(&store, &BUCARAMANGA, 1000.0, Some(2), RESOLUTION).unwrap_err();
        assert!(matches!(err, GeocellError::Store(_)));

        // Satisfied before reaching the failing levels.
        let results = nearest(&store, &BUCARAMANGA, 1000.0, Some(1), RESOLUTION).unwrap();
        assert_eq!(keys(&results), vec!["a"]);
    }

    #[test]
    fn test_invalid_inputs() {
        let store = MemoryPointStore::new();
        assert!(matches!(
            nearest(&store, &BUCARAMANGA, 10.0, Some(1), 99),
            Err(GeocellError::InvalidResolution { .. })
        ));
        assert!(matches!(
            nearest(&store, &Coordinate::new(f64::NAN, 0.0), 10.0, Some(1), RESOLUTION),
            Err(GeocellError::InvalidInput(_))
        ));
        assert!(matches!(
            nearest(&store, &BUCARAMANGA, -5.0, Some(1), RESOLUTION),
            Err(GeocellError::InvalidInput(_))
        ));
        assert_eq!(store.stats().unwrap().lookups, 0);
    }

    #[test]
    fn test_resolution_zero_scans_everything() {
        let store = store_with(vec![
            point("a", BUCARAMANGA),
            point("zurich", Coordinate::new(47.3667, 8.55)),
        ]);
        let results = nearest(&store, &BUCARAMANGA, 1e8, Some(10), 0).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(store.stats().unwrap().lookups, 1);
    }

    #[test]
    fn test_covering_circle_reaches_every_corner() {
        let bbox = BoundingBox::new(Coordinate::new(40.0, -75.0), Coordinate::new(41.0, -73.0));
        let (center, radius) = covering_circle(&bbox);
        for corner in [bbox.southwest, bbox.northeast, bbox.northwest(), bbox.southeast()] {
            assert!(distance(&center, &corner) < radius);
        }
    }

    #[test]
    fn test_query_box() {
        let sw = Coordinate::new(7.10, -73.05);
        let ne = Coordinate::new(7.15, -72.95);
        let store = store_with(vec![
            point("inside", BUCARAMANGA),
            point("corner", ne),
            // Outside the box but inside its covering circle.
            point("outside", Coordinate::new(7.16, -73.0)),
            point("zurich", Coordinate::new(47.3667, 8.55)),
        ]);

        let approx = query_box(&store, &sw, &ne, Some(10), RESOLUTION).unwrap();
        let mut approx_keys = keys(&approx);
        approx_keys.sort_unstable();
        assert_eq!(approx_keys, vec!["corner", "inside", "outside"]);

        let exact = query_box_exact(&store, &sw, &ne, Some(10), RESOLUTION).unwrap();
        let mut exact_keys = keys(&exact);
        exact_keys.sort_unstable();
        assert_eq!(exact_keys, vec!["corner", "inside"]);
    }

    #[test]
    fn test_degenerate_box_finds_the_point_on_it() {
        let store = store_with(vec![point("here", BUCARAMANGA)]);
        let results = query_box(&store, &BUCARAMANGA, &BUCARAMANGA, Some(5), RESOLUTION).unwrap();
        assert_eq!(keys(&results), vec!["here"]);
    }

    #[test]
    fn test_inverted_box_rejected() {
        let store = MemoryPointStore::new();
        let err = query_box(
            &store,
            &Coordinate::new(8.0, -73.0),
            &Coordinate::new(7.0, -72.0),
            None,
            RESOLUTION,
        )
        .unwrap_err();
        assert!(matches!(err, GeocellError::InvalidInput(_)));
    }
}
