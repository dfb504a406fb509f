use crate::core::distance::{distance_km, round_km};
use crate::models::{Candidate, Coordinate, RankedResult};

/// Upper bound on how many results a single nearest query may return
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Result of a nearest-candidate query
#[derive(Debug)]
pub struct NearestResult<T> {
    pub results: Vec<RankedResult<T>>,
    pub total_candidates: usize,
    pub skipped_no_coords: usize,
}

impl<T> NearestResult<T> {
    /// No candidates were supplied at all
    pub fn is_empty_pool(&self) -> bool {
        self.total_candidates == 0
    }

    /// Candidates were supplied but none had usable coordinates
    pub fn all_skipped(&self) -> bool {
        self.total_candidates > 0 && self.skipped_no_coords == self.total_candidates
    }
}

/// Distance-based resource matcher
///
/// Ranks hospitals or ambulances by great-circle distance from a requester.
/// Candidates without a usable position are counted and excluded rather than
/// scored as arbitrarily near or far.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    max_results: usize,
}

impl Matcher {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results: max_results.max(1),
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Find the `k` candidates nearest to `requester`
    ///
    /// # Arguments
    /// * `requester` - Validated requester location
    /// * `candidates` - Candidate pool as supplied by the data store
    /// * `k` - Maximum number of results, capped at `max_results`
    ///
    /// # Returns
    /// Results in non-decreasing distance order; equal distances keep input order
    pub fn nearest<T: Candidate>(
        &self,
        requester: Coordinate,
        candidates: Vec<T>,
        k: usize,
    ) -> NearestResult<T> {
        let total_candidates = candidates.len();
        let limit = k.min(self.max_results);

        let order = distance_order(requester, &candidates);
        let skipped_no_coords = total_candidates - order.len();

        let mut slots: Vec<Option<T>> = candidates.into_iter().map(Some).collect();
        let results: Vec<RankedResult<T>> = order
            .into_iter()
            .take(limit)
            .filter_map(|(index, distance)| {
                slots[index].take().map(|candidate| RankedResult {
                    candidate,
                    distance: round_km(distance),
                    score: None,
                })
            })
            .collect();

        tracing::debug!(
            "Ranked {} of {} candidates ({} skipped for missing coordinates)",
            results.len(),
            total_candidates,
            skipped_no_coords
        );

        NearestResult {
            results,
            total_candidates,
            skipped_no_coords,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

/// Indices of positioned candidates with their raw distance from `origin`,
/// sorted ascending by distance.
///
/// The sort is stable, so equal distances keep input order. Both the nearest
/// query and the allocation fallback rank through here.
pub(crate) fn distance_order<T: Candidate>(origin: Coordinate, candidates: &[T]) -> Vec<(usize, f64)> {
    let mut order: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            candidate
                .position()
                .map(|position| (index, distance_km(Some(origin), Some(position))))
        })
        .collect();

    order.sort_by(|a, b| a.1.total_cmp(&b.1));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Hospital;

    fn create_hospital(id: &str, lat: Option<f64>, lon: Option<f64>) -> Hospital {
        Hospital {
            id: id.to_string(),
            name: Some(format!("Hospital {}", id)),
            address: None,
            latitude: lat,
            longitude: lon,
            specialties: vec![],
        }
    }

    fn requester(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_stable_ranking_for_identical_positions() {
        let matcher = Matcher::default();
        let candidates = vec![
            create_hospital("H1", Some(38.0), Some(-122.0)),
            create_hospital("H2", Some(38.0), Some(-122.0)),
        ];

        let result = matcher.nearest(requester(38.0, -122.0), candidates, 5);

        let ids: Vec<&str> = result.results.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["H1", "H2"]);
        assert!(result.results.iter().all(|r| r.distance == 0.0));
    }

    #[test]
    fn test_skipped_coordinate_accounting() {
        let matcher = Matcher::default();
        let candidates = vec![
            create_hospital("A", Some(37.0), Some(-122.0)),
            create_hospital("B", None, Some(-122.0)),
        ];

        let result = matcher.nearest(requester(37.0, -122.0), candidates, 5);

        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].candidate.id, "A");
        assert_eq!(result.results[0].distance, 0.0);
        assert_eq!(result.skipped_no_coords, 1);
        assert!(!result.all_skipped());
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::default();
        let candidates: Vec<Hospital> = (0..10)
            .map(|i| create_hospital(&i.to_string(), Some(12.9 + (9 - i) as f64 * 0.01), Some(77.6)))
            .collect();

        let result = matcher.nearest(requester(12.9, 77.6), candidates, 5);

        assert_eq!(result.results.len(), 5);
        assert_eq!(result.results[0].candidate.id, "9");
        for pair in result.results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_limit_capped_by_max_results() {
        let matcher = Matcher::new(3);
        let candidates: Vec<Hospital> = (0..10)
            .map(|i| create_hospital(&i.to_string(), Some(10.0), Some(10.0 + i as f64 * 0.01)))
            .collect();

        let result = matcher.nearest(requester(10.0, 10.0), candidates, 100);
        assert_eq!(result.results.len(), 3);
    }

    #[test]
    fn test_empty_pool_vs_all_skipped() {
        let matcher = Matcher::default();

        let empty = matcher.nearest::<Hospital>(requester(0.0, 0.0), vec![], 5);
        assert!(empty.results.is_empty());
        assert!(empty.is_empty_pool());
        assert!(!empty.all_skipped());

        let unpositioned = matcher.nearest(
            requester(0.0, 0.0),
            vec![create_hospital("X", None, None), create_hospital("Y", Some(95.0), Some(0.0))],
            5,
        );
        assert!(unpositioned.results.is_empty());
        assert!(!unpositioned.is_empty_pool());
        assert!(unpositioned.all_skipped());
        assert_eq!(unpositioned.skipped_no_coords, 2);
    }
}
