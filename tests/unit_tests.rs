// Unit tests for Dispatch Algo

use dispatch_algo::core::{
    distance::{distance_km, haversine_distance, round_km, UNREACHABLE_KM},
    features::{extract_features, FeatureVector, UnitStatus},
    scoring::{ModelState, QNetwork, Scorer},
    Allocator, Matcher, Policy,
};
use dispatch_algo::models::{AllocationRequest, Ambulance, Coordinate, Hospital};
use geo::{point, HaversineDistance};
use std::sync::{Arc, Mutex};

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

fn create_unit(id: &str, lat: f64, lon: f64) -> Ambulance {
    Ambulance {
        unit_id: id.to_string(),
        latitude: Some(lat),
        longitude: Some(lon),
        status: Some("available".to_string()),
        fuel_level: None,
        location_accuracy: None,
        last_location_update: None,
    }
}

/// Records every feature vector it is asked to score
#[derive(Default)]
struct EchoScorer {
    seen: Arc<Mutex<Vec<FeatureVector>>>,
}

impl Scorer for EchoScorer {
    fn score(&self, features: &FeatureVector) -> f64 {
        self.seen.lock().unwrap().push(*features);
        features.0[2]
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(12.9716, 77.5946, 12.9716, 77.5946);
    assert_eq!(distance, 0.0);
}

#[test]
fn test_bangalore_known_distance() {
    let distance = distance_km(Some(coord(12.9716, 77.5946)), Some(coord(12.9352, 77.6245)));
    assert!((distance - 5.18).abs() < 0.01, "Expected ~5.18km, got {}", distance);
    assert_eq!(round_km(distance), 5.18);
}

#[test]
fn test_matches_geo_reference() {
    // geo uses the IUGG mean radius (6371.0088 km), so allow a small relative error
    let pairs = [
        ((12.9716, 77.5946), (12.9352, 77.6245)),
        ((51.5074, -0.1278), (48.8566, 2.3522)),
        ((40.7128, -74.0060), (34.0522, -118.2437)),
        ((-33.8688, 151.2093), (35.6762, 139.6503)),
    ];

    for ((lat1, lon1), (lat2, lon2)) in pairs {
        let ours = haversine_distance(lat1, lon1, lat2, lon2);
        let reference = point!(x: lon1, y: lat1).haversine_distance(&point!(x: lon2, y: lat2)) / 1000.0;
        assert!(
            ((ours - reference) / reference).abs() < 1e-5,
            "ours={} reference={}",
            ours,
            reference
        );
    }
}

#[test]
fn test_symmetry_across_hemispheres() {
    let points = [
        coord(0.0, 0.0),
        coord(89.9, 179.9),
        coord(-45.0, -120.0),
        coord(12.9716, 77.5946),
        coord(-0.0001, 180.0),
    ];

    for a in points {
        for b in points {
            let ab = distance_km(Some(a), Some(b));
            let ba = distance_km(Some(b), Some(a));
            assert!(ab >= 0.0);
            assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0));
        }
    }
}

#[test]
fn test_triangle_inequality() {
    let a = coord(12.9716, 77.5946);
    let b = coord(13.0827, 80.2707);
    let c = coord(19.0760, 72.8777);

    let ab = distance_km(Some(a), Some(b));
    let bc = distance_km(Some(b), Some(c));
    let ac = distance_km(Some(a), Some(c));
    assert!(ac <= ab + bc + 1e-9);
}

#[test]
fn test_sentinel_on_missing_coordinate() {
    assert_eq!(distance_km(Some(coord(1.0, 2.0)), None), UNREACHABLE_KM);
    assert_eq!(UNREACHABLE_KM, 1e9);
}

#[test]
fn test_unknown_status_defaults() {
    assert_eq!(UnitStatus::from_tag("decommissioned").weight(), 0.5);
    assert_eq!(UnitStatus::from_tag("AVAILABLE"), UnitStatus::Unknown);
    assert_eq!(UnitStatus::from_tag("AVAILABLE").weight(), 0.5);
}

#[test]
fn test_missing_fuel_scored_as_eighty() {
    let scorer = EchoScorer::default();
    let seen = Arc::clone(&scorer.seen);
    let allocator = Allocator::new(ModelState::ready(scorer));

    let mut fuelled = create_unit("fuelled", 12.95, 77.60);
    fuelled.fuel_level = Some(80.0);
    let unknown = create_unit("unknown", 12.95, 77.60);

    let request = AllocationRequest::new(coord(12.9716, 77.5946));
    let allocation = allocator.allocate(&request, &[fuelled, unknown]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[1].0[2], 0.8);
    assert_eq!(seen[1].0[3], 0.25);

    // Identical vectors tie; the first unit wins
    assert_eq!(allocation.selected, Some(0));
}

#[test]
fn test_fallback_equivalent_to_nearest() {
    let matcher = Matcher::default();
    let allocator = Allocator::new(ModelState::unavailable("no weights"));
    let incident = coord(12.9716, 77.5946);

    let mut units: Vec<Ambulance> = (0..12)
        .map(|i| {
            let offset = ((i * 7) % 12) as f64 * 0.004;
            create_unit(&format!("AMB-{}", i), 12.94 + offset, 77.58 + offset / 2.0)
        })
        .collect();
    units[3].latitude = None;
    units.push(create_unit("dup", units[5].latitude.unwrap(), units[5].longitude.unwrap()));

    let allocation = allocator.allocate(&AllocationRequest::new(incident), &units);
    let nearest = matcher.nearest(incident, units.clone(), 1);

    assert_eq!(allocation.policy, Policy::Nearest);
    assert_eq!(allocation.scores, None);
    let selected = allocation.selected.unwrap();
    assert_eq!(units[selected].unit_id, nearest.results[0].candidate.unit_id);
    assert_eq!(allocation.skipped_no_coords, nearest.skipped_no_coords);
}

#[test]
fn test_fallback_ignores_unit_attributes() {
    let allocator = Allocator::new(ModelState::unavailable("no weights"));

    let mut near = create_unit("near", 12.972, 77.595);
    near.fuel_level = Some(5.0);
    near.status = Some("maintenance".to_string());
    let mut far = create_unit("far", 13.1, 77.7);
    far.fuel_level = Some(100.0);

    let request = AllocationRequest::new(coord(12.9716, 77.5946)).with_destination(coord(13.1, 77.7));
    let allocation = allocator.allocate(&request, &[far, near]);
    assert_eq!(allocation.selected, Some(1));
}

#[test]
fn test_learned_policy_with_network() {
    // Prefers units close to the incident and penalises low fuel
    let network = QNetwork::from_json(
        r#"{ "layers": [ { "weights": [[-1.2, -0.8, 0.7, -0.4, 0.3]], "bias": [0.0] } ] }"#,
    )
    .unwrap();
    let allocator = Allocator::new(ModelState::ready(network));
    assert_eq!(allocator.policy(), Policy::Learned);

    let mut near_empty = create_unit("near-empty", 12.972, 77.595);
    near_empty.fuel_level = Some(2.0);
    let mut close_full = create_unit("close-full", 12.975, 77.599);
    close_full.fuel_level = Some(100.0);

    let request = AllocationRequest::new(coord(12.9716, 77.5946));
    let units = [near_empty, close_full];
    let allocation = allocator.allocate(&request, &units);

    assert_eq!(allocation.selected, Some(1));
    let ranking = allocator.rank(&request, &units);
    assert_eq!(ranking[0].candidate.unit_id, "close-full");
    assert!(ranking[0].score.unwrap() >= ranking[1].score.unwrap());
}

#[test]
fn test_hospital_without_coordinates_not_ranked() {
    let matcher = Matcher::default();
    let hospitals = vec![
        Hospital {
            id: "A".to_string(),
            name: None,
            address: None,
            latitude: Some(37.0),
            longitude: Some(-122.0),
            specialties: vec![],
        },
        Hospital {
            id: "B".to_string(),
            name: None,
            address: None,
            latitude: None,
            longitude: None,
            specialties: vec![],
        },
    ];

    let result = matcher.nearest(coord(37.0, -122.0), hospitals, 5);
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].candidate.id, "A");
    assert_eq!(result.results[0].distance, 0.0);
    assert_eq!(result.skipped_no_coords, 1);
}

#[test]
fn test_extract_features_layout() {
    let request = AllocationRequest::new(coord(12.9716, 77.5946)).with_destination(coord(12.9352, 77.6245));
    let mut unit = create_unit("AMB-1", 12.9716, 77.5946);
    unit.status = Some("at_hospital".to_string());
    unit.location_accuracy = Some(50.0);

    let features = extract_features(&request, &unit);
    assert_eq!(features.0[0], 0.0);
    assert!((features.0[1] * 20.0 - 5.18).abs() < 0.01);
    assert_eq!(features.0[3], 0.5);
    assert_eq!(features.0[4], 0.7);
}
