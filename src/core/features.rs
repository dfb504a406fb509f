use crate::core::distance::distance_km;
use crate::models::{AllocationRequest, Ambulance, Candidate};

/// Number of inputs the scoring model expects
pub const FEATURE_DIM: usize = 5;

/// Distances are divided by this before being fed to the model
const DISTANCE_SCALE_KM: f64 = 20.0;

const DEFAULT_FUEL_LEVEL: f64 = 80.0;
const DEFAULT_LOCATION_ACCURACY: f64 = 25.0;
const DEFAULT_STATUS: &str = "available";

/// Operational state of a mobile unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Available,
    Dispatched,
    EnRoute,
    OnScene,
    Transporting,
    AtHospital,
    Maintenance,
    Unknown,
}

impl UnitStatus {
    /// Tags match exactly, as the store filters on them
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "available" => UnitStatus::Available,
            "dispatched" => UnitStatus::Dispatched,
            "en_route" => UnitStatus::EnRoute,
            "on_scene" => UnitStatus::OnScene,
            "transporting" => UnitStatus::Transporting,
            "at_hospital" => UnitStatus::AtHospital,
            "maintenance" => UnitStatus::Maintenance,
            _ => UnitStatus::Unknown,
        }
    }

    /// Readiness weight in [0, 1]
    pub fn weight(self) -> f64 {
        match self {
            UnitStatus::Available => 1.0,
            UnitStatus::Dispatched => 0.6,
            UnitStatus::EnRoute => 0.4,
            UnitStatus::OnScene => 0.5,
            UnitStatus::Transporting => 0.2,
            UnitStatus::AtHospital => 0.7,
            UnitStatus::Maintenance => 0.1,
            UnitStatus::Unknown => 0.5,
        }
    }
}

/// Fixed-width model input for one unit
///
/// Layout: `[incident_km / 20, destination_km / 20, fuel, accuracy, status]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_DIM]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Build the feature vector for `unit` in the context of `request`.
///
/// Missing fuel and accuracy readings fall back to 80 and 25. With no
/// destination the second feature is zero. Callers exclude units without a
/// position before extraction.
pub fn extract_features(request: &AllocationRequest, unit: &Ambulance) -> FeatureVector {
    let position = unit.position();

    let incident_km = distance_km(Some(request.incident), position);
    let destination_km = match request.destination {
        Some(destination) => distance_km(position, Some(destination)),
        None => 0.0,
    };

    let fuel = reading_or(unit.fuel_level, DEFAULT_FUEL_LEVEL);
    let accuracy = reading_or(unit.location_accuracy, DEFAULT_LOCATION_ACCURACY);
    let status = UnitStatus::from_tag(unit.status.as_deref().unwrap_or(DEFAULT_STATUS));

    FeatureVector([
        incident_km / DISTANCE_SCALE_KM,
        destination_km / DISTANCE_SCALE_KM,
        fuel / 100.0,
        accuracy / 100.0,
        status.weight(),
    ])
}

// Percent-style reading clamped into [0, 100]
fn reading_or(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|v| v.is_finite())
        .unwrap_or(default)
        .clamp(0.0, 100.0)
}
