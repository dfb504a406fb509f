use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors produced when building a [`Coordinate`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude/longitude required (numeric)")]
    Missing,

    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated latitude/longitude pair in degrees
///
/// Only constructible through [`Coordinate::new`] or [`Coordinate::from_parts`],
/// so every value in circulation is finite and within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::Missing);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Build from optional parts as decoded from a document or request body
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Result<Self, CoordinateError> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => Err(CoordinateError::Missing),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Anything that can be ranked by distance from a requester
pub trait Candidate {
    fn id(&self) -> &str;

    /// `None` when the stored position is missing or unusable
    fn position(&self) -> Option<Coordinate>;
}

/// Hospital document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub specialties: Vec<String>,
}

impl Candidate for Hospital {
    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude).ok()
    }
}

/// Ambulance document as kept up to date by the tracking feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ambulance {
    pub unit_id: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    /// Untagged units are never offered for dispatch
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fuel_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub location_accuracy: Option<f64>,
    #[serde(default)]
    pub last_location_update: Option<chrono::DateTime<chrono::Utc>>,
}

impl Candidate for Ambulance {
    fn id(&self) -> &str {
        &self.unit_id
    }

    fn position(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude).ok()
    }
}

/// A candidate annotated with its distance (km, 2 dp) and, under the
/// learned policy, its score
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult<T> {
    #[serde(flatten)]
    pub candidate: T,
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Allocation context for the learned policy
#[derive(Debug, Clone, Copy)]
pub struct AllocationRequest {
    pub incident: Coordinate,
    pub destination: Option<Coordinate>,
}

impl AllocationRequest {
    pub fn new(incident: Coordinate) -> Self {
        Self {
            incident,
            destination: None,
        }
    }

    pub fn with_destination(mut self, destination: Coordinate) -> Self {
        self.destination = Some(destination);
        self
    }
}

/// Reported incident
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub incident_type: String,
    pub severity: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Patient vital signs; every reading is optional but at least one must be present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, validator::Validate)]
pub struct Vitals {
    #[validate(range(min = 0.0, max = 300.0))]
    pub heart_rate: Option<f64>,
    #[validate(range(min = 0.0, max = 300.0))]
    pub blood_pressure_systolic: Option<f64>,
    #[validate(range(min = 0.0, max = 200.0))]
    pub blood_pressure_diastolic: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub oxygen_saturation: Option<f64>,
    #[validate(range(min = 20.0, max = 45.0))]
    pub temperature: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub respiratory_rate: Option<f64>,
}

impl Vitals {
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none()
            && self.blood_pressure_systolic.is_none()
            && self.blood_pressure_diastolic.is_none()
            && self.oxygen_saturation.is_none()
            && self.temperature.is_none()
            && self.respiratory_rate.is_none()
    }
}

/// Stored vitals record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsRecord {
    pub id: String,
    pub patient_id: String,
    pub hospital_name: String,
    pub incident_id: Option<String>,
    pub vitals: Vitals,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Decode a number that may arrive as a JSON number or a numeric string.
///
/// Null, booleans, unparsable text and non-finite values all decode to `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(numeric_value))
}

/// Parse a JSON value as a finite `f64`
pub fn numeric_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

// Stores sometimes hold `null` instead of an empty list
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
