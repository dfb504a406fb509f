use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{lenient_f64, Coordinate, CoordinateError, Vitals};

/// Requester location shared by the nearest/allocate endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationBody {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

impl LocationBody {
    pub fn coordinate(&self) -> Result<Coordinate, CoordinateError> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

/// Request for the nearest hospitals
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearestHospitalsRequest {
    #[serde(flatten)]
    pub location: LocationBody,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

/// Request for the nearest available ambulance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestAmbulanceRequest {
    #[serde(flatten)]
    pub location: LocationBody,
}

/// Request to allocate an ambulance to an incident
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AllocateRequest {
    #[serde(flatten)]
    pub location: LocationBody,
    #[validate(length(min = 1))]
    pub hospital_id: Option<String>,
}

/// Request to report an incident
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportIncidentRequest {
    #[serde(flatten)]
    pub location: LocationBody,
    #[validate(length(min = 1))]
    #[serde(rename = "type", default)]
    pub incident_type: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub description: String,
}

/// Request to record patient vitals
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordVitalsRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub patient_id: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub hospital_name: String,
    #[serde(default)]
    pub incident_id: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub vitals: Vitals,
}
