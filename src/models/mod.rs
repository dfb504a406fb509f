// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Ambulance, AllocationRequest, Candidate, Coordinate, CoordinateError, Hospital, Incident,
    RankedResult, Vitals, VitalsRecord,
};
pub use requests::{
    AllocateRequest, LocationBody, NearestAmbulanceRequest, NearestHospitalsRequest,
    RecordVitalsRequest, ReportIncidentRequest,
};
pub use responses::{ErrorResponse, HealthResponse, NearestMeta, ReportIncidentResponse, UnavailableResponse};
