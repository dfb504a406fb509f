use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::error::DispatchError;
use crate::models::{RecordVitalsRequest, VitalsRecord};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/vitals", web::post().to(record_vitals))
        .route("/recent", web::get().to(recent_vitals));
}

/// Record patient vitals
///
/// POST /api/patients/vitals
///
/// Request body:
/// ```json
/// {
///   "patient_id": "P-102",
///   "hospital_name": "City General",
///   "incident_id": "optional",
///   "vitals": { "heart_rate": 96, "oxygen_saturation": 94 }
/// }
/// ```
async fn record_vitals(
    state: web::Data<AppState>,
    req: web::Json<RecordVitalsRequest>,
) -> Result<HttpResponse, DispatchError> {
    if req.patient_id.is_empty() || req.hospital_name.is_empty() || req.vitals.is_empty() {
        return Err(DispatchError::Validation(
            "patient_id, hospital_name, vitals required".to_string(),
        ));
    }
    req.validate()?;
    let req = req.into_inner();

    let record = VitalsRecord {
        id: uuid::Uuid::new_v4().to_string(),
        patient_id: req.patient_id,
        hospital_name: req.hospital_name,
        incident_id: req.incident_id,
        vitals: req.vitals,
        created_at: chrono::Utc::now(),
    };

    tracing::debug!("Recording vitals for patient {}", record.patient_id);
    let id = state.store.insert_vitals(record).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "id": id,
    })))
}

/// Most recent vitals records, newest first
///
/// GET /api/patients/recent
async fn recent_vitals(state: web::Data<AppState>) -> Result<HttpResponse, DispatchError> {
    let records = state.store.recent_vitals(state.recent_limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "records": records,
    })))
}
