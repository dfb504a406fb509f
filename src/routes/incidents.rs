use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::error::DispatchError;
use crate::models::{Incident, ReportIncidentRequest, ReportIncidentResponse};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/report", web::post().to(report_incident))
        .route("/recent", web::get().to(recent_incidents));
}

/// Report an incident
///
/// POST /api/incidents/report
///
/// Request body:
/// ```json
/// { "latitude": 12.97, "longitude": 77.59, "type": "accident", "severity": "high", "description": "" }
/// ```
async fn report_incident(
    state: web::Data<AppState>,
    req: web::Json<ReportIncidentRequest>,
) -> Result<HttpResponse, DispatchError> {
    req.validate()
        .map_err(|_| DispatchError::Validation("latitude, longitude, type, severity required".to_string()))?;
    let location = req.location.coordinate()?;
    let req = req.into_inner();

    let incident = Incident {
        id: uuid::Uuid::new_v4().to_string(),
        latitude: location.latitude(),
        longitude: location.longitude(),
        incident_type: req.incident_type,
        severity: req.severity,
        description: req.description,
        status: "detected".to_string(),
        created_at: chrono::Utc::now(),
    };

    tracing::info!(
        "Incident reported: {} ({}, severity {})",
        incident.id,
        incident.incident_type,
        incident.severity
    );

    let incident_id = state.store.insert_incident(incident).await?;

    Ok(HttpResponse::Ok().json(ReportIncidentResponse {
        success: true,
        incident_id,
    }))
}

/// Most recent incidents, newest first
///
/// GET /api/incidents/recent
async fn recent_incidents(state: web::Data<AppState>) -> Result<HttpResponse, DispatchError> {
    let incidents: Vec<_> = state
        .store
        .recent_incidents(state.recent_limit)
        .await?
        .into_iter()
        .map(|i| {
            json!({
                "id": i.id,
                "type": i.incident_type,
                "severity": i.severity,
                "status": i.status,
                "description": i.description,
                "created_at": i.created_at,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "incidents": incidents,
    })))
}
