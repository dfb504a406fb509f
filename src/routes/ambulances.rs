use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::core::{distance_km, round_km};
use crate::error::DispatchError;
use crate::models::{
    AllocateRequest, AllocationRequest, Candidate, Coordinate, NearestAmbulanceRequest,
    UnavailableResponse,
};
use crate::routes::AppState;

/// Only units in this state are offered for dispatch
const AVAILABLE: &str = "available";

/// Alternatives listed after the chosen unit in allocation responses
const MAX_ALTERNATIVES: usize = 5;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/nearest", web::post().to(nearest_ambulance))
        .route("/allocate", web::post().to(allocate_ambulance))
        .route("/track/{unit_id}", web::get().to(track_ambulance));
}

/// Nearest available ambulance endpoint
///
/// POST /api/ambulances/nearest
///
/// Request body:
/// ```json
/// { "latitude": 12.97, "longitude": 77.59 }
/// ```
async fn nearest_ambulance(
    state: web::Data<AppState>,
    req: web::Json<NearestAmbulanceRequest>,
) -> Result<HttpResponse, DispatchError> {
    let requester = req.location.coordinate()?;

    let units = state.store.ambulances_with_status(AVAILABLE).await?;
    if units.is_empty() {
        return Ok(HttpResponse::Ok().json(UnavailableResponse::new("No available ambulances")));
    }

    let result = state.matcher.nearest(requester, units, 1);
    let Some(nearest) = result.results.into_iter().next() else {
        tracing::warn!(
            "{} available ambulances, none with usable coordinates",
            result.skipped_no_coords
        );
        return Ok(HttpResponse::Ok().json(UnavailableResponse::new(
            "No available ambulances with coordinates",
        )));
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "ambulance": {
            "unit_id": nearest.candidate.unit_id,
            "latitude": nearest.candidate.latitude,
            "longitude": nearest.candidate.longitude,
            "distance": nearest.distance,
        },
    })))
}

/// Allocate an ambulance to an incident
///
/// POST /api/ambulances/allocate
///
/// Request body:
/// ```json
/// { "latitude": 12.97, "longitude": 77.59, "hospital_id": "optional" }
/// ```
///
/// The destination is the named hospital, or the hospital nearest the
/// incident when none is given.
async fn allocate_ambulance(
    state: web::Data<AppState>,
    req: web::Json<AllocateRequest>,
) -> Result<HttpResponse, DispatchError> {
    req.validate()?;
    let incident = req.location.coordinate()?;

    let destination = match &req.hospital_id {
        Some(id) => {
            let hospital = state
                .store
                .find_hospital(id)
                .await?
                .ok_or_else(|| DispatchError::NotFound(format!("Hospital {} not found", id)))?;
            let position = hospital.position().ok_or_else(|| {
                DispatchError::Validation(format!("Hospital {} has no usable coordinates", id))
            })?;
            Some((hospital, position))
        }
        None => {
            let hospitals = state.store.hospitals().await?;
            state
                .matcher
                .nearest(incident, hospitals, 1)
                .results
                .into_iter()
                .next()
                .and_then(|ranked| ranked.candidate.position().map(|p| (ranked.candidate, p)))
        }
    };

    let mut request = AllocationRequest::new(incident);
    if let Some((_, position)) = &destination {
        request = request.with_destination(*position);
    }

    let units = state.store.ambulances_with_status(AVAILABLE).await?;
    if units.is_empty() {
        return Ok(HttpResponse::Ok().json(UnavailableResponse::new("No available ambulances")));
    }

    let allocation = state.allocator.allocate(&request, &units);
    let Some(selected) = allocation.selected else {
        return Ok(HttpResponse::Ok().json(UnavailableResponse::new(
            "No available ambulances with coordinates",
        )));
    };

    let unit = &units[selected];
    let score = allocation
        .scores
        .as_ref()
        .and_then(|scores| scores[selected]);
    let scores = allocation.scores.as_ref().map(|scores| {
        units
            .iter()
            .zip(scores)
            .map(|(u, s)| json!({ "unit_id": u.unit_id, "score": s }))
            .collect::<Vec<_>>()
    });

    let hospital = destination
        .as_ref()
        .map(|(hospital, position)| hospital_summary(&hospital.id, hospital.name.as_deref(), incident, *position));

    let mut ranking = state.allocator.rank(&request, &units);
    ranking.truncate(MAX_ALTERNATIVES + 1);

    tracing::info!(
        "Allocated {} to incident at ({:.4}, {:.4}) via {:?} policy ({} units, {} without coordinates)",
        unit.unit_id,
        incident.latitude(),
        incident.longitude(),
        allocation.policy,
        units.len(),
        allocation.skipped_no_coords
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "policy": allocation.policy,
        "ambulance": {
            "unit_id": unit.unit_id,
            "latitude": unit.latitude,
            "longitude": unit.longitude,
            "status": unit.status,
            "distance": round_km(distance_km(Some(incident), unit.position())),
            "score": score,
        },
        "hospital": hospital,
        "scores": scores,
        "ranking": ranking,
        "skipped_no_coords": allocation.skipped_no_coords,
    })))
}

fn hospital_summary(id: &str, name: Option<&str>, incident: Coordinate, position: Coordinate) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "latitude": position.latitude(),
        "longitude": position.longitude(),
        "distance": round_km(distance_km(Some(incident), Some(position))),
    })
}

/// Last known position of an ambulance
///
/// GET /api/ambulances/track/{unit_id}
async fn track_ambulance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, DispatchError> {
    let unit_id = path.into_inner();
    let unit = state
        .store
        .find_ambulance(&unit_id)
        .await?
        .ok_or_else(|| DispatchError::NotFound("Not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "ambulance": {
            "unit_id": unit.unit_id,
            "latitude": unit.latitude,
            "longitude": unit.longitude,
            "status": unit.status,
            "last_location_update": unit.last_location_update,
        },
    })))
}
