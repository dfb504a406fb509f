use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::error::DispatchError;
use crate::models::{NearestHospitalsRequest, NearestMeta, UnavailableResponse};
use crate::routes::AppState;

/// Specialties listed per hospital in responses
const MAX_SPECIALTIES: usize = 5;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/nearest", web::post().to(nearest_hospitals))
        .route("/all", web::get().to(all_hospitals));
}

/// Nearest hospitals endpoint
///
/// POST /api/hospitals/nearest
///
/// Request body:
/// ```json
/// { "latitude": 12.97, "longitude": 77.59, "limit": 5 }
/// ```
async fn nearest_hospitals(
    state: web::Data<AppState>,
    req: web::Json<NearestHospitalsRequest>,
) -> Result<HttpResponse, DispatchError> {
    req.validate()?;
    let requester = req.location.coordinate()?;
    let limit = req.limit.unwrap_or(state.hospital_limit);

    let total = state.store.count_hospitals().await?;
    if total == 0 {
        return Ok(HttpResponse::Ok().json(UnavailableResponse::new("hospital collection is empty")));
    }

    let hospitals = state.store.hospitals().await?;
    let mut result = state.matcher.nearest(requester, hospitals, limit);
    for ranked in &mut result.results {
        ranked.candidate.specialties.truncate(MAX_SPECIALTIES);
    }

    tracing::info!(
        "Nearest hospitals for ({:.4}, {:.4}): returning {} of {} ({} without coordinates)",
        requester.latitude(),
        requester.longitude(),
        result.results.len(),
        total,
        result.skipped_no_coords
    );

    let meta = NearestMeta {
        total_in_db: total,
        skipped_no_coords: result.skipped_no_coords,
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "hospitals": result.results,
        "meta": meta,
    })))
}

/// List every hospital without coordinates
///
/// GET /api/hospitals/all
async fn all_hospitals(state: web::Data<AppState>) -> Result<HttpResponse, DispatchError> {
    let hospitals: Vec<_> = state
        .store
        .hospitals()
        .await?
        .into_iter()
        .map(|h| {
            json!({
                "id": h.id,
                "name": h.name,
                "address": h.address,
                "specialties": h.specialties.into_iter().take(MAX_SPECIALTIES).collect::<Vec<_>>(),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "hospitals": hospitals,
    })))
}
