// Route exports
pub mod ambulances;
pub mod hospitals;
pub mod incidents;
pub mod patients;

use actix_web::{web, HttpResponse, Responder};
use crate::core::{Allocator, Matcher};
use crate::models::HealthResponse;
use crate::services::DocumentStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub matcher: Matcher,
    pub allocator: Allocator,
    pub hospital_limit: usize,
    pub recent_limit: usize,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .service(web::scope("/hospitals").configure(hospitals::configure))
            .service(web::scope("/ambulances").configure(ambulances::configure))
            .service(web::scope("/incidents").configure(incidents::configure))
            .service(web::scope("/patients").configure(patients::configure)),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let model_ready = state.allocator.model_ready();
    let status = if model_ready { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_ready,
        timestamp: chrono::Utc::now(),
    })
}
