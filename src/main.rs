use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dispatch_algo::config::{LoggingSettings, Settings};
use dispatch_algo::core::{Allocator, Matcher, ModelState};
use dispatch_algo::error::handle_json_payload_error;
use dispatch_algo::routes::{self, AppState};
use dispatch_algo::services::{DocumentStore, InMemoryStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration; logging settings come from it when it parses
    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    info!("Starting dispatch matching service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    // Initialize document store
    let store: Arc<dyn DocumentStore> = match &settings.data.seed_path {
        Some(path) => match InMemoryStore::from_seed_file(path) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                error!("Failed to seed store from {}: {}", path.display(), e);
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
            }
        },
        None => {
            warn!("No seed data configured, starting with empty collections");
            Arc::new(InMemoryStore::empty())
        }
    };

    // Attempt the one-time model load; failure means nearest-unit fallback
    let model = ModelState::load(settings.model.weights_path.as_deref());
    let allocator = Allocator::new(model);

    info!("Allocator initialized with {:?} policy", allocator.policy());

    let app_state = AppState {
        store,
        matcher: Matcher::new(settings.matching.max_results),
        allocator,
        hospital_limit: settings.matching.hospital_limit,
        recent_limit: settings.matching.recent_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

/// LOG_LEVEL and LOG_FORMAT override the configured values
fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}
