//! Dispatch Algo - nearest-resource matching for an emergency-response backend
//!
//! This library ranks hospitals and ambulances by great-circle distance from a
//! requester and allocates ambulances to incidents, either with a learned
//! scoring model or, when none is loaded, by exact nearest-unit fallback.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Allocator, Matcher, ModelState, Scorer, distance::{distance_km, haversine_distance}};
pub use models::{AllocationRequest, Ambulance, Candidate, Coordinate, Hospital, RankedResult};
