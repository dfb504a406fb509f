// Core algorithm exports
pub mod allocator;
pub mod distance;
pub mod features;
pub mod matcher;
pub mod scoring;

pub use allocator::{Allocation, Allocator, Policy};
pub use distance::{distance_km, haversine_distance, round_km, UNREACHABLE_KM};
pub use features::{extract_features, FeatureVector, UnitStatus, FEATURE_DIM};
pub use matcher::{Matcher, NearestResult};
pub use scoring::{ModelError, ModelState, QNetwork, Scorer};
