// Service exports
pub mod store;

pub use store::{DocumentStore, InMemoryStore, SeedData, StoreError};
