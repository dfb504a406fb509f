use crate::models::{Ambulance, Hospital, Incident, VitalsRecord};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur with document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read seed data: {0}")]
    SeedIo(#[from] std::io::Error),

    #[error("Invalid seed data: {0}")]
    SeedParse(#[from] serde_json::Error),
}

/// Document store holding the dispatch collections
///
/// Hospitals and ambulances are read-mostly; incidents and vitals records are
/// append-only.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn count_hospitals(&self) -> Result<usize, StoreError>;

    async fn hospitals(&self) -> Result<Vec<Hospital>, StoreError>;

    async fn find_hospital(&self, id: &str) -> Result<Option<Hospital>, StoreError>;

    async fn ambulances_with_status(&self, status: &str) -> Result<Vec<Ambulance>, StoreError>;

    async fn find_ambulance(&self, unit_id: &str) -> Result<Option<Ambulance>, StoreError>;

    async fn insert_incident(&self, incident: Incident) -> Result<String, StoreError>;

    /// Newest first
    async fn recent_incidents(&self, limit: usize) -> Result<Vec<Incident>, StoreError>;

    async fn insert_vitals(&self, record: VitalsRecord) -> Result<String, StoreError>;

    /// Newest first
    async fn recent_vitals(&self, limit: usize) -> Result<Vec<VitalsRecord>, StoreError>;
}

/// Seed file layout
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub hospitals: Vec<Hospital>,
    #[serde(default)]
    pub ambulances: Vec<Ambulance>,
}

/// In-process document store
#[derive(Default)]
pub struct InMemoryStore {
    hospitals: RwLock<Vec<Hospital>>,
    ambulances: RwLock<Vec<Ambulance>>,
    incidents: RwLock<Vec<Incident>>,
    vitals: RwLock<Vec<VitalsRecord>>,
}

impl InMemoryStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_data(hospitals: Vec<Hospital>, ambulances: Vec<Ambulance>) -> Self {
        Self {
            hospitals: RwLock::new(hospitals),
            ambulances: RwLock::new(ambulances),
            ..Self::default()
        }
    }

    /// Load hospitals and ambulances from a JSON seed file
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let seed: SeedData = serde_json::from_str(&raw)?;

        tracing::info!(
            "Seeded store from {} ({} hospitals, {} ambulances)",
            path.as_ref().display(),
            seed.hospitals.len(),
            seed.ambulances.len()
        );

        Ok(Self::with_data(seed.hospitals, seed.ambulances))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn count_hospitals(&self) -> Result<usize, StoreError> {
        Ok(self.hospitals.read().await.len())
    }

    async fn hospitals(&self) -> Result<Vec<Hospital>, StoreError> {
        Ok(self.hospitals.read().await.clone())
    }

    async fn find_hospital(&self, id: &str) -> Result<Option<Hospital>, StoreError> {
        Ok(self.hospitals.read().await.iter().find(|h| h.id == id).cloned())
    }

    async fn ambulances_with_status(&self, status: &str) -> Result<Vec<Ambulance>, StoreError> {
        Ok(self
            .ambulances
            .read()
            .await
            .iter()
            .filter(|a| a.status.as_deref() == Some(status))
            .cloned()
            .collect())
    }

    async fn find_ambulance(&self, unit_id: &str) -> Result<Option<Ambulance>, StoreError> {
        Ok(self.ambulances.read().await.iter().find(|a| a.unit_id == unit_id).cloned())
    }

    async fn insert_incident(&self, incident: Incident) -> Result<String, StoreError> {
        let id = incident.id.clone();
        self.incidents.write().await.push(incident);
        tracing::debug!("Stored incident {}", id);
        Ok(id)
    }

    async fn recent_incidents(&self, limit: usize) -> Result<Vec<Incident>, StoreError> {
        let mut incidents = self.incidents.read().await.clone();
        incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        incidents.truncate(limit);
        Ok(incidents)
    }

    async fn insert_vitals(&self, record: VitalsRecord) -> Result<String, StoreError> {
        let id = record.id.clone();
        self.vitals.write().await.push(record);
        tracing::debug!("Stored vitals record {}", id);
        Ok(id)
    }

    async fn recent_vitals(&self, limit: usize) -> Result<Vec<VitalsRecord>, StoreError> {
        let mut records = self.vitals.read().await.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vitals;
    use chrono::{Duration, Utc};

    fn create_incident(id: &str, minutes_ago: i64) -> Incident {
        Incident {
            id: id.to_string(),
            latitude: 12.97,
            longitude: 77.59,
            incident_type: "accident".to_string(),
            severity: "high".to_string(),
            description: String::new(),
            status: "detected".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_recent_incidents_newest_first() {
        let store = InMemoryStore::empty();
        store.insert_incident(create_incident("old", 30)).await.unwrap();
        store.insert_incident(create_incident("new", 1)).await.unwrap();
        store.insert_incident(create_incident("mid", 10)).await.unwrap();

        let recent = store.recent_incidents(2).await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn test_vitals_roundtrip() {
        let store = InMemoryStore::empty();
        let record = VitalsRecord {
            id: "V1".to_string(),
            patient_id: "P1".to_string(),
            hospital_name: "City General".to_string(),
            incident_id: None,
            vitals: Vitals {
                heart_rate: Some(88.0),
                ..Vitals::default()
            },
            created_at: Utc::now(),
        };

        assert_eq!(store.insert_vitals(record).await.unwrap(), "V1");
        let recent = store.recent_vitals(20).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].vitals.heart_rate, Some(88.0));
    }

    #[tokio::test]
    async fn test_ambulance_status_filter() {
        let seed: SeedData = serde_json::from_value(serde_json::json!({
            "ambulances": [
                {"unit_id": "A1", "latitude": 12.9, "longitude": 77.6, "status": "available"},
                {"unit_id": "A2", "latitude": 12.9, "longitude": 77.6, "status": "on_scene"},
                {"unit_id": "A3", "latitude": 12.9, "longitude": 77.6}
            ]
        }))
        .unwrap();
        let store = InMemoryStore::with_data(seed.hospitals, seed.ambulances);

        let available = store.ambulances_with_status("available").await.unwrap();
        let ids: Vec<&str> = available.iter().map(|a| a.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["A1"]);
        assert!(store.find_ambulance("A2").await.unwrap().is_some());
        assert!(store.find_ambulance("A9").await.unwrap().is_none());
    }

    #[test]
    fn test_missing_seed_file() {
        let path = std::env::temp_dir().join(format!("seed-{}.json", uuid::Uuid::new_v4()));
        assert!(matches!(InMemoryStore::from_seed_file(&path), Err(StoreError::SeedIo(_))));
    }
}
