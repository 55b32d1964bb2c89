use tracing::debug;

use shared_config::AppConfig;
use shared_database::store::StoreClient;

use crate::models::{DoctorError, DoctorRecord};

/// Directory reads over the doctors collection.
pub struct DoctorService {
    store: StoreClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<DoctorRecord>, DoctorError> {
        let doctors = self.store.select("doctors", "").await?;
        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<DoctorRecord, DoctorError> {
        debug!("Fetching doctor {}", doctor_id);

        let mut rows: Vec<DoctorRecord> = self
            .store
            .select("doctors", &format!("id=eq.{}", urlencoding::encode(doctor_id)))
            .await?;

        if rows.is_empty() {
            return Err(DoctorError::NotFound);
        }

        Ok(rows.remove(0))
    }

    /// Exact, case-sensitive display-name lookup. Display names are not
    /// unique, so this can return more than one row; callers decide what an
    /// ambiguous result means.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<DoctorRecord>, DoctorError> {
        // Display names are free text; encoded so that `&`, `+` and friends
        // stay part of the value.
        let rows = self
            .store
            .select("doctors", &format!("name=eq.{}", urlencoding::encode(name)))
            .await?;

        Ok(rows)
    }
}
