use std::collections::HashMap;

use tracing::debug;

use auth_cell::models::PatientRecord;
use doctor_cell::models::DoctorRecord;
use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::appointment::AppointmentDetails;
use shared_models::auth::{AuthUser, UserType};

use crate::models::{AppointmentError, AppointmentRecord};

const UNKNOWN: &str = "Unknown";

/// Role-scoped reads over the appointment ledger.
pub struct LedgerService {
    store: StoreClient,
}

impl LedgerService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// List the caller's appointments, enriched with the counterpart display
    /// fields at read time. No ordering is requested from the store, so rows
    /// come back in insertion order.
    pub async fn list_for_user(
        &self,
        user: &AuthUser,
    ) -> Result<Vec<AppointmentDetails>, AppointmentError> {
        let id = urlencoding::encode(&user.id);
        let filter = match user.user_type {
            UserType::Doctor => format!("doctor_id=eq.{}", id),
            UserType::Patient => format!("patient_id=eq.{}", id),
        };

        debug!("Listing appointments with filter {}", filter);

        let rows: Vec<AppointmentRecord> = self.store.select("appointments", &filter).await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let doctors = self
            .fetch_doctors(rows.iter().map(|r| r.doctor_id.as_str()))
            .await?;
        let patients = self
            .fetch_patients(rows.iter().map(|r| r.patient_id.as_str()))
            .await?;

        let enriched = rows
            .into_iter()
            .map(|row| {
                let (doctor_name, doctor_specialization) = doctors
                    .get(&row.doctor_id)
                    .map(|d| (d.name.clone(), d.specialization.clone()))
                    .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()));

                let patient_name = patients
                    .get(&row.patient_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN.to_string());

                row.enrich(doctor_name, doctor_specialization, patient_name)
            })
            .collect();

        Ok(enriched)
    }

    async fn fetch_doctors<'a>(
        &self,
        ids: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, DoctorRecord>, AppointmentError> {
        let filter = in_filter("id", ids);
        let rows: Vec<DoctorRecord> = self.store.select("doctors", &filter).await?;

        Ok(rows.into_iter().map(|d| (d.id.clone(), d)).collect())
    }

    async fn fetch_patients<'a>(
        &self,
        ids: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, PatientRecord>, AppointmentError> {
        let filter = in_filter("id", ids);
        let rows: Vec<PatientRecord> = self.store.select("patients", &filter).await?;

        Ok(rows.into_iter().map(|p| (p.id.clone(), p)).collect())
    }
}

fn in_filter<'a>(column: &str, ids: impl Iterator<Item = &'a str>) -> String {
    let mut unique: Vec<&str> = ids.collect();
    unique.sort_unstable();
    unique.dedup();

    let encoded: Vec<String> = unique
        .into_iter()
        .map(|id| urlencoding::encode(id).into_owned())
        .collect();

    format!("{}=in.({})", column, encoded.join(","))
}
