use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::models::DoctorRecord;
use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::auth::{AuthResponse, UserSummary, UserType};
use shared_utils::jwt::sign_token;

use crate::models::{AuthError, LoginRequest, PatientRecord, RegisterRequest};
use crate::services::password;

/// Registration and login against the identity collections.
pub struct AccountService {
    store: StoreClient,
    jwt_secret: String,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let email = required(request.email)?;
        let password = required(request.password)?;
        let name = required(request.name)?;
        let age = request.age.ok_or(AuthError::MissingFields)?;
        let gender = required(request.gender)?;
        let user_type = request.user_type.ok_or(AuthError::MissingFields)?;

        if user_type == UserType::Doctor
            && request.specialization.as_deref().unwrap_or("").is_empty()
        {
            return Err(AuthError::SpecializationRequired);
        }

        // Emails are unique across both collections.
        let filter = email_filter(&email);
        let doctors: Vec<DoctorRecord> = self.store.select("doctors", &filter).await?;
        let patients: Vec<PatientRecord> = self.store.select("patients", &filter).await?;

        if !doctors.is_empty() || !patients.is_empty() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = password::hash_password(&password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        let id = Uuid::new_v4().to_string();

        match user_type {
            UserType::Doctor => {
                let row = json!({
                    "id": id,
                    "name": name,
                    "email": email,
                    "password_hash": password_hash,
                    "age": age,
                    "gender": gender,
                    "specialization": request.specialization,
                    "available_slots": request.available_slots,
                });
                let _stored: DoctorRecord = self.store.insert("doctors", row).await?;
            }
            UserType::Patient => {
                let row = json!({
                    "id": id,
                    "name": name,
                    "email": email,
                    "password_hash": password_hash,
                    "age": age,
                    "gender": gender,
                });
                let _stored: PatientRecord = self.store.insert("patients", row).await?;
            }
        }

        info!("Registered new {} account {}", user_type, id);

        self.auth_response("User registered successfully", &id, &email, &name, user_type)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = required(request.email)?;
        let password = required(request.password)?;

        // Doctors are checked first, then patients, mirroring registration.
        let identity = match self.find_doctor(&email).await? {
            Some(doctor) => Identity {
                id: doctor.id,
                name: doctor.name,
                password_hash: doctor.password_hash,
                user_type: UserType::Doctor,
            },
            None => match self.find_patient(&email).await? {
                Some(patient) => Identity {
                    id: patient.id,
                    name: patient.name,
                    password_hash: patient.password_hash,
                    user_type: UserType::Patient,
                },
                None => return Err(AuthError::InvalidCredentials),
            },
        };

        let valid = password::verify_password(&password, &identity.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        if !valid {
            debug!("Password mismatch for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        self.auth_response(
            "Login successful",
            &identity.id,
            &email,
            &identity.name,
            identity.user_type,
        )
    }

    async fn find_doctor(&self, email: &str) -> Result<Option<DoctorRecord>, AuthError> {
        let mut rows: Vec<DoctorRecord> = self
            .store
            .select("doctors", &email_filter(email))
            .await?;

        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    async fn find_patient(&self, email: &str) -> Result<Option<PatientRecord>, AuthError> {
        let mut rows: Vec<PatientRecord> = self
            .store
            .select("patients", &email_filter(email))
            .await?;

        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    fn auth_response(
        &self,
        message: &str,
        id: &str,
        email: &str,
        name: &str,
        user_type: UserType,
    ) -> Result<AuthResponse, AuthError> {
        let token = sign_token(id, email, user_type, &self.jwt_secret)
            .map_err(AuthError::Signing)?;

        Ok(AuthResponse {
            message: message.to_string(),
            token,
            user: UserSummary {
                id: id.to_string(),
                email: email.to_string(),
                name: name.to_string(),
                user_type,
            },
        })
    }
}

struct Identity {
    id: String,
    name: String,
    password_hash: String,
    user_type: UserType,
}

fn required(value: Option<String>) -> Result<String, AuthError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AuthError::MissingFields),
    }
}

// Filter values ride in the query string; a literal `+` or `&` in an email
// would change its meaning there.
fn email_filter(email: &str) -> String {
    format!("email=eq.{}", urlencoding::encode(email))
}
