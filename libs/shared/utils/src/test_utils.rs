use std::sync::{Arc, Mutex};

use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, UserType};
use shared_models::events::{DomainEvent, EventBus};
use shared_models::state::AppState;

use crate::jwt::sign_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub store_url: String,
    pub store_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_store_url(store_url: &str) -> Self {
        Self {
            store_url: store_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_api_key: self.store_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            gemini_api_key: String::new(),
            gemini_base_url: String::new(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// App state wired with a recording bus, so tests can assert on the
    /// events a handler published.
    pub fn to_state(&self, bus: Arc<RecordingBus>) -> AppState {
        AppState::new(self.to_arc(), bus)
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
}

impl TestUser {
    pub fn doctor(email: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            user_type: UserType::Doctor,
        }
    }

    pub fn patient(email: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            user_type: UserType::Patient,
        }
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            email: self.email.clone(),
            user_type: self.user_type,
        }
    }

    pub fn token(&self, jwt_secret: &str) -> String {
        sign_token(&self.id, &self.email, self.user_type, jwt_secret)
            .expect("failed to sign test token")
    }
}

/// Event bus double that records everything published through it.
#[derive(Default)]
pub struct RecordingBus {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventBus for RecordingBus {
    fn publish(&self, event: DomainEvent) {
        self.events.lock().unwrap().push(event);
    }
}
