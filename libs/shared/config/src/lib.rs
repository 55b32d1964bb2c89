use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub jwt_secret: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_URL not set, using empty value");
                    String::new()
                }),
            store_api_key: env::var("STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("GEMINI_API_KEY not set, using empty value");
                    String::new()
                }),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("GEMINI_BASE_URL not set, using default");
                    "https://generativelanguage.googleapis.com".to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
            && !self.store_api_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_voice_configured(&self) -> bool {
        !self.gemini_api_key.is_empty() && !self.gemini_base_url.is_empty()
    }
}
