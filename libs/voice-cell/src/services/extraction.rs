use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{ExtractedAppointment, VoiceError};

const MODEL: &str = "gemini-2.5-flash";

// The model wraps its JSON in prose or code fences; grab the widest
// brace-delimited span.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("literal regex"));

/// Call-and-parse wrapper around the generative-language completion API. No
/// retries; the underlying client's default timeout is the only cancellation.
pub struct ExtractionService {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl ExtractionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http_client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.clone(),
        }
    }

    pub async fn extract(&self, transcript: &str) -> Result<ExtractedAppointment, VoiceError> {
        debug!("Extracting appointment fields from transcript");

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, MODEL, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": build_prompt(transcript) }]
            }]
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VoiceError::Upstream(format!("{}: {}", status, error_text)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| VoiceError::Upstream(e.to_string()))?;

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!("Language model response carried no candidate text");
                VoiceError::InvalidOutput
            })?;

        parse_model_output(text)
    }
}

/// Pull the first JSON object out of the model's free-text reply. No schema
/// validation beyond a successful parse; absent fields stay `None`.
pub fn parse_model_output(text: &str) -> Result<ExtractedAppointment, VoiceError> {
    let matched = JSON_OBJECT.find(text).ok_or_else(|| {
        error!("Language model output parsing error: {}", text);
        VoiceError::InvalidOutput
    })?;

    serde_json::from_str(matched.as_str()).map_err(|_| {
        error!("Language model output parsing error: {}", text);
        VoiceError::InvalidOutput
    })
}

fn build_prompt(transcript: &str) -> String {
    format!(
        r#"You are a helpful assistant that extracts appointment information.

Input: "{}"

Extract and return JSON in the following format:
{{
  "patient_name": "",
  "doctor_name": "",
  "date": "",
  "time": "",
  "purpose": ""
}}
"#,
        transcript
    )
}
