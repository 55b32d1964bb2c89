use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::handlers;
use auth_cell::models::{LoginRequest, RegisterRequest};
use auth_cell::services::password;
use shared_config::AppConfig;
use shared_models::auth::UserType;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::TestConfig;

fn test_config(store_url: &str) -> Arc<AppConfig> {
    TestConfig::with_store_url(store_url).to_arc()
}

fn patient_register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: Some(email.to_string()),
        password: Some("password123".to_string()),
        name: Some("Jane Doe".to_string()),
        age: Some(34),
        gender: Some("female".to_string()),
        user_type: Some(UserType::Patient),
        specialization: None,
        available_slots: vec![],
    }
}

fn doctor_row(id: &str, name: &str, email: &str, password_hash: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "password_hash": password_hash,
        "age": 45,
        "gender": "male",
        "specialization": "Cardiology",
        "available_slots": []
    })
}

fn patient_row(id: &str, name: &str, email: &str, password_hash: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "password_hash": password_hash,
        "age": 34,
        "gender": "female"
    })
}

async fn mock_email_lookup(server: &MockServer, collection: &str, email: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", collection)))
        .and(query_param("email", format!("eq.{}", email)))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

#[tokio::test]
async fn register_patient_issues_token_with_patient_role() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());

    mock_email_lookup(&server, "doctors", "jane@example.com", json!([])).await;
    mock_email_lookup(&server, "patients", "jane@example.com", json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            patient_row("patient-1", "Jane Doe", "jane@example.com", "stored-hash")
        ])))
        .mount(&server)
        .await;

    let (status, Json(response)) = handlers::register(
        State(config.clone()),
        Json(patient_register_request("jane@example.com")),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.user.user_type, UserType::Patient);
    assert_eq!(response.user.email, "jane@example.com");

    // The embedded role matches the registered role.
    let user = validate_token(&response.token, &config.jwt_secret).unwrap();
    assert_eq!(user.user_type, UserType::Patient);
}

#[tokio::test]
async fn register_doctor_requires_specialization() {
    let config = test_config("http://localhost:1");

    let mut request = patient_register_request("patel@example.com");
    request.user_type = Some(UserType::Doctor);
    request.specialization = None;

    let err = handlers::register(State(config), Json(request))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::BadRequest(_));
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let config = test_config("http://localhost:1");

    let mut request = patient_register_request("jane@example.com");
    request.password = None;

    let err = handlers::register(State(config), Json(request))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::BadRequest(_));
}

#[tokio::test]
async fn register_rejects_duplicate_email_across_collections() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());

    // The email is already taken by a doctor account.
    mock_email_lookup(
        &server,
        "doctors",
        "taken@example.com",
        json!([doctor_row("doctor-1", "Patel", "taken@example.com", "hash")]),
    )
    .await;
    mock_email_lookup(&server, "patients", "taken@example.com", json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = handlers::register(
        State(config),
        Json(patient_register_request("taken@example.com")),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::BadRequest(_));
}

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());

    let hash = password::hash_password("password123").unwrap();

    mock_email_lookup(&server, "doctors", "jane@example.com", json!([])).await;
    mock_email_lookup(
        &server,
        "patients",
        "jane@example.com",
        json!([patient_row("patient-1", "Jane Doe", "jane@example.com", &hash)]),
    )
    .await;

    let Json(response) = handlers::login(
        State(config.clone()),
        Json(LoginRequest {
            email: Some("jane@example.com".to_string()),
            password: Some("password123".to_string()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(response.message, "Login successful");
    assert_eq!(response.user.id, "patient-1");

    let user = validate_token(&response.token, &config.jwt_secret).unwrap();
    assert_eq!(user.id, "patient-1");
    assert_eq!(user.user_type, UserType::Patient);
}

#[tokio::test]
async fn login_resolves_doctors_before_patients() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());

    let hash = password::hash_password("password123").unwrap();

    mock_email_lookup(
        &server,
        "doctors",
        "patel@example.com",
        json!([doctor_row("doctor-1", "Patel", "patel@example.com", &hash)]),
    )
    .await;

    let Json(response) = handlers::login(
        State(config.clone()),
        Json(LoginRequest {
            email: Some("patel@example.com".to_string()),
            password: Some("password123".to_string()),
        }),
    )
    .await
    .unwrap();

    let user = validate_token(&response.token, &config.jwt_secret).unwrap();
    assert_eq!(user.user_type, UserType::Doctor);
}

// The mock only matches the decoded value `eq.jane+doe@example.com`; a
// literal `+` on the wire would decode as a space and miss it.
#[tokio::test]
async fn login_matches_emails_containing_plus() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());

    let hash = password::hash_password("password123").unwrap();

    mock_email_lookup(&server, "doctors", "jane+doe@example.com", json!([])).await;
    mock_email_lookup(
        &server,
        "patients",
        "jane+doe@example.com",
        json!([patient_row("patient-1", "Jane Doe", "jane+doe@example.com", &hash)]),
    )
    .await;

    let Json(response) = handlers::login(
        State(config.clone()),
        Json(LoginRequest {
            email: Some("jane+doe@example.com".to_string()),
            password: Some("password123".to_string()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(response.user.id, "patient-1");

    let user = validate_token(&response.token, &config.jwt_secret).unwrap();
    assert_eq!(user.email, "jane+doe@example.com");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());

    let hash = password::hash_password("password123").unwrap();

    mock_email_lookup(&server, "doctors", "jane@example.com", json!([])).await;
    mock_email_lookup(
        &server,
        "patients",
        "jane@example.com",
        json!([patient_row("patient-1", "Jane Doe", "jane@example.com", &hash)]),
    )
    .await;

    let err = handlers::login(
        State(config),
        Json(LoginRequest {
            email: Some("jane@example.com".to_string()),
            password: Some("not-the-password".to_string()),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Auth(_));
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri());

    mock_email_lookup(&server, "doctors", "ghost@example.com", json!([])).await;
    mock_email_lookup(&server, "patients", "ghost@example.com", json!([])).await;

    let err = handlers::login(
        State(config),
        Json(LoginRequest {
            email: Some("ghost@example.com".to_string()),
            password: Some("password123".to_string()),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Auth(_));
}
