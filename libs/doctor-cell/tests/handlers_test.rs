use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Path, State};
use axum::Json;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::handlers;
use doctor_cell::models::{ReplaceSlotsRequest, TimeSlot};
use shared_models::auth::{AuthUser, UserType};
use shared_models::error::AppError;
use shared_models::events::DomainEvent;
use shared_models::state::AppState;
use shared_utils::test_utils::{RecordingBus, TestConfig};

fn test_state(store_url: &str, bus: Arc<RecordingBus>) -> AppState {
    TestConfig::with_store_url(store_url).to_state(bus)
}

fn doctor_user(id: &str) -> AuthUser {
    AuthUser {
        id: id.to_string(),
        email: "patel@example.com".to_string(),
        user_type: UserType::Doctor,
    }
}

fn doctor_row(id: &str, name: &str, slots: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": "patel@example.com",
        "password_hash": "hash",
        "age": 45,
        "gender": "male",
        "specialization": "General Practice",
        "available_slots": slots
    })
}

fn monday_window() -> TimeSlot {
    TimeSlot {
        id: None,
        start_time: "10:00".to_string(),
        end_time: "11:00".to_string(),
        day_of_week: 1,
    }
}

#[tokio::test]
async fn list_doctors_strips_credentials() {
    let server = MockServer::start().await;
    let state = test_state(&server.uri(), RecordingBus::new());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_row("doctor-1", "Patel", json!([]))
        ])))
        .mount(&server)
        .await;

    let Json(doctors) = handlers::list_doctors(State(state)).await.unwrap();

    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].id, "doctor-1");
    assert_eq!(doctors[0].name, "Patel");
    assert_eq!(doctors[0].specialization, "General Practice");

    let as_json = serde_json::to_value(&doctors[0]).unwrap();
    assert!(as_json.get("email").is_none());
    assert!(as_json.get("password_hash").is_none());
}

#[tokio::test]
async fn get_doctor_returns_not_found_for_unknown_id() {
    let server = MockServer::start().await;
    let state = test_state(&server.uri(), RecordingBus::new());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = handlers::get_doctor(State(state), Path("ghost".to_string()))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::NotFound(_));
}

#[tokio::test]
async fn update_slots_replaces_set_wholesale_and_emits_event() {
    let server = MockServer::start().await;
    let bus = RecordingBus::new();
    let state = test_state(&server.uri(), bus.clone());

    let windows = vec![monday_window()];

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.doctor-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_row("doctor-1", "Patel", serde_json::to_value(&windows).unwrap())
        ])))
        .mount(&server)
        .await;

    let Json(response) = handlers::update_slots(
        State(state),
        Path("doctor-1".to_string()),
        Extension(doctor_user("doctor-1")),
        Json(ReplaceSlotsRequest {
            available_slots: Some(windows.clone()),
        }),
    )
    .await
    .unwrap();

    // Read-back yields exactly the set that was written.
    assert_eq!(
        response["availableSlots"],
        serde_json::to_value(&windows).unwrap()
    );

    let events = bus.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        DomainEvent::ScheduleUpdated {
            doctor_id: "doctor-1".to_string(),
            doctor_name: "Patel".to_string(),
        }
    );
}

#[tokio::test]
async fn replacing_with_the_same_set_is_idempotent() {
    let server = MockServer::start().await;
    let bus = RecordingBus::new();
    let state = test_state(&server.uri(), bus.clone());

    let windows = vec![monday_window()];

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.doctor-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_row("doctor-1", "Patel", serde_json::to_value(&windows).unwrap())
        ])))
        .mount(&server)
        .await;

    let mut results = Vec::new();
    for _ in 0..2 {
        let Json(response) = handlers::update_slots(
            State(state.clone()),
            Path("doctor-1".to_string()),
            Extension(doctor_user("doctor-1")),
            Json(ReplaceSlotsRequest {
                available_slots: Some(windows.clone()),
            }),
        )
        .await
        .unwrap();
        results.push(response["availableSlots"].clone());
    }

    assert_eq!(results[0], results[1]);
    // Each replace still announces a schedule change.
    assert_eq!(bus.events().len(), 2);
}

#[tokio::test]
async fn update_slots_rejects_other_doctors() {
    let server = MockServer::start().await;
    let bus = RecordingBus::new();
    let state = test_state(&server.uri(), bus.clone());

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = handlers::update_slots(
        State(state),
        Path("doctor-1".to_string()),
        Extension(doctor_user("doctor-2")),
        Json(ReplaceSlotsRequest {
            available_slots: Some(vec![monday_window()]),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Forbidden(_));
    assert!(bus.events().is_empty());
}

#[tokio::test]
async fn malformed_windows_are_persisted_as_is() {
    let server = MockServer::start().await;
    let state = test_state(&server.uri(), RecordingBus::new());

    // End before start: nothing rejects this.
    let backwards = vec![TimeSlot {
        id: None,
        start_time: "17:00".to_string(),
        end_time: "09:00".to_string(),
        day_of_week: 3,
    }];

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", "eq.doctor-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_row("doctor-1", "Patel", serde_json::to_value(&backwards).unwrap())
        ])))
        .mount(&server)
        .await;

    let Json(response) = handlers::update_slots(
        State(state),
        Path("doctor-1".to_string()),
        Extension(doctor_user("doctor-1")),
        Json(ReplaceSlotsRequest {
            available_slots: Some(backwards.clone()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(
        response["availableSlots"],
        serde_json::to_value(&backwards).unwrap()
    );
}
