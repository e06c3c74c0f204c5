//! Backend client against a local stub of the bot API.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::json;
use trainerdex::api::{ApiError, BackendClient};

async fn profile(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "1234" => Json(json!({
            "discordId": "1234",
            "name": "Red",
            "badges": 3,
            "money": 52000,
            "encounters": 120,
            "newEncounters": 4,
            "sprite": "https://cdn.example/red.png",
            "delay": 2
        }))
        .into_response(),
        "broken" => (StatusCode::OK, "{not json").into_response(),
        "down" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => (StatusCode::BAD_REQUEST, "unknown trainer").into_response(),
    }
}

async fn pokedex(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "1234" => Json(json!([
            {"name": "Pikachu", "caught": true, "shiny": true, "set": {
                "ability": "Static", "item": "Light Ball", "nature": "Timid",
                "moves": ["Thunderbolt", "Surf"], "evs": {"spa": 252, "spe": 252, "hp": 4}
            }},
            {"name": "Eevee", "caught": false, "shiny": false}
        ]))
        .into_response(),
        _ => (StatusCode::BAD_REQUEST, "unknown trainer").into_response(),
    }
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/backend/pokedex/{id}", get(pokedex))
        .route("/api/backend/{id}", get(profile));
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/backend")
}

fn client(base: &str) -> BackendClient {
    BackendClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn profile_decodes_camel_case() {
    let base = spawn_backend().await;
    let profile = client(&base).fetch_profile("1234").await.unwrap();
    assert_eq!(profile.name, "Red");
    assert_eq!(profile.discord_id, "1234");
    assert_eq!(profile.badges, 3);
    assert_eq!(profile.new_encounters, 4);
}

#[tokio::test]
async fn bad_request_means_unknown_trainer() {
    let base = spawn_backend().await;
    let err = client(&base).fetch_profile("nobody").await.unwrap_err();
    assert_eq!(err, ApiError::UnknownTrainer);
}

#[tokio::test]
async fn other_failures_are_generic() {
    let base = spawn_backend().await;
    let api = client(&base);
    assert_eq!(
        api.fetch_profile("down").await.unwrap_err(),
        ApiError::Http { status: 503 }
    );
    assert!(matches!(
        api.fetch_profile("broken").await.unwrap_err(),
        ApiError::Decode(_)
    ));
}

#[tokio::test]
async fn pokedex_feed_decodes_status_records() {
    let base = spawn_backend().await;
    let records = client(&format!("{base}/")).fetch_pokedex("1234").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].species_name, "Pikachu");
    assert!(records[0].shiny);
    let set = records[0].competitive_set.as_ref().unwrap();
    assert_eq!(set.held_item, "Light Ball");
    assert_eq!(set.effort_values.spa, 252);
    assert_eq!(set.effort_values.atk, 0);
    assert!(records[1].competitive_set.is_none());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = client(&format!("http://{addr}/api/backend"))
        .fetch_pokedex("1234")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
