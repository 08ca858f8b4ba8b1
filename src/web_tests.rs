use super::web::*;
use crate::config::Config;
use crate::sensor::{FixedClock, TimeBlockSensor};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use chrono::NaiveDateTime;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

fn sensor_at(ts: &str) -> TimeBlockSensor {
    let at = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap();
    TimeBlockSensor::new(Config::default(), Arc::new(FixedClock::new(at)))
}

fn app_state(sensor: &TimeBlockSensor) -> AppState {
    AppState {
        state_rx: sensor.subscribe(),
        config: Arc::new(sensor.config().clone()),
    }
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or_default())
}

#[tokio::test]
async fn health_ok() {
    let router = axum::Router::new().route("/api/health", get(health));
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn version_reports_build_version() {
    let router = axum::Router::new().route("/api/version", get(version));
    let (status, json) = get_json(router, "/api/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], APP_VERSION);
}

#[tokio::test]
async fn state_unavailable_before_first_refresh() {
    let sensor = sensor_at("2024-07-15 08:30");
    let router = build_router(app_state(&sensor));
    let (status, json) = get_json(router, "/api/state").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn state_returns_latest_reading() {
    let mut sensor = sensor_at("2024-07-15 08:30");
    sensor.update();
    let router = build_router(app_state(&sensor));
    let (status, json) = get_json(router, "/api/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["native_value"], 2);
    assert_eq!(json["unique_id"], "uro_si_timeblock_current_block");
    assert_eq!(json["attributes"]["is_workday"], true);
    assert_eq!(json["attributes"]["is_high_season"], false);
}

#[tokio::test]
async fn classify_endpoint_uses_query_timestamp() {
    let router = axum::Router::new().route("/api/classify", get(classify_at));
    let (status, json) = get_json(router, "/api/classify?at=2024-12-25T10:00").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["block"], 2);
    assert_eq!(json["is_holiday"], true);
    assert_eq!(json["is_workday"], false);
    assert_eq!(json["holiday_name"], "Christmas Day");
}

#[tokio::test]
async fn classify_endpoint_names_easter_holidays_only_when_they_apply() {
    let router = axum::Router::new().route("/api/classify", get(classify_at));
    let (_, json) = get_json(router.clone(), "/api/classify?at=2024-04-01T08:00").await;
    assert_eq!(json["holiday_name"], "Easter Monday");
    assert_eq!(json["block"], 3);

    let (_, json) = get_json(router, "/api/classify?at=2024-04-02T08:00").await;
    assert!(json["holiday_name"].is_null());
    assert_eq!(json["is_holiday"], false);
}

#[tokio::test]
async fn serve_reports_bind_failure_as_web_error() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = Config::default();
    config.web.host = "127.0.0.1".to_string();
    config.web.port = taken.local_addr().unwrap().port();

    let sensor = sensor_at("2024-07-15 08:30");
    let err = serve(sensor.subscribe(), Arc::new(config)).await.unwrap_err();
    assert!(matches!(err, crate::error::TimeBlockError::Web { .. }));
    assert!(err.to_string().starts_with("Web server error: Failed to bind"));
}

#[tokio::test]
async fn classify_endpoint_rejects_malformed_timestamp() {
    let router = axum::Router::new().route("/api/classify", get(classify_at));
    let (status, json) = get_json(router, "/api/classify?at=2024-13-01T10:00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid date"));
}

#[tokio::test]
async fn holidays_for_requested_year() {
    let router = axum::Router::new().route("/api/holidays", get(holidays));
    let (status, json) = get_json(router, "/api/holidays?year=2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["year"], 2024);
    let list = json["holidays"].as_array().unwrap();
    assert_eq!(list.len(), 14);
    assert!(
        list.iter()
            .any(|h| h["date"] == "2024-04-01" && h["kind"] == "variable")
    );
}

#[tokio::test]
async fn config_get_returns_json() {
    let sensor = sensor_at("2024-07-15 08:30");
    let router = build_router(app_state(&sensor));
    let (status, json) = get_json(router, "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["poll_interval_ms"], 60_000);
    assert!(json.get("logging").is_some());
}

#[cfg(feature = "openapi")]
#[tokio::test]
async fn config_schema_lists_properties() {
    let router = axum::Router::new().route("/api/config/schema", get(get_config_schema));
    let (status, json) = get_json(router, "/api/config/schema").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["properties"].get("poll_interval_ms").is_some());
}
