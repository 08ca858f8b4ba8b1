//! Axum-based HTTP server exposing the published time-block state
//!
//! The server never touches the refresh loop; it reads the latest state from
//! the sensor's watch channel and answers ad-hoc classification queries with
//! the pure core.

use crate::block::{TimeBlockReading, classify, parse_timestamp};
use crate::config::Config;
use crate::error::{Result, TimeBlockError};
use crate::holiday::{holiday_name, holidays_in_year};
use crate::sensor::StateReceiver;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build version stamped by `build.rs`
pub const APP_VERSION: &str = env!("APP_VERSION");

#[derive(Clone)]
pub struct AppState {
    pub state_rx: StateReceiver,
    pub config: Arc<Config>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct ClassifyParams {
    /// Local timestamp, e.g. 2024-07-15T08:30
    pub at: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct HolidayParams {
    /// Calendar year; defaults to the current local year
    pub year: Option<i32>,
}

/// Ad-hoc classification answer
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    #[serde(flatten)]
    pub reading: TimeBlockReading,
    pub holiday_name: Option<&'static str>,
}

fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (status, Json(serde_json::json!({ "error": message.to_string() }))).into_response()
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/health", responses(
    (status = 200, description = "Service is healthy")
)))]
pub(crate) async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/version", responses((status = 200))))]
pub(crate) async fn version() -> impl IntoResponse {
    Json(serde_json::json!({ "version": APP_VERSION }))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/state", responses(
    (status = 200, description = "Latest published sensor state"),
    (status = 503, description = "No refresh has completed yet")
)))]
pub(crate) async fn state(State(state): State<AppState>) -> Response {
    let latest = state.state_rx.borrow().clone();
    match latest {
        Some(s) => Json(serde_json::to_value(&*s).unwrap_or_default()).into_response(),
        None => error_response(StatusCode::SERVICE_UNAVAILABLE, "sensor has not refreshed yet"),
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/classify", params(ClassifyParams), responses(
    (status = 200, description = "Reading for the given timestamp"),
    (status = 400, description = "Malformed timestamp")
)))]
pub(crate) async fn classify_at(Query(params): Query<ClassifyParams>) -> Response {
    match parse_timestamp(&params.at) {
        Ok(ts) => Json(ClassifyResponse {
            reading: classify(ts),
            holiday_name: holiday_name(ts.date()),
        })
        .into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e),
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/holidays", params(HolidayParams), responses((status = 200))))]
pub(crate) async fn holidays(Query(params): Query<HolidayParams>) -> impl IntoResponse {
    let year = params.year.unwrap_or_else(|| chrono::Local::now().year());
    Json(serde_json::json!({
        "year": year,
        "holidays": holidays_in_year(year),
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/config", responses((status = 200))))]
pub(crate) async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::to_value(&*state.config).unwrap_or_default())
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/events", responses((status = 200))))]
pub(crate) async fn events(State(state): State<AppState>) -> impl IntoResponse {
    let stream = WatchStream::new(state.state_rx.clone()).filter_map(|latest| {
        latest.map(|s| Event::default().event("state").json_data(&*s))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(feature = "openapi")]
mod openapi {
    use super::*;
    use utoipa::OpenApi;

    #[derive(OpenApi)]
    #[openapi(
        paths(health, version, state, classify_at, holidays, get_config, events),
        tags((name = "timeblock", description = "Tariff time-block sensor API"))
    )]
    pub struct ApiDoc;
}

#[cfg(feature = "openapi")]
pub(crate) async fn get_config_schema() -> impl IntoResponse {
    let schema = schemars::schema_for!(crate::config::Config);
    Json(serde_json::to_value(&schema).unwrap_or_default())
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/api/health", get(health))
        .route("/api/version", get(version))
        .route("/api/state", get(self::state))
        .route("/api/classify", get(classify_at))
        .route("/api/holidays", get(holidays))
        .route("/api/config", get(get_config))
        .route("/api/events", get(events));

    #[cfg(feature = "openapi")]
    let router = {
        use utoipa::OpenApi;
        router
            .route("/api/config/schema", get(get_config_schema))
            .merge(
                utoipa_swagger_ui::SwaggerUi::new("/docs")
                    .url("/openapi.json", openapi::ApiDoc::openapi()),
            )
    };

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state_rx: StateReceiver, config: Arc<Config>) -> Result<()> {
    let host = config.web.host.clone();
    let port = config.web.port;
    let router = build_router(AppState { state_rx, config });

    // Structured logs for web server startup and binding
    let logger = crate::logging::get_logger("web");
    logger.info(&format!(
        "Starting web server; requested host={host}, port={port}"
    ));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!("Invalid host '{host}'; falling back to 127.0.0.1"));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TimeBlockError::web(format!("Failed to bind {addr}: {e}")))?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{} (API /api)",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router)
        .await
        .map_err(|e| TimeBlockError::web(format!("Server stopped: {e}")))
}
