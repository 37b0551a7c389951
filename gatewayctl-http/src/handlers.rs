//! HTTP handlers for the plugin API.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gatewayctl_common::ErrorCode;
use gatewayctl_core::RegistrationError;
use serde::Serialize;

use crate::models::{parse_extra, RegisterRequest, UnregisterRequest};
use crate::response::{bad_request, failure, success};
use crate::server::ApiState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Maps a workflow error onto the envelope. Handled errors keep HTTP 200;
/// only bodies that fail to parse get HTTP 400 (see [`bad_request`]).
fn error_response(err: &RegistrationError) -> Response {
    failure(StatusCode::OK, err.code(), err.to_string())
}

/// Register a plugin.
///
/// POST /plugins/register
pub async fn register_plugin(
    State(state): State<ApiState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("rejected register body: {}", e);
            return bad_request();
        }
    };

    let extra = match parse_extra(body.extra) {
        Ok(extra) => extra,
        Err(reason) => {
            return error_response(&RegistrationError::BadRequest(reason));
        }
    };

    match state.service.register(&body.id, extra).await {
        Ok(registered) => success(registered),
        Err(e) => error_response(&e),
    }
}

/// Unregister a plugin.
///
/// POST /plugins/unregister
pub async fn unregister_plugin(
    State(state): State<ApiState>,
    body: Result<Json<UnregisterRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("rejected unregister body: {}", e);
            return bad_request();
        }
    };

    match state.service.unregister(&body.id).await {
        Ok(()) => success(()),
        Err(e) => error_response(&e),
    }
}

/// List active plugin ids.
///
/// GET /plugins/list
pub async fn list_plugins(State(state): State<ApiState>) -> Response {
    match state.service.list().await {
        Ok(ids) => success(ids),
        Err(e) => error_response(&e),
    }
}

/// Get an active plugin.
///
/// GET /plugins/{id}
pub async fn get_plugin(
    State(state): State<ApiState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(_) => return bad_request(),
    };

    match state.service.get(&id).await {
        Ok(plugin) => success(plugin),
        Err(e) => error_response(&e),
    }
}

/// Liveness and catalog reachability.
///
/// GET /healthz
pub async fn health_handler(State(state): State<ApiState>) -> Response {
    let healthy = match state.service.catalog().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("catalog ping failed: {}", e);
            false
        }
    };

    let (status, label) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };
    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
        .into_response()
}

/// Prometheus metrics endpoint.
///
/// GET /metrics
pub async fn metrics_handler() -> Response {
    if !gatewayctl_observability::metrics_enabled() {
        return failure(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "metrics are disabled",
        );
    }
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        gatewayctl_observability::gather_metrics(),
    )
        .into_response()
}
