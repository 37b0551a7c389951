use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gatewayctl_common::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body shared by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i32,
    pub msg: String,
    pub data: Value,
}

/// `code = 0`, HTTP 200. A `null` payload is sent as `{}`.
pub fn success(data: impl Serialize) -> Response {
    let data = match serde_json::to_value(data) {
        Ok(Value::Null) => Value::Object(serde_json::Map::new()),
        Ok(value) => value,
        Err(e) => {
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                e.to_string(),
            )
        }
    };

    let body = Envelope {
        code: ErrorCode::Success.code(),
        msg: ErrorCode::Success.default_message().to_string(),
        data,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Error envelope with an empty `data` object.
pub fn failure(status: StatusCode, code: ErrorCode, msg: impl Into<String>) -> Response {
    let body = Envelope {
        code: code.code(),
        msg: msg.into(),
        data: Value::Object(serde_json::Map::new()),
    };
    (status, Json(body)).into_response()
}

/// Malformed request body or parameters.
pub fn bad_request() -> Response {
    failure(
        StatusCode::BAD_REQUEST,
        ErrorCode::BadRequest,
        ErrorCode::BadRequest.default_message(),
    )
}
