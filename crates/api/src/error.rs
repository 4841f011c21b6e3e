use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Handler error wrapper mapping `common::Error` onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub common::Error);

impl From<common::Error> for ApiError {
    fn from(e: common::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            warn!(error = %self.0, "Request rejected");
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self.0, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
