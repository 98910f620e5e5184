/**
 * Error Conversion
 *
 * `BackendError` implements `IntoResponse`, so handlers can return it
 * directly. Error responses are JSON:
 *
 * ```json
 * { "error": "Failed to add group", "status": 404 }
 * ```
 */
use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
