/**
 * JSON Body Extraction
 *
 * Wraps axum's `Json` extractor so a body that is missing, not JSON or of the
 * wrong shape is answered like every other board error: 400 with the generic
 * `{ "error", "status" }` body. The deserializer's message is only logged.
 */
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;
use crate::shared::error::BoardError;

pub const INVALID_BODY: &str = "Invalid request body";

/// Axum extractor for a JSON request body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(BackendError::operation(
                INVALID_BODY,
                BoardError::validation("payload", rejection.body_text()),
            )),
        }
    }
}
