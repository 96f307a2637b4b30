//! JSON extractor with unified rejection.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use common::AppError;

/// JSON extractor that reports malformed bodies as `AppError::BadRequest`.
///
/// Field rules are enforced by the account service, not here.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            debug!("Rejected request body: {}", e.body_text());
            AppError::bad_request(e.body_text())
        })?;

        Ok(JsonBody(value))
    }
}
