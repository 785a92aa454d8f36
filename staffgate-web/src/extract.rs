//! Request extractors
//!
//! JSON extraction with the gateway's own rejection: malformed bodies answer
//! 400 with the standard error envelope instead of axum's default.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::WebError;

/// `Json<T>` with gateway error semantics.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| WebError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
