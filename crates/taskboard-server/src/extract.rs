//! Extractors that run the validation layer before a handler sees the
//! request. Both reject with [`ApiError::Validation`].

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use serde_json::{Map, Value};
use taskboard_core::validation;
use taskboard_core::{TaskId, ValidationError};

use crate::error::ApiError;

/// Largest request body the server will buffer, in bytes.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// `{id}` path segment parsed as an integer task id.
#[derive(Debug, Clone, Copy)]
pub struct TaskIdParam(pub TaskId);

impl<S> FromRequestParts<S> for TaskIdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationError::InvalidId)?;
        Ok(Self(validation::parse_id(&raw)?))
    }
}

/// Request body as untyped JSON. An empty body reads as `{}`.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge
            } else {
                ValidationError::MalformedBody(e.body_text()).into()
            }
        })?;
        parse_body(&bytes).map(Self).map_err(ApiError::from)
    }
}

fn parse_body(bytes: &[u8]) -> Result<Value, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|e| ValidationError::MalformedBody(e.to_string()))
}
