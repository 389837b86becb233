//! Gate rejections and their HTTP form.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why the gate refused a request. Every variant ends the request.
#[derive(Debug, Error)]
pub enum GateError {
    /// No token left in the bucket. Carries the request origin to echo back.
    #[error("Too Many Requests")]
    RateLimited { origin: Option<HeaderValue> },

    #[error("Blocked by CORS policy")]
    OriginBlocked,

    #[error("Unauthorized: Missing or invalid Authorization header")]
    MissingBearer,

    #[error("Unauthorized: Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GateError::OriginBlocked => StatusCode::BAD_REQUEST,
            GateError::MissingBearer | GateError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::RateLimited { .. } => "rate_limited",
            GateError::OriginBlocked => "origin_blocked",
            GateError::MissingBearer => "missing_bearer",
            GateError::InvalidToken(_) => "invalid_token",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "message": self.to_string() }));
        let mut response = (status, body).into_response();

        if let GateError::RateLimited { origin } = self {
            let allow_origin = origin.unwrap_or_else(|| HeaderValue::from_static("*"));
            response
                .headers_mut()
                .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        }
        response
    }
}
