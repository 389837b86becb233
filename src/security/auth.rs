//! Bearer token verification.

use axum::http::HeaderValue;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::fmt;

use crate::config::AuthConfig;
use crate::format::{format_date_time, from_unix, shorten_address};
use crate::security::error::GateError;

/// Decoded token payload. Attached to forwarded requests as an extension.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims(pub Map<String, Value>);

impl Claims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Compact one-line description for logs.
    pub fn summary(&self) -> ClaimsSummary<'_> {
        ClaimsSummary(self)
    }
}

pub struct ClaimsSummary<'a>(&'a Claims);

impl fmt::Display for ClaimsSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let claims = self.0;
        let subject = ["address", "sub"]
            .iter()
            .find_map(|key| claims.get(key).and_then(Value::as_str));

        match subject {
            Some(s) => match shorten_address(s, 6) {
                Some(short) => write!(f, "subject={}", short)?,
                None => write!(f, "subject={}", s)?,
            },
            None => write!(f, "subject=-")?,
        }

        if let Some(exp) = claims
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(from_unix)
        {
            write!(f, " expires=\"{}\"", format_date_time(&exp))?;
        }
        write!(f, " claims={}", claims.0.len())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The token is the first space-separated segment after the prefix.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, GateError> {
    let value = header
        .and_then(|h| h.to_str().ok())
        .ok_or(GateError::MissingBearer)?;
    let rest = value.strip_prefix("Bearer ").ok_or(GateError::MissingBearer)?;
    Ok(rest.split(' ').next().unwrap_or_default())
}

/// Verifies HMAC-signed tokens against the shared secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = leeway_secs;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        // exp/nbf are checked when present but no claim is mandatory.
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.leeway_secs)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, GateError> {
        let data = decode::<Map<String, Value>>(token, &self.key, &self.validation)
            .map_err(GateError::InvalidToken)?;
        Ok(Claims(data.claims))
    }
}
