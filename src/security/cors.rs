//! Origin allow-list and preflight responses.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use std::collections::HashSet;

use crate::config::CorsConfig;
use crate::security::error::GateError;

/// Origin policy built from [`CorsConfig`] for the active environment.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: HashSet<String>,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
}

impl OriginPolicy {
    pub fn from_config(config: &CorsConfig) -> Result<Self, header::InvalidHeaderValue> {
        Ok(Self {
            allowed: config.active_origins().iter().cloned().collect(),
            allow_methods: HeaderValue::from_str(&config.allowed_methods)?,
            allow_headers: HeaderValue::from_str(&config.allowed_headers)?,
        })
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed.contains(origin)
    }

    /// Reject a present origin that is not on the allow-list.
    ///
    /// Requests without an `Origin` header pass.
    pub fn check(&self, origin: Option<&HeaderValue>) -> Result<(), GateError> {
        match origin {
            None => Ok(()),
            Some(value) => match value.to_str() {
                Ok(origin) if self.is_allowed(origin) => Ok(()),
                _ => Err(GateError::OriginBlocked),
            },
        }
    }

    /// Empty 204 answer to a preflight request.
    pub fn preflight(&self, origin: Option<&HeaderValue>) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;

        let headers = response.headers_mut();
        if let Some(origin) = origin {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            self.allow_methods.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            self.allow_headers.clone(),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn policy(env: Environment) -> OriginPolicy {
        let config = CorsConfig {
            environment: env,
            ..CorsConfig::default()
        };
        OriginPolicy::from_config(&config).unwrap()
    }

    #[test]
    fn test_missing_origin_passes() {
        assert!(policy(Environment::Production).check(None).is_ok());
    }

    #[test]
    fn test_allow_list_depends_on_environment() {
        let local = HeaderValue::from_static("http://localhost:3000");

        assert!(policy(Environment::Development).check(Some(&local)).is_ok());
        assert!(matches!(
            policy(Environment::Production).check(Some(&local)),
            Err(GateError::OriginBlocked)
        ));
    }

    #[test]
    fn test_origin_match_is_exact() {
        let p = policy(Environment::Development);
        let variant = HeaderValue::from_static("http://localhost:3000/");
        assert!(p.check(Some(&variant)).is_err());
    }

    #[test]
    fn test_preflight_headers() {
        let p = policy(Environment::Development);
        let origin = HeaderValue::from_static("http://localhost:3000");

        let response = p.preflight(Some(&origin));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );

        let response = p.preflight(None);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
