//! The API request gate.
//!
//! Every request under the API prefix runs through, in order:
//! rate limit → origin check → preflight → route exclusion → bearer token.
//! The first step that decides the request ends it.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::GateConfig;
use crate::observability::metrics;
use crate::routing::{ExactPathMatcher, Matcher, PathPrefixMatcher};
use crate::security::auth::{bearer_token, Claims, TokenVerifier};
use crate::security::cors::OriginPolicy;
use crate::security::error::GateError;
use crate::security::rate_limit::{RateLimiter, TokenBucket};

/// What the gate decided for a request that was not rejected.
pub enum Verdict {
    /// Outside the API prefix; the gate does not apply.
    OutOfScope,
    /// Preflight answered by the gate itself.
    Preflight(Response),
    /// Excluded route, forwarded without authentication.
    Bypass,
    /// Token verified; forward with the decoded claims.
    Authenticated(Claims),
}

impl Verdict {
    fn label(&self) -> &'static str {
        match self {
            Verdict::OutOfScope => "out_of_scope",
            Verdict::Preflight(_) => "preflight",
            Verdict::Bypass => "bypassed",
            Verdict::Authenticated(_) => "forwarded",
        }
    }
}

pub struct Gate {
    scope: PathPrefixMatcher,
    limiter: Arc<dyn RateLimiter>,
    origins: OriginPolicy,
    excluded: ExactPathMatcher,
    verifier: TokenVerifier,
}

impl Gate {
    /// Build a gate with an in-process token bucket.
    pub fn from_config(config: &GateConfig) -> Result<Self, header::InvalidHeaderValue> {
        let limiter = Arc::new(TokenBucket::from_config(&config.rate_limit));
        Self::with_limiter(config, limiter)
    }

    /// Build a gate around an existing limiter.
    pub fn with_limiter(
        config: &GateConfig,
        limiter: Arc<dyn RateLimiter>,
    ) -> Result<Self, header::InvalidHeaderValue> {
        Ok(Self {
            scope: PathPrefixMatcher::new(config.api_prefix.clone()),
            limiter,
            origins: OriginPolicy::from_config(&config.cors)?,
            excluded: ExactPathMatcher::new(config.auth.excluded_set()),
            verifier: TokenVerifier::from_config(&config.auth),
        })
    }

    /// Run the gate steps for one request.
    pub fn evaluate(&self, req: &Request<Body>) -> Result<Verdict, GateError> {
        if !self.scope.matches(req) {
            return Ok(Verdict::OutOfScope);
        }

        let origin = req.headers().get(header::ORIGIN);

        if self.limiter.remove_tokens(1) < 0.0 {
            return Err(GateError::RateLimited {
                origin: origin.cloned(),
            });
        }

        self.origins.check(origin)?;

        if req.method() == Method::OPTIONS {
            return Ok(Verdict::Preflight(self.origins.preflight(origin)));
        }

        if self.excluded.matches(req) {
            return Ok(Verdict::Bypass);
        }

        let token = bearer_token(req.headers().get(header::AUTHORIZATION))?;
        let claims = self.verifier.verify(token)?;
        Ok(Verdict::Authenticated(claims))
    }
}

/// Middleware applying [`Gate`] in front of the wrapped service.
pub async fn gate_middleware(
    State(gate): State<Arc<Gate>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let verdict = match gate.evaluate(&request) {
        Ok(v) => v,
        Err(e) => {
            log_rejection(&request, &e);
            metrics::record_decision(e.kind());
            return e.into_response();
        }
    };
    metrics::record_decision(verdict.label());

    match verdict {
        Verdict::OutOfScope | Verdict::Bypass => next.run(request).await,
        Verdict::Preflight(response) => response,
        Verdict::Authenticated(claims) => {
            tracing::debug!(
                path = %request.uri().path(),
                payload = %claims.summary(),
                "Token verified"
            );
            tracing::trace!(claims = ?claims.0, "Token payload");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
    }
}

fn log_rejection(request: &Request<Body>, error: &GateError) {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .unwrap_or("-");

    match error {
        GateError::RateLimited { .. } => {
            tracing::warn!(path = %request.uri().path(), origin, "Rate limit exceeded")
        }
        GateError::InvalidToken(e) => {
            tracing::warn!(path = %request.uri().path(), error = %e, "Token verification failed")
        }
        other => {
            tracing::info!(path = %request.uri().path(), origin, reason = %other, "Request rejected")
        }
    }
}
