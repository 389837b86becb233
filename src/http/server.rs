//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health handler and the forwarder
//! - Wire up middleware (gate, timeout, request ID, tracing)
//! - Bind server to listener and shut down gracefully
//! - Forward surviving requests to the upstream API server

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::PathAndQuery, Request, StatusCode, Uri, Version},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GateConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::security::{gate_middleware, Gate};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid CORS header value in configuration: {0}")]
    InvalidHeader(#[from] header::InvalidHeaderValue),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream: Arc<str>,
}

/// HTTP server for the gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
}

impl HttpServer {
    /// Create a new HTTP server with a gate built from the configuration.
    pub fn new(config: GateConfig) -> Result<Self, ServerError> {
        let gate = Arc::new(Gate::from_config(&config)?);
        Ok(Self::with_gate(config, gate))
    }

    /// Create a server around an already-built gate.
    pub fn with_gate(config: GateConfig, gate: Arc<Gate>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            client,
            upstream: Arc::from(config.upstream.address.as_str()),
        };

        let router = Self::build_router(&config, state, gate);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, state: AppState, gate: Arc<Gate>) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .fallback(forward_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(gate, gate_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            api_prefix = %self.config.api_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Forward the request to the upstream and stream the response back.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (mut parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(PathAndQuery::as_str)
        .unwrap_or("/");
    let uri = match format!("http://{}{}", state.upstream, path_and_query).parse::<Uri>() {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(upstream = %state.upstream, error = %e, "Invalid upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream address").into_response();
        }
    };

    tracing::debug!(method = %parts.method, uri = %uri, "Forwarding request");
    parts.uri = uri;
    parts.version = Version::HTTP_11;

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_upstream(response.status().as_u16(), start_time);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(upstream = %state.upstream, error = %e, "Upstream error");
            metrics::record_upstream(StatusCode::BAD_GATEWAY.as_u16(), start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
