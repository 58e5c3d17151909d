//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on an already-bound listener until shutdown

use axum::{body::Body, http::Request, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers::{health, letters_json, letters_page};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::registry::Registry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; never mutated.
    pub registry: Arc<Registry>,
}

/// HTTP server for the letters service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over an already loaded registry.
    pub fn new(config: ServiceConfig, registry: Arc<Registry>) -> Self {
        let state = AppState { registry };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(letters_page))
            .route("/api/countries", get(letters_json))
            .route("/healthz", get(health))
            .fallback(letters_page)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %request_id(req),
                            method = %req.method(),
                            uri = %req.uri(),
                        )
                    }))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for Ctrl+C or an internal shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}
