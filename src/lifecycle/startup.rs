//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize metrics when enabled
//! - Load the country registry, exactly once
//! - Bind the listener and hand the registry to the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Steps run in order, not concurrently
//! - Listener binds last, so no request ever sees a missing registry

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{ConfigError, ServiceConfig};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::registry::{LoadError, Registry, RegistrySource};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry load failed: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("Metrics exporter failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// A fully initialized service: registry loaded, listener bound.
pub struct Started {
    server: HttpServer,
    listener: TcpListener,
    registry: Arc<Registry>,
}

impl Started {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Serve requests until shutdown.
    pub async fn serve(self, shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
        self.server.run(self.listener, shutdown).await?;
        Ok(())
    }
}

/// Load the registry from its source and freeze it for sharing.
pub async fn load_registry<S: RegistrySource>(source: &S) -> Result<Arc<Registry>, LoadError> {
    let registry = source.fetch_registry().await?;

    if registry.is_empty() {
        tracing::warn!("Country registry is empty, every query will match nothing");
    }
    metrics::record_registry_size(registry.len());
    tracing::info!(countries = registry.len(), "Country registry loaded");

    Ok(Arc::new(registry))
}

/// Run every startup step up to, but not including, serving traffic.
pub async fn start<S: RegistrySource>(
    config: ServiceConfig,
    source: &S,
) -> Result<Started, StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let registry = load_registry(source).await?;

    let addr = config.listener.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config, registry.clone());

    Ok(Started {
        server,
        listener,
        registry,
    })
}

/// Start the service and serve until the shutdown coordinator fires.
pub async fn run<S: RegistrySource>(
    config: ServiceConfig,
    source: &S,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    let started = start(config, source).await?;
    started.serve(shutdown.subscribe()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Country, StaticRegistrySource};

    fn local_config() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.listener.host = "127.0.0.1".into();
        config.listener.port = 0;
        config
    }

    #[tokio::test]
    async fn test_start_loads_registry_before_binding() {
        let source = StaticRegistrySource::new(vec![Country::new("Chad"), Country::new("Spain")]);
        let started = start(local_config(), &source).await.unwrap();

        assert_eq!(started.registry().len(), 2);
        assert_ne!(started.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_empty_registry_still_starts() {
        let source = StaticRegistrySource::default();
        let started = start(local_config(), &source).await.unwrap();
        assert!(started.registry().is_empty());
    }

    #[tokio::test]
    async fn test_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = local_config();
        config.listener.port = taken.local_addr().unwrap().port();

        let source = StaticRegistrySource::default();
        let err = start(config, &source).await.err().unwrap();
        assert!(matches!(err, StartupError::Bind { .. }));
    }
}
