//! Country letters service.
//!
//! # Architecture Overview
//!
//! ```text
//!     startup (once)                           per request
//!     ──────────────                           ───────────
//!     config ─▶ registry loader ─▶ Arc<Registry> ◀── letters filter ◀── GET /?letters=
//!                    │                                    │
//!                    ▼                                    ▼
//!            country register (HTTP)              HTML page / JSON
//! ```
//!
//! A failed registry load exits before the listener is bound.

use clap::Parser;
use std::path::PathBuf;

use country_letters::config::{load_config, ObservabilityConfig};
use country_letters::lifecycle::{startup, Shutdown};
use country_letters::observability::logging::init_logging;
use country_letters::registry::HttpRegistrySource;

#[derive(Parser)]
#[command(name = "country-letters")]
#[command(about = "Find the countries whose names contain all the given letters", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    init_logging(&config.observability);
    tracing::info!("country-letters v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        registry_url = %config.registry.url,
        registry_timeout_secs = config.registry.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let source = HttpRegistrySource::new(&config.registry)
        .inspect_err(|e| tracing::error!(error = %e, "Invalid registry source"))?;
    let shutdown = Shutdown::new();

    if let Err(e) = startup::run(config, &source, &shutdown).await {
        tracing::error!(error = %e, "Fatal startup error");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
