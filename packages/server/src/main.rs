//! Folio HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! # In-memory backend on port 3001
//! cargo run -p folio-server
//!
//! # Hosted backend
//! FOLIO_BACKEND=firebase FOLIO_PROJECT_ID=my-project \
//!   FOLIO_STORAGE_BUCKET=my-project.appspot.com FOLIO_API_KEY=... \
//!   cargo run -p folio-server
//! ```
//!
//! # Environment Variables
//!
//! - `FOLIO_CONFIG`: Path to a JSON config file (default: ~/.folio/config.json)
//! - `FOLIO_*`: Per-setting overrides, see `FolioConfig`
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use folio_core::FolioConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = FolioConfig::load()?;
    tracing::info!("Backend: {:?}", config.backend);

    folio_server::start_server(config).await
}
