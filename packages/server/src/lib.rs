//! Folio HTTP server
//!
//! Exposes the `folio-core` services as a JSON API for a browser front end.
//! See [`api`] for the routes and [`state::AppState`] for backend wiring.

pub mod api;
pub mod state;

pub use api::{create_router, HttpError};
pub use state::AppState;

use folio_core::FolioConfig;

/// Bind and serve until the process is stopped
///
/// # Errors
///
/// Returns error if the backend cannot be wired or the server fails to bind.
pub async fn start_server(config: FolioConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = create_router(state, &config.server.cors_origins);

    let addr = format!("127.0.0.1:{}", config.server.port);
    tracing::info!("Folio API listening on http://{}", addr);
    tracing::info!("CORS origins: {:?}", config.server.cors_origins);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
