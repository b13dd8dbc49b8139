//! Salesboard dashboard server.
//!
//! Serves the dashboard UI and pushes a fresh snapshot over a WebSocket
//! whenever the user changes a filter.
//!
//! # Architecture
//!
//! The server consists of:
//! - **Session**: Per-connection filter state over the shared base table
//! - **Protocol**: Defines client/server message types
//! - **Routes**: HTTP and WebSocket handlers
//!
//! # Features
//!
//! - `embedded-frontend` (default): Embeds the web UI for standalone use

#[cfg(feature = "embedded-frontend")]
pub mod embedded_frontend;
pub mod error;
pub mod protocol;
pub mod routes;
pub mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use salesboard::DashboardConfig;
use salesboard_core::Dataset;

pub use error::{ServerError, ServerResult};
pub use protocol::{ClientMessage, ServerMessage};
pub use routes::{AppState, create_router};
pub use session::DashboardSession;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Parse `host:port` into a socket address.
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidOperation(format!(
                "Invalid address: {}:{}",
                self.host, self.port
            )))
    }
}

/// Serve the dashboard for `dataset` until Ctrl+C.
pub async fn serve(
    dataset: Arc<Dataset>,
    config: ServerConfig,
    dashboard: DashboardConfig,
) -> ServerResult<()> {
    let addr = config.socket_addr()?;

    let state = Arc::new(AppState::new(dataset, dashboard));
    let app = create_router(state);

    tracing::info!("Starting Salesboard server at http://{}", addr);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Handle Ctrl+C for graceful shutdown
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.socket_addr(), Err(ServerError::InvalidOperation(_))));
    }
}
