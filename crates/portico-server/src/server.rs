//! Server assembly and lifecycle.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::PorticoConfig;
use crate::records::RecordStore;
use crate::routes::{self, AppState};
use crate::{Error, Result};

/// A configured portal server.
pub struct Server {
    config: PorticoConfig,
    state: AppState,
}

impl Server {
    /// Validate `config` and build the shared state.
    ///
    /// A portal layout whose default routes leave their role's portals is
    /// rejected. Roles missing from the permission matrix are only logged;
    /// they fail closed at request time.
    pub fn new(config: PorticoConfig) -> Result<Self> {
        config.validate()?;

        let matrix = config.matrix();
        let missing = matrix.missing_roles();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|r| r.as_str()).collect();
            tracing::warn!(
                roles = %names.join(", "),
                "Permission matrix has no entry for some roles; they will be denied everything"
            );
        }

        let state = AppState {
            matrix: Arc::new(matrix),
            guard: Arc::new(config.route_guard()),
            codec: Arc::new(config.token_codec()),
            directory: Arc::new(config.directory()),
            records: Arc::new(RecordStore::seeded()),
            cookie_name: config.session.cookie_name.clone(),
        };

        Ok(Self { config, state })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &PorticoConfig {
        &self.config
    }

    /// Shared handler state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The guarded application router.
    pub fn router(&self) -> Router {
        routes::router(self.state.clone(), self.config.guard_config())
    }

    /// Bind and serve until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::config(format!("Failed to bind {addr}: {e}")))?;

        if !self.config.guard.enabled {
            tracing::warn!("Route guard disabled; every request passes through unchecked");
        }
        tracing::info!(
            %addr,
            users = self.state.directory.len(),
            "Portico listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
