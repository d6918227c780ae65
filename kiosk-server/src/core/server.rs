//! Server Implementation
//!
//! Binds the listener, serves the API and coordinates graceful shutdown.

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::tasks::BackgroundTasks;
use super::{Config, ServerState};
use crate::api;

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = ServerState::initialize(&self.config, CancellationToken::new());

        let mut tasks = BackgroundTasks::with_token(state.shutdown.clone());

        state.start_background_tasks(&mut tasks);

        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let local = listener.local_addr().context("failed to read bound address")?;
        tracing::info!("🖨️ Print server running on http://{}", local);

        let shutdown_token = tasks.shutdown_token();
        let shutdown = async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = shutdown_token.cancelled() => {}
            }
            tracing::info!("Shutting down...");
        };

        let app = api::build_app(state);
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error");

        tasks.shutdown(self.config.shutdown_timeout()).await;
        served
    }
}
