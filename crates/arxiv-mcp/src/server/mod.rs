//! MCP server implementation.
//!
//! Provides both stdio (for desktop MCP clients) and streamable HTTP
//! transports. Both route messages through one [`protocol::Dispatcher`].

pub mod protocol;
pub mod session;
pub mod stdio;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::ArxivClient;
use crate::config::Config;
use crate::tools::{self, ToolContext};

use protocol::Dispatcher;
use session::SessionStore;

/// MCP server for arXiv.
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server with every tool registered.
    #[must_use]
    pub fn new(client: ArxivClient, config: Config) -> Self {
        let ctx = ToolContext::new(Arc::new(client), Arc::new(config));
        Self {
            dispatcher: Dispatcher::new(tools::register_all_tools(), ctx),
        }
    }

    /// Consume the server, keeping only its dispatcher.
    #[must_use]
    pub fn into_dispatcher(self) -> Dispatcher {
        self.dispatcher
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!(tools = self.dispatcher.tools().len(), "Starting MCP server in stdio mode");
        stdio::run_stdio(self.dispatcher).await
    }

    /// Run the server in streamable HTTP mode until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound or the server fails.
    pub async fn run_http(self, addr: SocketAddr) -> anyhow::Result<()> {
        tracing::info!(tools = self.dispatcher.tools().len(), "Starting MCP server in HTTP mode");

        let sessions = SessionStore::new();
        let cleanup = sessions.spawn_cleanup();
        let router = transport::create_router(self.dispatcher, sessions);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on http://{}/mcp", listener.local_addr()?);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        cleanup.abort();
        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").field("tools", &self.dispatcher.tools().len()).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
