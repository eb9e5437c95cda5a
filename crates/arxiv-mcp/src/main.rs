//! arXiv MCP Server - Entry Point
//!
//! Provides both stdio (for desktop MCP clients) and streamable HTTP transports.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_mcp::{ArxivClient, config::Config, server::McpServer};

#[derive(Parser, Debug)]
#[command(name = "arxiv-mcp")]
#[command(about = "MCP server for the arXiv API")]
#[command(version)]
struct Cli {
    /// Transport mode: stdio or streamable-http
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// HTTP server port (only used with --transport streamable-http)
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// HTTP bind address
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// Directory for images saved by get_image
    #[arg(long, env = "ARXIV_MCP_IMAGE_DIR")]
    image_dir: Option<PathBuf>,

    /// Directory containing API.md and WORKFLOW.md
    #[arg(long, env = "ARXIV_MCP_DOCS_DIR")]
    docs_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// Streamable HTTP with Server-Sent Events
    StreamableHttp,
}

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        "Starting arXiv MCP server"
    );

    let config = Config::new(cli.image_dir, cli.docs_dir);
    tracing::debug!(
        image_dir = %config.image_dir.display(),
        docs_dir = %config.docs_dir.display(),
        "Loaded configuration"
    );

    let client = ArxivClient::new(&config)?;
    let server = McpServer::new(client, config);

    match cli.transport {
        Transport::Stdio => server.run_stdio().await?,
        Transport::StreamableHttp => {
            let addr = SocketAddr::new(cli.host, cli.port);
            tracing::info!(%addr, "Running in HTTP mode");
            server.run_http(addr).await?;
        }
    }

    Ok(())
}
