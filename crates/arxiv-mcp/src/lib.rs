//! arXiv MCP Server
//!
//! A Model Context Protocol (MCP) server for the arXiv API. Lets LLM agents
//! search arXiv, read papers as HTML, download PDFs and fetch figures.
//!
//! # Features
//!
//! - **Pre-flight validation**: `send_query` strings are checked against the
//!   arXiv query grammar before any request is made, with messages that name
//!   the offending parameter
//! - **4 MCP Tools**: `send_query`, `download_paper`, `read_online`, `get_image`
//! - **2 Resources**: API syntax and agent workflow guides
//! - **Polite**: query calls are spaced three seconds apart and cached for five minutes
//!
//! # Example
//!
//! ```no_run
//! use arxiv_mcp::{client::ArxivClient, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = ArxivClient::new(&config)?;
//!
//!     let feed = client.query("search_query=ti:quantum&max_results=5").await?;
//!     println!("{feed}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod resources;
pub mod server;
pub mod tools;
pub mod validation;

pub use client::ArxivClient;
pub use config::Config;
pub use error::{ClientError, ToolError, ValidationError};
pub use validation::{ValidatedParams, validate_query};
