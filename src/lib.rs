//! Starter MCP Server Library
//!
//! A small Model Context Protocol (MCP) server built around one idea: every
//! tool, resource and prompt is a registered entry with a declared argument
//! schema, and every invocation goes through a single dispatcher that
//! validates arguments, runs the handler and returns a uniform envelope.
//!
//! # Architecture
//!
//! - **core**: configuration, dispatch (registry, validator, dispatcher,
//!   envelopes), errors, the MCP server handler and the stdio transport
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: `greeting`, `calculator`, `get_time`, `generate_image`
//!   - **resources**: `server://info`
//!   - **prompts**: `code_review`
//!
//! # Example
//!
//! ```rust,no_run
//! use starter_mcp_server::core::{Config, McpServer, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config)?;
//!     StdioTransport::run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
