//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! configuration, the operation registry and dispatcher, error handling, the
//! server handler and the stdio transport.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::StdioTransport;
