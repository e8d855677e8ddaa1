//! Error types and handling for the MCP server.
//!
//! This module defines the process-level error type. Invocation failures never
//! reach it: they are turned into response envelopes by the dispatcher. What
//! remains is startup and transport failure.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Registration or schema construction failed at startup.
    #[error("Registry error: {0}")]
    Registry(#[from] super::dispatch::DispatchError),

    /// The transport failed to start or stopped with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
