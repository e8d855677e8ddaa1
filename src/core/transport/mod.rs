//! Transport layer for the MCP server.
//!
//! The server talks to exactly one controlling client over stdio. Framing and
//! JSON-RPC handling are delegated to rmcp; this module only owns the
//! connection lifecycle.

mod error;
pub mod stdio;

pub use error::{TransportError, TransportResult};
pub use stdio::StdioTransport;
