//! Tool definitions module.
//!
//! Each tool is defined in its own file with:
//! - Name and description constants
//! - An argument schema
//! - A [`Handler`] implementation
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file (e.g., `my_tool.rs`)
//! 2. Implement `ToolDefinition` and `Handler`
//! 3. Export it here
//! 4. Register in `registry.rs`

pub mod calculator;
pub mod clock;
pub mod generate_image;
pub mod greeting;

pub use calculator::CalculatorTool;
pub use clock::GetTimeTool;
pub use generate_image::GenerateImageTool;
pub use greeting::GreetingTool;

use crate::core::dispatch::{DispatchError, Handler, SchemaDescriptor};

/// Trait for tool definitions.
pub trait ToolDefinition: Handler + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// The arguments this tool accepts.
    fn schema() -> Result<SchemaDescriptor, DispatchError>;
}
