//! Tools domain module.
//!
//! Tools are executable functions that MCP clients call by name.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `inference/` - Outbound adapter for remote image generation
//! - `registry.rs` - Central tool registration and MCP tool models
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Implement `ToolDefinition` and `Handler`
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
pub mod inference;
mod registry;

pub use registry::{register_tools, tool_models};
