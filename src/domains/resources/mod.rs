//! Resources domain module.
//!
//! Resources represent data that MCP clients can read by URI.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `registry.rs` - Central resource registration and MCP resource models
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait and `Handler`
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod registry;

pub use definitions::ResourceDefinition;
pub use registry::{register_resources, resource_models};
