//! Prompts domain module.
//!
//! Prompts are template messages that can be customized with arguments and
//! used to generate consistent interactions with language models.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual prompt definitions (one file per prompt)
//! - `registry.rs` - Central prompt registration and MCP prompt models
//! - `templates.rs` - Template rendering engine
//!
//! ## Adding a New Prompt
//!
//! 1. Create a new file in `definitions/` (e.g., `my_prompt.rs`)
//! 2. Implement the `PromptDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod registry;
pub mod templates;

pub use definitions::PromptDefinition;
pub use registry::{prompt_models, register_prompts};
pub use templates::PromptTemplate;
