//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain registers its operations into the shared
//! [`Registry`](crate::core::dispatch::Registry).

pub mod prompts;
pub mod resources;
pub mod tools;

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::dispatch::{DispatchError, Registry};
use tools::inference::InferenceTransport;

/// Build the full registry: tools, then resources, then prompts.
pub fn build_registry(
    config: &Config,
    transport: Arc<dyn InferenceTransport>,
) -> Result<Registry, DispatchError> {
    let mut registry = Registry::new();
    tools::register_tools(&mut registry, config, transport)?;
    resources::register_resources(&mut registry, config)?;
    prompts::register_prompts(&mut registry)?;
    Ok(registry)
}
