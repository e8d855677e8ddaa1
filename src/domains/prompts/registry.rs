//! Prompt registration.
//!
//! When adding a new prompt:
//! 1. Create the prompt file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `register_prompts()`

use std::sync::Arc;

use rmcp::model::Prompt;

use crate::core::dispatch::{DispatchError, OperationKind, Registry, RegistryEntry};

use super::definitions::{CodeReviewPrompt, PromptDefinition};
use super::templates::PromptTemplate;

/// Build a registry entry from a prompt definition.
fn build_entry<P: PromptDefinition>() -> Result<RegistryEntry, DispatchError> {
    Ok(RegistryEntry::new(
        OperationKind::Prompt,
        P::NAME,
        P::DESCRIPTION,
        P::schema()?,
        Arc::new(PromptTemplate::new(P::template())),
    ))
}

/// Register every prompt.
pub fn register_prompts(registry: &mut Registry) -> Result<(), DispatchError> {
    registry.register(build_entry::<CodeReviewPrompt>()?)?;
    Ok(())
}

/// All registered prompts as MCP `Prompt` models.
pub fn prompt_models(registry: &Registry) -> Vec<Prompt> {
    registry
        .entries(OperationKind::Prompt)
        .map(|entry| Prompt {
            name: entry.name.clone(),
            title: entry.title.clone(),
            description: Some(entry.description.clone()),
            arguments: Some(entry.schema.to_prompt_arguments()),
            icons: None,
            meta: None,
        })
        .collect()
}
