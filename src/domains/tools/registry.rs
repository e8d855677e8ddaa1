//! Tool registration.
//!
//! When adding a new tool:
//! 1. Create the tool file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `register_tools()`

use std::sync::Arc;

use rmcp::model::Tool;

use crate::core::config::Config;
use crate::core::dispatch::{DispatchError, OperationKind, Registry, RegistryEntry};

use super::definitions::{
    CalculatorTool, GenerateImageTool, GetTimeTool, GreetingTool, ToolDefinition,
};
use super::inference::{ImageGenerator, InferenceTransport};

/// Build a registry entry from a tool definition.
fn build_entry<T: ToolDefinition>(tool: T) -> Result<RegistryEntry, DispatchError> {
    Ok(RegistryEntry::new(
        OperationKind::Tool,
        T::NAME,
        T::DESCRIPTION,
        T::schema()?,
        Arc::new(tool),
    ))
}

/// Register every tool.
///
/// `transport` is the outbound path used by `generate_image`.
pub fn register_tools(
    registry: &mut Registry,
    config: &Config,
    transport: Arc<dyn InferenceTransport>,
) -> Result<(), DispatchError> {
    let generator = ImageGenerator::new(
        config.credentials.clone(),
        config.image_generation.clone(),
        transport,
    );

    registry.register(build_entry(GreetingTool)?)?;
    registry.register(build_entry(CalculatorTool)?)?;
    registry.register(build_entry(GetTimeTool::new())?)?;
    registry.register(build_entry(GenerateImageTool::new(Arc::new(generator)))?)?;
    Ok(())
}

/// All registered tools as MCP `Tool` models, in registration order.
pub fn tool_models(registry: &Registry) -> Vec<Tool> {
    registry
        .entries(OperationKind::Tool)
        .map(|entry| Tool {
            name: entry.name.clone().into(),
            description: Some(entry.description.clone().into()),
            input_schema: Arc::new(entry.schema.to_json_schema()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: entry.title.clone(),
        })
        .collect()
}
