//! Resource registration.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `register_resources()`

use std::sync::Arc;

use rmcp::model::{AnnotateAble, RawResource, Resource};

use crate::core::config::Config;
use crate::core::dispatch::{
    DispatchError, OperationKind, Registry, RegistryEntry, SchemaDescriptor,
};

use super::definitions::{ResourceDefinition, ServerInfoResource};

/// Build a registry entry from a resource definition, keyed by its URI.
fn build_entry<R: ResourceDefinition>(resource: R) -> RegistryEntry {
    RegistryEntry::new(
        OperationKind::Resource,
        R::URI,
        R::DESCRIPTION,
        SchemaDescriptor::empty(),
        Arc::new(resource),
    )
    .with_title(R::NAME)
    .with_mime_type(R::MIME_TYPE)
}

/// Register every resource.
///
/// Tools must already be registered; `server://info` lists them.
pub fn register_resources(registry: &mut Registry, config: &Config) -> Result<(), DispatchError> {
    let server_info = ServerInfoResource::new(
        config.server.name.clone(),
        config.server.version.clone(),
        registry.names(OperationKind::Tool),
    );

    registry.register(build_entry(server_info))?;
    Ok(())
}

/// All registered resources as MCP `Resource` models.
pub fn resource_models(registry: &Registry) -> Vec<Resource> {
    registry
        .entries(OperationKind::Resource)
        .map(|entry| {
            let name = entry.title.clone().unwrap_or_else(|| entry.name.clone());
            let mut raw = RawResource::new(entry.name.clone(), name);
            raw.description = Some(entry.description.clone());
            raw.mime_type = entry.mime_type.clone();
            raw.no_annotation()
        })
        .collect()
}
