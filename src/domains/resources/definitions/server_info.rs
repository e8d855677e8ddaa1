//! Server info resource definition.

use async_trait::async_trait;
use serde::Serialize;

use super::ResourceDefinition;
use crate::core::dispatch::{ArgumentRecord, DispatchError, Handler, HandlerOutput};

/// Server information resource.
///
/// Snapshot of the server identity and its tool names, taken at registration.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfoResource {
    name: String,
    version: String,
    description: String,
    tools: Vec<String>,
}

impl ServerInfoResource {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        tools: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: env!("CARGO_PKG_DESCRIPTION").to_string(),
            tools: tools.into_iter().map(Into::into).collect(),
        }
    }
}

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "server://info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str = "Information about this MCP server and its tools";
    const MIME_TYPE: &'static str = "application/json";
}

#[async_trait]
impl Handler for ServerInfoResource {
    async fn handle(&self, _args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
        serde_json::to_string_pretty(self)
            .map(Into::into)
            .map_err(|e| DispatchError::internal(e.to_string()))
    }
}
