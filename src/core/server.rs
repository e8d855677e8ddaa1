//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler. It implements the MCP
//! protocol by turning every request into a dispatcher invocation and every
//! response envelope back into protocol data.
//!
//! Operations are registered in `domains/`; adding a tool, resource or prompt
//! does not require modifying this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::dispatch::{ContentBlock, DispatchError, Dispatcher, OperationKind, ResponseEnvelope};
use super::error::Result;
use crate::domains::{
    build_registry,
    prompts::prompt_models,
    resources::resource_models,
    tools::{
        inference::{HttpInferenceTransport, InferenceTransport},
        tool_models,
    },
};

/// The main MCP server handler.
///
/// Cheap to clone; all clones share one frozen registry.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Routes invocations to registered handlers.
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server that calls the configured inference provider over HTTP.
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpInferenceTransport::new(config.image_generation.base_url.clone());
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a new MCP server with an explicit inference transport.
    pub fn with_transport(config: Config, transport: Arc<dyn InferenceTransport>) -> Result<Self> {
        let registry = build_registry(&config, transport)?;
        info!(
            "Registered {} tool(s), {} resource(s), {} prompt(s)",
            registry.names(OperationKind::Tool).len(),
            registry.names(OperationKind::Resource).len(),
            registry.names(OperationKind::Prompt).len(),
        );

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(Arc::new(registry)),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Run a tool. Failures come back as `is_error` results, never as protocol errors.
    pub async fn invoke_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        self.dispatcher
            .invoke(OperationKind::Tool, name, arguments.unwrap_or_default())
            .await
            .into_call_tool_result(name)
    }

    /// Read a resource by URI.
    pub async fn read_resource_contents(
        &self,
        uri: &str,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        let mime_type = self
            .dispatcher
            .registry()
            .lookup(OperationKind::Resource, uri)
            .ok()
            .and_then(|entry| entry.mime_type.clone());

        match self
            .dispatcher
            .invoke(OperationKind::Resource, uri, JsonObject::new())
            .await
        {
            ResponseEnvelope::Success(blocks) => Ok(ReadResourceResult {
                contents: blocks
                    .into_iter()
                    .map(|block| block.into_resource_contents(uri, mime_type.as_deref()))
                    .collect(),
            }),
            ResponseEnvelope::Failure(err) => Err(to_mcp_error(err)),
        }
    }

    /// Render a prompt into a single user message.
    pub async fn render_prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<GetPromptResult, McpError> {
        let description = self
            .dispatcher
            .registry()
            .lookup(OperationKind::Prompt, name)
            .ok()
            .map(|entry| entry.description.clone());

        let blocks = match self
            .dispatcher
            .invoke(OperationKind::Prompt, name, arguments.unwrap_or_default())
            .await
        {
            ResponseEnvelope::Success(blocks) => blocks,
            ResponseEnvelope::Failure(err) => return Err(to_mcp_error(err)),
        };

        let messages = blocks
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => {
                    Ok(PromptMessage::new_text(PromptMessageRole::User, text))
                }
                other => Err(McpError::internal_error(
                    format!("prompt '{}' produced a {} block", name, other.kind()),
                    None,
                )),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(GetPromptResult {
            description,
            messages,
        })
    }
}

/// Map a resource or prompt failure to MCP error data.
fn to_mcp_error(err: DispatchError) -> McpError {
    match &err {
        DispatchError::UnknownOperation {
            kind: OperationKind::Resource,
            ..
        } => McpError::resource_not_found(err.to_string(), None),
        DispatchError::UnknownOperation { .. } | DispatchError::Validation(_) => {
            McpError::invalid_params(err.to_string(), None)
        }
        _ => McpError::internal_error(err.to_string(), None),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Starter MCP server: greeting, calculator, get_time and generate_image tools, \
                 a server://info resource and a code_review prompt."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: tool_models(self.dispatcher.registry()),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self.invoke_tool(&request.name, request.arguments).await)
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: resource_models(self.dispatcher.registry()),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.read_resource_contents(&request.uri).await
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        Ok(ListPromptsResult {
            prompts: prompt_models(self.dispatcher.registry()),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        self.render_prompt(&request.name, request.arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::inference::testing::{FakeTransport, Reply, with_token};
    use serde_json::json;

    fn server() -> McpServer {
        let transport = FakeTransport::new(Reply::Image(b"PNG".to_vec()));
        McpServer::with_transport(Config::default(), transport).unwrap()
    }

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn first_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[tokio::test]
    async fn test_calculator_round_trip() {
        let result = server()
            .invoke_tool("calculator", args(json!({"operation": "add", "a": 2, "b": 3})))
            .await;
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(first_text(&result), "2 + 3 = 5");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let result = server().invoke_tool("nonexistent", None).await;
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(first_text(&result), "Unknown tool: nonexistent");
    }

    #[tokio::test]
    async fn test_validation_failure_names_field() {
        let result = server()
            .invoke_tool("greeting", args(json!({"language": "fr"})))
            .await;
        assert!(result.is_error.unwrap_or(false));
        let text = first_text(&result);
        assert!(text.contains("'name'"));
        assert!(text.contains("'language'"));
    }

    #[tokio::test]
    async fn test_generate_image_without_token() {
        let transport = FakeTransport::new(Reply::Image(b"PNG".to_vec()));
        let server = McpServer::with_transport(Config::default(), transport.clone()).unwrap();

        let result = server
            .invoke_tool("generate_image", args(json!({"prompt": "a boat"})))
            .await;
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_image_with_token() {
        let mut config = Config::default();
        config.credentials = with_token();
        let transport = FakeTransport::new(Reply::Image(b"PNG".to_vec()));
        let server = McpServer::with_transport(config, transport).unwrap();

        let result = server
            .invoke_tool("generate_image", args(json!({"prompt": "a boat"})))
            .await;
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.content.len(), 1);
        match &result.content[0].raw {
            RawContent::Image(image) => assert_eq!(image.mime_type, "image/png"),
            _ => panic!("Expected image content"),
        }
    }

    #[tokio::test]
    async fn test_read_server_info() {
        let result = server().read_resource_contents("server://info").await.unwrap();
        assert_eq!(result.contents.len(), 1);
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                mime_type, text, ..
            } => {
                assert_eq!(mime_type.as_deref(), Some("application/json"));
                let json: serde_json::Value = serde_json::from_str(text).unwrap();
                assert_eq!(json["tools"][0], "greeting");
            }
            _ => panic!("Expected text resource"),
        }
    }

    #[tokio::test]
    async fn test_read_unknown_resource() {
        let err = server()
            .read_resource_contents("server://missing")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_render_code_review_prompt() {
        let result = server()
            .render_prompt("code_review", args(json!({"code": "x = 1", "language": "python"})))
            .await
            .unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].role, PromptMessageRole::User);
        match &result.messages[0].content {
            PromptMessageContent::Text { text } => assert!(text.contains("x = 1")),
            _ => panic!("Expected text message"),
        }
    }

    #[tokio::test]
    async fn test_prompt_missing_argument() {
        let err = server().render_prompt("code_review", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_server_info() {
        let server = server();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "starter-mcp-server");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_some());
    }
}
