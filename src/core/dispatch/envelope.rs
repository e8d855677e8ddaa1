//! Response envelopes and content blocks.
//!
//! An envelope is either a list of content blocks or a single error, never
//! both. Conversions into `rmcp` result types live here so the rest of the
//! dispatch layer stays protocol-agnostic.

use rmcp::model::{
    AnnotateAble, CallToolResult, Content, RawContent, ResourceContents, Role,
};

use super::error::DispatchError;

/// Who a content block is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    User,
    Assistant,
}

/// Client-side rendering hints.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockAnnotations {
    pub audience: Vec<Audience>,
    pub priority: f32,
}

/// A self-describing piece of response content.
///
/// Binary payloads are always base64 text with an explicit MIME type.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Binary {
        data: String,
        mime_type: String,
    },
    Image {
        data: String,
        mime_type: String,
        annotations: Option<BlockAnnotations>,
    },
}

impl ContentBlock {
    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Kind tag, as seen by clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Binary { .. } => "binary",
            Self::Image { .. } => "image",
        }
    }

    /// MIME type for binary and image blocks.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => None,
            Self::Binary { mime_type, .. } | Self::Image { mime_type, .. } => Some(mime_type),
        }
    }

    /// Convert into an MCP tool content item.
    ///
    /// `uri` names the embedded resource for binary blocks.
    pub fn into_content(self, uri: &str) -> Content {
        match self {
            Self::Text { text } => Content::text(text),
            Self::Binary { data, mime_type } => {
                Content::resource(ResourceContents::BlobResourceContents {
                    uri: uri.to_string(),
                    mime_type: Some(mime_type),
                    blob: data,
                    meta: None,
                })
            }
            Self::Image {
                data,
                mime_type,
                annotations,
            } => {
                let raw = RawContent::image(data, mime_type);
                match annotations {
                    Some(a) => raw
                        .with_audience(a.audience.iter().map(|r| r.to_role()).collect())
                        .with_priority(a.priority),
                    None => raw.no_annotation(),
                }
            }
        }
    }

    /// Convert into MCP resource contents for `resources/read`.
    pub fn into_resource_contents(self, uri: &str, mime_type: Option<&str>) -> ResourceContents {
        match self {
            Self::Text { text } => ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: mime_type.map(str::to_string),
                text,
                meta: None,
            },
            Self::Binary { data, mime_type } | Self::Image { data, mime_type, .. } => {
                ResourceContents::BlobResourceContents {
                    uri: uri.to_string(),
                    mime_type: Some(mime_type),
                    blob: data,
                    meta: None,
                }
            }
        }
    }
}

impl Audience {
    fn to_role(self) -> Role {
        match self {
            Self::User => Role::User,
            Self::Assistant => Role::Assistant,
        }
    }
}

/// The uniform outcome of every invocation.
#[derive(Debug)]
pub enum ResponseEnvelope {
    Success(Vec<ContentBlock>),
    Failure(DispatchError),
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Content blocks, if successful.
    pub fn blocks(&self) -> Option<&[ContentBlock]> {
        match self {
            Self::Success(blocks) => Some(blocks),
            Self::Failure(_) => None,
        }
    }

    /// The error, if failed.
    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    /// Convert into an MCP tool call result.
    ///
    /// Failures become `is_error = true` results carrying the message.
    pub fn into_call_tool_result(self, tool_name: &str) -> CallToolResult {
        match self {
            Self::Success(blocks) => {
                let uri = format!("tool://{}/output", tool_name);
                CallToolResult::success(
                    blocks
                        .into_iter()
                        .map(|block| block.into_content(&uri))
                        .collect(),
                )
            }
            Self::Failure(err) => CallToolResult::error(vec![Content::text(err.to_string())]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_into_call_tool_result() {
        let envelope = ResponseEnvelope::Success(vec![ContentBlock::text("2 + 3 = 5")]);
        let result = envelope.into_call_tool_result("calculator");

        assert!(!result.is_error.unwrap_or(false));
        let text = match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        };
        assert_eq!(text, "2 + 3 = 5");
    }

    #[test]
    fn test_failure_into_call_tool_result() {
        let envelope =
            ResponseEnvelope::Failure(DispatchError::invalid_operation("Cannot divide by zero"));
        let result = envelope.into_call_tool_result("calculator");

        assert!(result.is_error.unwrap_or(false));
        let text = match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        };
        assert!(text.contains("Cannot divide by zero"));
    }

    #[test]
    fn test_image_block_keeps_annotations() {
        let block = ContentBlock::Image {
            data: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
            annotations: Some(BlockAnnotations {
                audience: vec![Audience::User],
                priority: 0.9,
            }),
        };
        assert_eq!(block.kind(), "image");
        assert_eq!(block.mime_type(), Some("image/png"));

        let content = block.into_content("tool://generate_image/output");
        match &content.raw {
            RawContent::Image(image) => {
                assert_eq!(image.mime_type, "image/png");
                assert_eq!(image.data, "aGVsbG8=");
            }
            _ => panic!("Expected image content"),
        }
        let annotations = content.annotations.as_ref().unwrap();
        assert_eq!(annotations.priority, Some(0.9));
    }

    #[test]
    fn test_text_into_resource_contents() {
        let contents = ContentBlock::text("{}")
            .into_resource_contents("server://info", Some("application/json"));
        match contents {
            ResourceContents::TextResourceContents {
                uri,
                mime_type,
                text,
                ..
            } => {
                assert_eq!(uri, "server://info");
                assert_eq!(mime_type.as_deref(), Some("application/json"));
                assert_eq!(text, "{}");
            }
            _ => panic!("Expected text resource contents"),
        }
    }
}
