//! The handler capability shared by tools, resources and prompts.

use async_trait::async_trait;

use super::envelope::ContentBlock;
use super::error::DispatchError;
use super::validator::ArgumentRecord;

/// What a handler hands back on success.
///
/// The dispatcher normalizes this into content blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    /// A bare text value.
    Text(String),

    /// Explicit content blocks.
    Blocks(Vec<ContentBlock>),
}

impl From<String> for HandlerOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for HandlerOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ContentBlock> for HandlerOutput {
    fn from(block: ContentBlock) -> Self {
        Self::Blocks(vec![block])
    }
}

/// A unit of business logic bound to one registered name.
///
/// Handlers return errors instead of building failure envelopes.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError>;
}
