//! Invocation dispatcher.
//!
//! Looks the operation up, validates arguments, runs the handler in a guarded
//! region and normalizes the outcome into a [`ResponseEnvelope`]. It holds no
//! business logic and no mutable state, so concurrent invocations are safe.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::JsonObject;
use tracing::{info, instrument, warn};

use super::envelope::{ContentBlock, ResponseEnvelope};
use super::error::DispatchError;
use super::handler::HandlerOutput;
use super::registry::{OperationKind, Registry, RegistryEntry};
use super::validator::validate;

/// Routes invocations to registered handlers.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    /// Create a dispatcher over a frozen registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// The registry, for discovery.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Invoke an operation by kind and name.
    #[instrument(skip(self, raw))]
    pub async fn invoke(&self, kind: OperationKind, name: &str, raw: JsonObject) -> ResponseEnvelope {
        let outcome = match self.registry.lookup(kind, name) {
            Ok(entry) => Self::run(entry, &raw).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(blocks) => {
                info!("{} '{}' succeeded with {} block(s)", kind, name, blocks.len());
                ResponseEnvelope::Success(blocks)
            }
            Err(err) => {
                warn!(code = err.code(), "{} '{}' failed: {}", kind, name, err);
                ResponseEnvelope::Failure(err)
            }
        }
    }

    async fn run(entry: &RegistryEntry, raw: &JsonObject) -> Result<Vec<ContentBlock>, DispatchError> {
        let args = validate(&entry.schema, raw)?;

        let output = AssertUnwindSafe(entry.handler.handle(&args))
            .catch_unwind()
            .await
            .map_err(|payload| {
                DispatchError::internal(format!("handler panicked: {}", panic_message(&*payload)))
            })??;

        normalize(output)
    }
}

/// Turn handler output into content blocks.
fn normalize(output: HandlerOutput) -> Result<Vec<ContentBlock>, DispatchError> {
    match output {
        HandlerOutput::Text(text) => Ok(vec![ContentBlock::text(text)]),
        HandlerOutput::Blocks(blocks) => {
            if let Some(block) = blocks
                .iter()
                .find(|b| b.mime_type().is_some_and(|m| m.trim().is_empty()))
            {
                return Err(DispatchError::internal(format!(
                    "{} block is missing a MIME type",
                    block.kind()
                )));
            }
            Ok(blocks)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::handler::Handler;
    use crate::core::dispatch::schema::{ArgKind, SchemaDescriptor};
    use crate::core::dispatch::validator::ArgumentRecord;
    use async_trait::async_trait;
    use serde_json::json;

    struct Shout;

    #[async_trait]
    impl Handler for Shout {
        async fn handle(&self, args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
            Ok(args.text("message")?.to_uppercase().into())
        }
    }

    struct Fails;

    #[async_trait]
    impl Handler for Fails {
        async fn handle(&self, _args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
            Err(DispatchError::invalid_operation("nope"))
        }
    }

    struct Panics;

    #[async_trait]
    impl Handler for Panics {
        async fn handle(&self, _args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
            panic!("boom");
        }
    }

    struct Unlabeled;

    #[async_trait]
    impl Handler for Unlabeled {
        async fn handle(&self, _args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
            Ok(HandlerOutput::Blocks(vec![ContentBlock::Binary {
                data: "AAAA".to_string(),
                mime_type: String::new(),
            }]))
        }
    }

    fn dispatcher() -> Dispatcher {
        let schema = SchemaDescriptor::builder()
            .required("message", ArgKind::String, "message")
            .build()
            .unwrap();

        let mut registry = Registry::new();
        registry
            .register(RegistryEntry::new(
                OperationKind::Tool,
                "shout",
                "Upper-case a message",
                schema,
                Arc::new(Shout),
            ))
            .unwrap();
        for (name, handler) in [
            ("fails", Arc::new(Fails) as Arc<dyn Handler>),
            ("panics", Arc::new(Panics)),
            ("unlabeled", Arc::new(Unlabeled)),
        ] {
            registry
                .register(RegistryEntry::new(
                    OperationKind::Tool,
                    name,
                    name,
                    SchemaDescriptor::empty(),
                    handler,
                ))
                .unwrap();
        }

        Dispatcher::new(Arc::new(registry))
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_text_output_becomes_one_block() {
        let envelope = dispatcher()
            .invoke(OperationKind::Tool, "shout", args(json!({"message": "hi"})))
            .await;

        assert_eq!(envelope.blocks().unwrap(), &[ContentBlock::text("HI")]);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failure_envelope() {
        let envelope = dispatcher()
            .invoke(OperationKind::Tool, "missing", JsonObject::new())
            .await;

        assert!(matches!(
            envelope.error(),
            Some(DispatchError::UnknownOperation { .. })
        ));
    }

    #[tokio::test]
    async fn test_wrong_kind_is_unknown() {
        let envelope = dispatcher()
            .invoke(OperationKind::Prompt, "shout", args(json!({"message": "hi"})))
            .await;
        assert!(!envelope.is_success());
    }

    #[tokio::test]
    async fn test_validation_failure_skips_handler() {
        let envelope = dispatcher()
            .invoke(OperationKind::Tool, "shout", JsonObject::new())
            .await;

        match envelope.error() {
            Some(DispatchError::Validation(err)) => assert_eq!(err.fields(), vec!["message"]),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handler_error_is_captured() {
        let envelope = dispatcher()
            .invoke(OperationKind::Tool, "fails", JsonObject::new())
            .await;
        assert!(matches!(
            envelope.error(),
            Some(DispatchError::InvalidOperation(_))
        ));
    }

    #[tokio::test]
    async fn test_handler_panic_is_captured() {
        let envelope = dispatcher()
            .invoke(OperationKind::Tool, "panics", JsonObject::new())
            .await;

        match envelope.error() {
            Some(DispatchError::Internal(msg)) => assert!(msg.contains("boom")),
            other => panic!("Expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_binary_without_mime_type_rejected() {
        let envelope = dispatcher()
            .invoke(OperationKind::Tool, "unlabeled", JsonObject::new())
            .await;
        assert!(matches!(envelope.error(), Some(DispatchError::Internal(_))));
    }

    #[tokio::test]
    async fn test_concurrent_invocations() {
        let dispatcher = dispatcher();
        let (a, b) = tokio::join!(
            dispatcher.invoke(OperationKind::Tool, "shout", args(json!({"message": "a"}))),
            dispatcher.invoke(OperationKind::Tool, "shout", args(json!({"message": "b"}))),
        );

        assert_eq!(a.blocks().unwrap(), &[ContentBlock::text("A")]);
        assert_eq!(b.blocks().unwrap(), &[ContentBlock::text("B")]);
    }
}
