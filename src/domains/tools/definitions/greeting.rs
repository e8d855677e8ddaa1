//! Greeting tool definition.
//!
//! Greets someone by name in Korean or English.

use std::str::FromStr;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::ToolDefinition;
use crate::core::dispatch::{
    ArgKind, ArgValue, ArgumentRecord, DispatchError, Handler, HandlerOutput, SchemaDescriptor,
};

/// Supported greeting languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Korean,
    English,
}

impl Language {
    pub const CODES: [&'static str; 2] = ["ko", "en"];
}

impl FromStr for Language {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ko" => Ok(Self::Korean),
            "en" => Ok(Self::English),
            other => Err(DispatchError::internal(format!(
                "unsupported language reached handler: {}",
                other
            ))),
        }
    }
}

/// Greeting tool - returns a friendly greeting.
pub struct GreetingTool;

impl GreetingTool {
    /// Build the greeting text.
    pub fn greet(name: &str, language: Language) -> String {
        match language {
            Language::Korean => format!("안녕하세요, {}님! 😊", name),
            Language::English => format!("Hello, {}! 👋", name),
        }
    }
}

impl ToolDefinition for GreetingTool {
    const NAME: &'static str = "greeting";
    const DESCRIPTION: &'static str = "Greet someone by name in Korean (default) or English.";

    fn schema() -> Result<SchemaDescriptor, DispatchError> {
        SchemaDescriptor::builder()
            .required("name", ArgKind::String, "Name of the person to greet")
            .with_default(
                "language",
                ArgKind::one_of(Language::CODES),
                ArgValue::Choice("ko".to_string()),
                "Greeting language (default: ko)",
            )
            .build()
    }
}

#[async_trait]
impl Handler for GreetingTool {
    #[instrument(skip_all)]
    async fn handle(&self, args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
        let name = args.text("name")?;
        let language: Language = args.choice("language")?.parse()?;
        info!("Greeting tool called with language: {:?}", language);

        Ok(Self::greet(name, language).into())
    }
}
