//! Image generation tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::ToolDefinition;
use crate::core::dispatch::{
    ArgKind, ArgumentRecord, DispatchError, Handler, HandlerOutput, SchemaDescriptor,
};
use crate::domains::tools::inference::ImageGenerator;

/// Image tool - turns a text prompt into a PNG through a hosted model.
pub struct GenerateImageTool {
    generator: Arc<ImageGenerator>,
}

impl GenerateImageTool {
    pub fn new(generator: Arc<ImageGenerator>) -> Self {
        Self { generator }
    }
}

impl ToolDefinition for GenerateImageTool {
    const NAME: &'static str = "generate_image";
    const DESCRIPTION: &'static str =
        "Generate an image from a text prompt using a hosted text-to-image model.";

    fn schema() -> Result<SchemaDescriptor, DispatchError> {
        SchemaDescriptor::builder()
            .required("prompt", ArgKind::String, "Description of the image to generate")
            .build()
    }
}

#[async_trait]
impl Handler for GenerateImageTool {
    #[instrument(skip_all)]
    async fn handle(&self, args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
        let prompt = args.text("prompt")?;
        info!("Generating image for prompt ({} chars)", prompt.chars().count());

        let block = self.generator.generate(prompt).await?;
        Ok(HandlerOutput::Blocks(vec![block]))
    }
}
