//! Remote image generation.
//!
//! [`ImageGenerator`] runs one generation call through three stages:
//!
//! 1. `CredentialCheck` - fail with a missing-credential error before any I/O
//! 2. `Requesting` - one bounded call through an [`InferenceTransport`], no retry
//! 3. `Decoding` - bytes to a base64 `image/png` content block
//!
//! The transport is a trait so tests can swap the HTTP client for a double.

mod client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::core::config::{CredentialsConfig, ImageGenerationConfig};
use crate::core::dispatch::{Audience, BlockAnnotations, ContentBlock, DispatchError};

pub use client::HttpInferenceTransport;

/// MIME type attached to generated images.
pub const IMAGE_MIME_TYPE: &str = "image/png";

/// Priority hint for generated images.
const IMAGE_PRIORITY: f32 = 0.9;

/// One text-to-image request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub provider: String,
    pub model: String,
    pub inputs: String,
    pub num_inference_steps: u32,
}

/// Errors reported by an inference transport.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The provider answered with something that is not an image.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Outbound call to a remote inference provider.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    /// Generate an image and return its raw bytes.
    async fn text_to_image(
        &self,
        token: &str,
        request: &ImageRequest,
    ) -> Result<Vec<u8>, InferenceError>;
}

/// Stages of one generation call, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CredentialCheck,
    Requesting,
    Decoding,
}

/// Image generation adapter.
pub struct ImageGenerator {
    credentials: CredentialsConfig,
    settings: ImageGenerationConfig,
    timeout: Duration,
    transport: Arc<dyn InferenceTransport>,
}

impl ImageGenerator {
    /// Create an adapter with explicit configuration and transport.
    pub fn new(
        credentials: CredentialsConfig,
        settings: ImageGenerationConfig,
        transport: Arc<dyn InferenceTransport>,
    ) -> Self {
        let timeout = Duration::from_secs(settings.timeout_secs);
        Self {
            credentials,
            settings,
            timeout,
            transport,
        }
    }

    /// Override the request time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate one image for `prompt`.
    #[instrument(skip(self, prompt), fields(model = %self.settings.model))]
    pub async fn generate(&self, prompt: &str) -> Result<ContentBlock, DispatchError> {
        let token = self.credentials.hf_token().ok_or_else(|| {
            warn!(stage = ?Stage::CredentialCheck, "No Hugging Face token configured");
            DispatchError::missing_credential(
                "HF_TOKEN is not set; configure a Hugging Face access token to generate images",
            )
        })?;

        let request = ImageRequest {
            provider: self.settings.provider.clone(),
            model: self.settings.model.clone(),
            inputs: prompt.to_string(),
            num_inference_steps: self.settings.num_inference_steps,
        };

        info!(stage = ?Stage::Requesting, provider = %request.provider, "Requesting image");
        let bytes = match tokio::time::timeout(
            self.timeout,
            self.transport.text_to_image(token, &request),
        )
        .await
        {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                error!(stage = ?Stage::Requesting, "Image generation failed: {}", e);
                return Err(DispatchError::upstream(e.to_string()));
            }
            Err(_) => {
                error!(stage = ?Stage::Requesting, "Image generation timed out");
                return Err(DispatchError::upstream(format!(
                    "image generation timed out after {:?}",
                    self.timeout
                )));
            }
        };

        info!(stage = ?Stage::Decoding, bytes = bytes.len(), "Encoding image");
        encode_image(&bytes)
    }
}

/// Base64-encode image bytes into an annotated image block.
pub fn encode_image(bytes: &[u8]) -> Result<ContentBlock, DispatchError> {
    if bytes.is_empty() {
        return Err(DispatchError::upstream("provider returned an empty image"));
    }

    Ok(ContentBlock::Image {
        data: STANDARD.encode(bytes),
        mime_type: IMAGE_MIME_TYPE.to_string(),
        annotations: Some(BlockAnnotations {
            audience: vec![Audience::User],
            priority: IMAGE_PRIORITY,
        }),
    })
}
