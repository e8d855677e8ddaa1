//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. The configuration is read
//! once at startup and passed explicitly to the components that need it.

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Remote image generation settings.
    pub image_generation: ImageGenerationConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Hugging Face access token for the inference router.
    pub hf_token: Option<String>,
}

impl CredentialsConfig {
    /// The token, if set to something non-blank.
    pub fn hf_token(&self) -> Option<&str> {
        self.hf_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("hf_token", &self.hf_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Settings for the image generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationConfig {
    /// Inference provider routed through the Hugging Face router.
    pub provider: String,

    /// Model identifier.
    pub model: String,

    /// Number of diffusion steps sent with each request.
    pub num_inference_steps: u32,

    /// Router base URL.
    pub base_url: String,

    /// Upper bound on one request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            provider: "hf-inference".to_string(),
            model: "black-forest-labs/FLUX.1-schnell".to_string(),
            num_inference_steps: 5,
            base_url: "https://router.huggingface.co".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "starter-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            credentials: CredentialsConfig::default(),
            image_generation: ImageGenerationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`. The token also falls
    /// back to the conventional `HF_TOKEN`. A set but malformed numeric or
    /// boolean variable is a configuration error.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(with_timestamps) = parse_env("MCP_LOG_TIMESTAMPS", parse_flag)? {
            config.logging.with_timestamps = with_timestamps;
        }

        config.credentials.hf_token = std::env::var("MCP_HF_TOKEN")
            .or_else(|_| std::env::var("HF_TOKEN"))
            .ok();

        let image = &mut config.image_generation;
        if let Ok(provider) = std::env::var("MCP_IMAGE_PROVIDER") {
            image.provider = provider;
        }
        if let Ok(model) = std::env::var("MCP_IMAGE_MODEL") {
            image.model = model;
        }
        if let Ok(base_url) = std::env::var("MCP_IMAGE_BASE_URL") {
            image.base_url = base_url;
        }
        if let Some(steps) = parse_env("MCP_IMAGE_STEPS", |v| v.parse::<u32>().ok())? {
            image.num_inference_steps = steps;
        }
        if let Some(secs) = parse_env("MCP_IMAGE_TIMEOUT_SECS", |v| v.parse::<u64>().ok())? {
            image.timeout_secs = secs;
        }

        Ok(config)
    }
}

/// Read and parse an optional variable. Unset is `None`; unparseable is an error.
fn parse_env<T>(key: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => parse(raw.trim())
            .map(Some)
            .ok_or_else(|| Error::config(format!("invalid value for {}: '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
