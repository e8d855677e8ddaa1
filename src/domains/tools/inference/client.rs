//! HTTP transport for hosted inference providers.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};
use tracing::debug;

use super::{ImageRequest, InferenceError, InferenceTransport};

/// Calls `{base_url}/{provider}/models/{model}` with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpInferenceTransport {
    client: Client,
    base_url: String,
}

impl HttpInferenceTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, request: &ImageRequest) -> String {
        format!(
            "{}/{}/models/{}",
            self.base_url, request.provider, request.model
        )
    }
}

#[async_trait]
impl InferenceTransport for HttpInferenceTransport {
    async fn text_to_image(
        &self,
        token: &str,
        request: &ImageRequest,
    ) -> Result<Vec<u8>, InferenceError> {
        let url = self.endpoint(request);
        debug!("POST {}", url);

        let body = json!({
            "inputs": request.inputs,
            "parameters": { "num_inference_steps": request.num_inference_steps },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, "image/png")
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(InferenceError::InvalidPayload(format!(
                "expected an image, got content type '{}'",
                content_type
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Pull the `error` field out of a provider error body, or fall back to the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("error") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ if body.trim().is_empty() => "no response body".to_string(),
        _ => body.trim().to_string(),
    }
}
