use crate::config::ModelConfig;
use crate::error::CoachError;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Anything that can turn a rendered prompt into a single text reply.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CoachError>;
}

/// Groq's OpenAI-compatible chat completions endpoint.
pub struct GroqClient {
    client: reqwest::Client,
    config: ModelConfig,
}

impl GroqClient {
    pub fn new(config: ModelConfig) -> Result<Self, CoachError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ModelGateway for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, CoachError> {
        let payload = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [{ "role": "user", "content": prompt }]
        });

        log::debug!("Sending {} prompt chars to {}", prompt.len(), self.config.model);

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let err_text = res.text().await.unwrap_or_default();
            log::error!("API Error {status}: {err_text}");
            return Err(CoachError::Remote(format!("API Error {status}: {err_text}")));
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| CoachError::Remote(format!("Invalid response body: {e}")))?;
        extract_reply(&body)
    }
}

fn extract_reply(body: &Value) -> Result<String, CoachError> {
    let text = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| CoachError::Remote("No text content returned".into()))?;

    if text.trim().is_empty() {
        return Err(CoachError::Remote("Model returned an empty reply".into()));
    }
    Ok(text.to_string())
}
