use crate::summarizer::TextGenerator;
use crate::types::{AnalysisError, Result, SummaryConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Default address of a locally running Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Text generator backed by an Ollama server's non-streaming completion
/// endpoint. Model identity, sampling temperature, and base URL are
/// caller-supplied configuration.
pub struct OllamaGenerator {
    client: Client,
    endpoint: Url,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, config: &SummaryConfig) -> Result<Self> {
        let endpoint = Url::parse(base_url)?.join("api/generate")?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AnalysisError::General(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn backend_name(&self) -> String {
        format!("Ollama ({})", self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Requesting completion from {} ({} byte prompt)", self.endpoint, prompt.len());

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Ollama reports failures as {"error": "..."}
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            return Err(AnalysisError::ServiceUnavailable(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        if payload.response.trim().is_empty() {
            return Err(AnalysisError::MalformedResponse(
                "empty completion payload".to_string(),
            ));
        }

        Ok(payload.response)
    }
}
