use musli::json;
use musli::{Decode, Encode};
use reqwest::blocking::Client;

use super::{LlmClient, ModelFamily, truncate};
use crate::error::BackendError;

#[derive(Debug, Encode)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Decode)]
struct GenerateResponse {
    #[musli(default)]
    response: Option<String>,
}

/// Synchronous Ollama client using /api/generate.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: impl Into<String>) -> Result<Self, BackendError> {
        let http = Client::builder()
            .build()
            .map_err(|e| transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }
}

fn transport(detail: String) -> BackendError {
    BackendError::TransportFailure {
        family: ModelFamily::Ollama,
        detail,
    }
}

fn empty(detail: impl Into<String>) -> BackendError {
    BackendError::EmptyResponse {
        family: ModelFamily::Ollama,
        detail: detail.into(),
    }
}

impl LlmClient for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let req_body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let body_str = json::to_string(&req_body)
            .map_err(|e| transport(format!("failed to encode JSON request: {e}")))?;

        log::info!("Calling Ollama model {:?}", &self.model);
        log::trace!("Ollama request body: {}", truncate(&body_str, 4000));

        let url = format!("{}/api/generate", self.base_url);

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body_str)
            .send()
            .map_err(|e| transport(format!("error calling {url}: {e}")))?
            .error_for_status()
            .map_err(|e| transport(format!("HTTP error from {url}: {e}")))?;

        let resp_text = resp
            .text()
            .map_err(|e| transport(format!("failed to read response body: {e}")))?;

        log::trace!("Ollama raw JSON response: {resp_text}");

        let parsed: GenerateResponse = json::from_str(&resp_text)
            .map_err(|e| empty(format!("invalid response from Ollama: {e}")))?;

        parsed
            .response
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| empty("response field is missing or empty"))
    }
}
