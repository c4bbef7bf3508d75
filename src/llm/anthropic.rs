use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{LlmClient, MAX_TOKENS, ModelFamily, truncate};
use crate::error::BackendError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic Messages API request body.
#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

/// One content block of a Messages API reply. Only text blocks carry `text`.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// Anthropic-based implementation of LlmClient. The configured model
/// identifier is passed through as the API model parameter.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String, api_base_url: &str) -> Result<Self, BackendError> {
        let client = Client::builder()
            .build()
            .map_err(|e| transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn messages_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/messages", self.api_base_url)
        } else {
            format!("{}/v1/messages", self.api_base_url)
        }
    }
}

fn transport(detail: String) -> BackendError {
    BackendError::TransportFailure {
        family: ModelFamily::Anthropic,
        detail,
    }
}

fn empty(detail: impl Into<String>) -> BackendError {
    BackendError::EmptyResponse {
        family: ModelFamily::Anthropic,
        detail: detail.into(),
    }
}

impl LlmClient for AnthropicClient {
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let url = self.messages_url();
        let req = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".into(),
                content: prompt.to_string(),
            }],
        };

        log::info!("Calling Anthropic model {:?}", &req.model);
        log::debug!("Anthropic prompt:\n{}", truncate(prompt, 3000));

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&req)
            .send()
            .map_err(|e| transport(format!("error calling {url}: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(transport(format!("HTTP {} - {}", status.as_u16(), text)));
        }

        let parsed: MessagesResponse = resp
            .json()
            .map_err(|e| empty(format!("failed to parse response: {e}")))?;

        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| empty("first content block has no text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generate_blocking(base_url: String) -> Result<String, BackendError> {
        let client =
            AnthropicClient::new("sk-ant-test".into(), "claude-3-haiku".into(), &base_url)?;
        client.generate("describe this")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn posts_messages_request_and_reads_first_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_json(json!({
                "model": "claude-3-haiku",
                "max_tokens": 300,
                "messages": [{"role": "user", "content": "describe this"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "COMMIT_NAME: feat: x\nCOMMIT_MESSAGE:\n"}],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let out = tokio::task::spawn_blocking(move || generate_blocking(uri))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(out, "COMMIT_NAME: feat: x\nCOMMIT_MESSAGE:\n");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let uri = server.uri();
        let err = tokio::task::spawn_blocking(move || generate_blocking(uri))
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(
            err,
            BackendError::TransportFailure { family: ModelFamily::Anthropic, .. }
        ));
        assert!(err.to_string().contains("529"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_text_block_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
            .mount(&server)
            .await;

        let uri = server.uri();
        let err = tokio::task::spawn_blocking(move || generate_blocking(uri))
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, BackendError::EmptyResponse { .. }));
    }
}
