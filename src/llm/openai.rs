use super::{LlmClient, MAX_TOKENS, ModelFamily, truncate};
use crate::error::BackendError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Minimal request/response structs for OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI-based implementation of LlmClient.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, api_base_url: &str) -> Result<Self, BackendError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::TransportFailure {
                family: ModelFamily::OpenAi,
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(OpenAiClient {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }

    fn call_chat(&self, req: &ChatRequest) -> Result<String, BackendError> {
        let url = self.chat_url();

        log::info!("Calling OpenAI model {:?}", &req.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .map_err(|e| transport(format!("error calling {url}: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(transport(format!("HTTP {} - {}", status.as_u16(), text)));
        }

        let chat_resp: ChatResponse = resp.json().map_err(|e| BackendError::EmptyResponse {
            family: ModelFamily::OpenAi,
            detail: format!("failed to parse response: {e}"),
        })?;

        if let Some(usage) = &chat_resp.usage {
            log::debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| BackendError::EmptyResponse {
                family: ModelFamily::OpenAi,
                detail: "no message content in the first choice".to_string(),
            })
    }
}

fn transport(detail: String) -> BackendError {
    BackendError::TransportFailure {
        family: ModelFamily::OpenAi,
        detail,
    }
}

impl LlmClient for OpenAiClient {
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        log::debug!("OpenAI prompt:\n{}", truncate(prompt, 3000));

        let req = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt.to_string(),
            }],
            max_tokens: MAX_TOKENS,
        };

        self.call_chat(&req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generate_blocking(base_url: String, prompt: &'static str) -> Result<String, BackendError> {
        let client = OpenAiClient::new("sk-test".into(), "gpt-4o-mini".into(), &base_url)?;
        client.generate(prompt)
    }

    #[test]
    fn chat_url_handles_v1_suffix() {
        let a = OpenAiClient::new("k".into(), "m".into(), "https://example.test/v1/").unwrap();
        let b = OpenAiClient::new("k".into(), "m".into(), "https://example.test").unwrap();
        assert_eq!(a.chat_url(), "https://example.test/v1/chat/completions");
        assert_eq!(b.chat_url(), "https://example.test/v1/chat/completions");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sends_single_user_message_and_reads_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 300,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "feature/hello"}},
                    {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
                ],
                "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let out = tokio::task::spawn_blocking(move || generate_blocking(uri, "hello"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(out, "feature/hello");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn non_success_status_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let uri = server.uri();
        let err = tokio::task::spawn_blocking(move || generate_blocking(uri, "hello"))
            .await
            .unwrap()
            .unwrap_err();
        match err {
            BackendError::TransportFailure { family, detail } => {
                assert_eq!(family, ModelFamily::OpenAi);
                assert!(detail.contains("401"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn null_content_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let uri = server.uri();
        let err = tokio::task::spawn_blocking(move || generate_blocking(uri, "hello"))
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, BackendError::EmptyResponse { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let uri = server.uri();
        let err = tokio::task::spawn_blocking(move || generate_blocking(uri, "hello"))
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, BackendError::EmptyResponse { .. }));
    }
}
