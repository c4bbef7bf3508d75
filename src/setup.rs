use log::debug;

use crate::config::GenerationConfig;
use crate::error::BackendError;
use crate::llm::anthropic::AnthropicClient;
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;
use crate::llm::{LlmClient, ModelFamily, ModelId};

/// Build the LLM client for the configured model. Fails before any network
/// traffic when the selected family is missing its key or host.
pub fn build_llm_client(cfg: &GenerationConfig) -> Result<Box<dyn LlmClient>, BackendError> {
    let model = cfg.preferred_model;

    match model {
        ModelId::Claude35Sonnet | ModelId::Claude3Opus | ModelId::Claude3Haiku => {
            anthropic_client(cfg, model.as_str())
        }
        ModelId::Gpt4o => openai_client(cfg, "gpt-4o"),
        ModelId::Gpt4oMini => openai_client(cfg, "gpt-4o-mini"),
        ModelId::Ollama => ollama_client(cfg),
    }
}

fn anthropic_client(cfg: &GenerationConfig, model: &str) -> Result<Box<dyn LlmClient>, BackendError> {
    let key = required(&cfg.anthropic_api_key, ModelFamily::Anthropic, "anthropic_api_key")?;
    debug!("Using AnthropicClient with model: {model}");
    Ok(Box::new(AnthropicClient::new(
        key,
        model.to_string(),
        &cfg.anthropic_base_url,
    )?))
}

fn openai_client(cfg: &GenerationConfig, model: &str) -> Result<Box<dyn LlmClient>, BackendError> {
    let key = required(&cfg.openai_api_key, ModelFamily::OpenAi, "openai_api_key")?;
    debug!("Using OpenAiClient with model: {model}");
    Ok(Box::new(OpenAiClient::new(
        key,
        model.to_string(),
        &cfg.openai_base_url,
    )?))
}

fn ollama_client(cfg: &GenerationConfig) -> Result<Box<dyn LlmClient>, BackendError> {
    let host = required(&cfg.ollama_host, ModelFamily::Ollama, "ollama_host")?;
    debug!("Using OllamaClient at {host} with model: {}", cfg.ollama_model);
    Ok(Box::new(OllamaClient::new(&host, cfg.ollama_model.clone())?))
}

fn required(
    value: &Option<String>,
    family: ModelFamily,
    setting: &'static str,
) -> Result<String, BackendError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(BackendError::MissingCredential { family, setting })
}
