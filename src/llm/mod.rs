pub mod anthropic;
pub mod ollama;
pub mod openai;
pub mod prompt_builder;
mod prompts;

use std::fmt;
use std::str::FromStr;

use crate::error::BackendError;

/// Tokens requested from the remote providers per call.
pub const MAX_TOKENS: u32 = 300;

/// Trait for talking to an LLM backend.
pub trait LlmClient {
    /// Send one prompt and return the raw generated text.
    fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// The three interchangeable backend families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Anthropic,
    OpenAi,
    Ollama,
}

impl ModelFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Anthropic => "Anthropic",
            ModelFamily::OpenAi => "OpenAI",
            ModelFamily::Ollama => "Ollama",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every model identifier a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    Claude35Sonnet,
    Claude3Opus,
    Claude3Haiku,
    Gpt4o,
    Gpt4oMini,
    Ollama,
}

impl ModelId {
    pub const ALL: [ModelId; 6] = [
        ModelId::Claude35Sonnet,
        ModelId::Claude3Opus,
        ModelId::Claude3Haiku,
        ModelId::Gpt4o,
        ModelId::Gpt4oMini,
        ModelId::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Claude35Sonnet => "claude-3.5-sonnet",
            ModelId::Claude3Opus => "claude-3-opus",
            ModelId::Claude3Haiku => "claude-3-haiku",
            ModelId::Gpt4o => "gpt-4o",
            ModelId::Gpt4oMini => "gpt-4o-mini",
            ModelId::Ollama => "ollama",
        }
    }

    pub fn family(&self) -> ModelFamily {
        match self {
            ModelId::Claude35Sonnet | ModelId::Claude3Opus | ModelId::Claude3Haiku => {
                ModelFamily::Anthropic
            }
            ModelId::Gpt4o | ModelId::Gpt4oMini => ModelFamily::OpenAi,
            ModelId::Ollama => ModelFamily::Ollama,
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = ModelId::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown model '{wanted}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Truncate long strings for debug logging.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...\n[truncated {} chars]", &s[..cut], s.len() - cut)
}
