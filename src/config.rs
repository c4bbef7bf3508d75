use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli_args::Cli;
use crate::error::{GitAiError, Result};
use crate::llm::{ModelId, anthropic, openai};

pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";

/// Everything a backend call needs. Passed explicitly to every generation
/// step; nothing reads settings behind the caller's back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub preferred_model: ModelId,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_host: Option<String>,
    pub ollama_model: String,
    pub anthropic_base_url: String,
    pub openai_base_url: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            preferred_model: ModelId::Claude35Sonnet,
            anthropic_api_key: None,
            openai_api_key: None,
            ollama_host: None,
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            anthropic_base_url: anthropic::DEFAULT_BASE_URL.to_string(),
            openai_base_url: openai::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Branch naming policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchPolicy {
    pub require_ticket_number: bool,
    pub ticket_prefix: String,
}

/// Final resolved configuration for git-ai.
#[derive(Debug, Clone)]
pub struct Config {
    pub generation: GenerationConfig,
    pub branch: BranchPolicy,
    /// Where settings are read from and written to.
    pub path: PathBuf,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub model: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_host: Option<String>,
    pub ollama_model: Option<String>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            model: cli.model.clone(),
            anthropic_api_key: cli.anthropic_api_key.clone(),
            openai_api_key: cli.openai_api_key.clone(),
            ollama_host: cli.ollama_host.clone(),
            ollama_model: cli.ollama_model.clone(),
        }
    }
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags / env vars (`--model`, `GIT_AI_MODEL`, `OPENAI_API_KEY`, ...)
    ///   2. TOML settings file (`~/.config/git-ai.toml` or `--config`)
    ///   3. Hardcoded defaults (`claude-3.5-sonnet`, `llama2`)
    /// Layer the CLI/env values over the settings file at `path`.
    pub fn from_sources(cli: &Cli, path: PathBuf) -> Result<Self> {
        let file_cfg = load_file_config(&path)?;
        Self::resolve(Overrides::from(cli), file_cfg, path)
    }

    pub fn resolve(overrides: Overrides, file_cfg: FileConfig, path: PathBuf) -> Result<Self> {
        let defaults = GenerationConfig::default();

        let preferred_model = match overrides.model.or(file_cfg.preferred_model) {
            Some(raw) => raw.parse::<ModelId>().map_err(GitAiError::Config)?,
            None => defaults.preferred_model,
        };

        let generation = GenerationConfig {
            preferred_model,
            anthropic_api_key: overrides.anthropic_api_key.or(file_cfg.anthropic_api_key),
            openai_api_key: overrides.openai_api_key.or(file_cfg.openai_api_key),
            ollama_host: overrides.ollama_host.or(file_cfg.ollama_host),
            ollama_model: overrides
                .ollama_model
                .or(file_cfg.ollama_model)
                .unwrap_or(defaults.ollama_model),
            anthropic_base_url: file_cfg
                .anthropic_base_url
                .unwrap_or(defaults.anthropic_base_url),
            openai_base_url: file_cfg.openai_base_url.unwrap_or(defaults.openai_base_url),
        };

        let branch = BranchPolicy {
            require_ticket_number: file_cfg.require_ticket_number.unwrap_or(false),
            ticket_prefix: file_cfg.ticket_prefix.unwrap_or_default(),
        };

        Ok(Config {
            generation,
            branch,
            path,
        })
    }

    /// Effective settings as (key, value) pairs with secrets masked.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let g = &self.generation;
        vec![
            ("preferred_model", g.preferred_model.to_string()),
            ("anthropic_api_key", mask(g.anthropic_api_key.as_deref())),
            ("openai_api_key", mask(g.openai_api_key.as_deref())),
            (
                "ollama_host",
                g.ollama_host.clone().unwrap_or_else(|| "(not set)".into()),
            ),
            ("ollama_model", g.ollama_model.clone()),
            ("anthropic_base_url", g.anthropic_base_url.clone()),
            ("openai_base_url", g.openai_base_url.clone()),
            (
                "require_ticket_number",
                self.branch.require_ticket_number.to_string(),
            ),
            ("ticket_prefix", self.branch.ticket_prefix.clone()),
        ]
    }
}

/// Settings as stored in the TOML file; every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub preferred_model: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_host: Option<String>,
    pub ollama_model: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub require_ticket_number: Option<bool>,
    pub ticket_prefix: Option<String>,
}

/// Keys accepted by `config set`.
pub const SETTING_KEYS: [&str; 9] = [
    "preferred_model",
    "anthropic_api_key",
    "openai_api_key",
    "ollama_host",
    "ollama_model",
    "anthropic_base_url",
    "openai_base_url",
    "require_ticket_number",
    "ticket_prefix",
];

/// Return `~/.config/git-ai.toml`
fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| GitAiError::Config("could not determine the home directory".into()))?;
    Ok(home.join(".config").join("git-ai.toml"))
}

/// `--config`/`GIT_AI_CONFIG`, else the default location.
pub fn settings_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// The model saved in the settings file, ignoring flag and env overrides.
/// An absent key means the default model; an unrecognised one is `None`.
pub fn stored_model(path: &Path) -> Result<Option<ModelId>> {
    let file_cfg = load_file_config(path)?;
    Ok(match file_cfg.preferred_model {
        None => Some(GenerationConfig::default().preferred_model),
        Some(raw) => raw.parse::<ModelId>().ok(),
    })
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        log::debug!("No settings file at {}", path.display());
        return Ok(FileConfig::default());
    }

    let data = fs::read_to_string(path)
        .map_err(|e| GitAiError::Config(format!("failed to read {}: {e}", path.display())))?;
    toml::from_str::<FileConfig>(&data)
        .map_err(|e| GitAiError::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Persist one setting, keeping every other key in the file untouched.
pub fn write_setting(path: &Path, key: &str, value: &str) -> Result<()> {
    let new_value = match key {
        "preferred_model" => {
            let model = value.parse::<ModelId>().map_err(GitAiError::InvalidInput)?;
            toml::Value::String(model.as_str().to_string())
        }
        "require_ticket_number" => {
            let flag = value.trim().parse::<bool>().map_err(|_| {
                GitAiError::InvalidInput(format!(
                    "require_ticket_number must be true or false, got '{value}'"
                ))
            })?;
            toml::Value::Boolean(flag)
        }
        k if SETTING_KEYS.contains(&k) => toml::Value::String(value.to_string()),
        other => {
            return Err(GitAiError::InvalidInput(format!(
                "unknown setting '{other}' (expected one of: {})",
                SETTING_KEYS.join(", ")
            )));
        }
    };

    let mut table = if path.exists() {
        let data = fs::read_to_string(path)
            .map_err(|e| GitAiError::Config(format!("failed to read {}: {e}", path.display())))?;
        data.parse::<toml::Table>()
            .map_err(|e| GitAiError::Config(format!("failed to parse {}: {e}", path.display())))?
    } else {
        toml::Table::new()
    };

    table.insert(key.to_string(), new_value);

    let rendered = toml::to_string(&table)
        .map_err(|e| GitAiError::Config(format!("failed to render settings: {e}")))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            GitAiError::Config(format!("failed to create {}: {e}", parent.display()))
        })?;
    }
    fs::write(path, rendered)
        .map_err(|e| GitAiError::Config(format!("failed to write {}: {e}", path.display())))?;

    log::info!("Saved {key} to {}", path.display());
    Ok(())
}

fn mask(secret: Option<&str>) -> String {
    match secret {
        None => "(not set)".to_string(),
        Some(s) if s.chars().count() <= 8 => "****".to_string(),
        Some(s) => {
            let tail: String = s.chars().skip(s.chars().count() - 4).collect();
            format!("****{tail}")
        }
    }
}
