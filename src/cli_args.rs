use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser, Subcommand};

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "git-ai",
    version,
    about = "LLM-assisted Git commit message and branch name generator"
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (defaults to ~/.config/git-ai.toml)
    #[arg(long, env = "GIT_AI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Repository to operate on (defaults to the current directory)
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,

    /// Model to use: claude-3.5-sonnet, claude-3-opus, claude-3-haiku, gpt-4o, gpt-4o-mini or ollama
    #[arg(long, env = "GIT_AI_MODEL", global = true)]
    pub model: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true, global = true)]
    pub anthropic_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,

    /// Ollama base URL, e.g. http://localhost:11434
    #[arg(long, env = "OLLAMA_HOST", global = true)]
    pub ollama_host: Option<String>,

    /// Model name to request from Ollama
    #[arg(long, env = "GIT_AI_OLLAMA_MODEL", global = true)]
    pub ollama_model: Option<String>,

    /// Write the generated message into .git/COMMIT_EDITMSG (no commit is created)
    #[arg(long, global = true)]
    pub apply: bool,

    /// Stage all changes (git add -A) once a message has been generated
    #[arg(long, global = true)]
    pub stage: bool,

    /// Subcommand; generates a commit message when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands, e.g. `git-ai branch --description "add login page"`
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a commit message from the working tree diff against HEAD
    Commit,

    /// Generate a branch name with the model, then create and switch to it
    #[command(group(
        ArgGroup::new("source")
            .args(["description", "from_diff"])
            .multiple(false)
    ))]
    Branch {
        /// Describe what the branch is for
        #[arg(long, short)]
        description: Option<String>,

        /// Name the branch after the current changes instead of a description
        #[arg(long)]
        from_diff: bool,

        /// Ticket number to embed when the settings require one
        #[arg(long)]
        ticket: Option<String>,

        /// Print the branch name without creating it
        #[arg(long)]
        dry_run: bool,
    },

    /// Change the preferred model; prompts when no model is given
    Model {
        /// One of the supported model identifiers
        name: Option<String>,
    },

    /// Show or change persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective settings (API keys masked)
    Show,

    /// Persist a single setting in the settings file
    Set {
        /// Setting name, e.g. ticket_prefix
        key: String,

        /// New value
        value: String,
    },
}
