use std::path::Path;

use crate::branch::{BranchConfig, sanitize_branch_name, validate_ticket};
use crate::commit::{CommitDetails, parse_commit_response};
use crate::config::{BranchPolicy, Config, stored_model, write_setting};
use crate::error::{BackendError, GitAiError, Result};
use crate::git;
use crate::llm::prompt_builder::{BranchSource, branch_prompt, commit_prompt};
use crate::llm::{LlmClient, ModelId};
use crate::ui::{self, Prompter};

/// Lazily builds the backend client, so commands that stop early never need
/// credentials and never touch the network.
pub type Connect<'a> = &'a dyn Fn() -> std::result::Result<Box<dyn LlmClient>, BackendError>;

const USE_DESCRIPTION: &str = "Use description";
const USE_CHANGES: &str = "Use current changes";

#[derive(Debug, Default, Clone)]
pub struct CommitOptions {
    pub apply: bool,
    pub stage: bool,
}

#[derive(Debug, Default, Clone)]
pub struct BranchOptions {
    pub description: Option<String>,
    pub from_diff: bool,
    pub ticket: Option<String>,
    pub dry_run: bool,
}

fn generate(llm: &dyn LlmClient, prompt: &str) -> Result<String> {
    let pb = ui::spinner("Waiting for the model...");
    let out = llm.generate(prompt);
    pb.finish_and_clear();
    Ok(out?)
}

/// Ask the model for a commit message describing `diff`.
pub fn commit_details(diff: &str, llm: &dyn LlmClient) -> Result<CommitDetails> {
    let raw = generate(llm, &commit_prompt(diff))?;
    log::trace!("Raw commit response:\n{raw}");
    parse_commit_response(&raw)
}

/// Ask the model for a branch name and canonicalise it.
pub fn branch_name(source: &BranchSource, llm: &dyn LlmClient) -> Result<String> {
    let raw = generate(llm, &branch_prompt(source))?;
    log::trace!("Raw branch response:\n{raw}");
    Ok(sanitize_branch_name(&raw))
}

/// Generate a commit message for the working tree. Staging and writing
/// `COMMIT_EDITMSG` happen only once a message was parsed successfully.
pub fn run_commit(repo: &Path, opts: &CommitOptions, connect: Connect) -> Result<CommitDetails> {
    let diff = git::working_tree_diff(repo)?.ok_or(GitAiError::NoChanges)?;

    let llm = connect()?;
    let details = commit_details(&diff, llm.as_ref())?;
    let text = details.to_commit_text();

    ui::preview("Commit Message Preview", &text);

    if opts.stage {
        git::stage_all(repo)?;
    }
    if opts.apply {
        let path = git::write_commit_editmsg(repo, &text)?;
        ui::info(&format!("Commit message written to {}", path.display()));
    }

    Ok(details)
}

/// Generate a branch name and switch to it. Returns `None` when the user
/// backed out of a prompt.
pub fn run_branch(
    repo: &Path,
    policy: &BranchPolicy,
    opts: &BranchOptions,
    prompter: &dyn Prompter,
    connect: Connect,
) -> Result<Option<String>> {
    let Some(source) = choose_source(repo, opts, prompter)? else {
        log::info!("Branch creation cancelled");
        return Ok(None);
    };

    let ticket = if policy.require_ticket_number {
        let raw = match &opts.ticket {
            Some(t) => Some(t.clone()),
            None => prompter
                .input("Enter the ticket number for this branch")
                .map_err(|e| GitAiError::Prompt(e.to_string()))?,
        };
        Some(validate_ticket(raw.as_deref().unwrap_or_default())?)
    } else {
        None
    };

    let llm = connect()?;
    let sanitized = branch_name(&source, llm.as_ref())?;

    let mut parts = BranchConfig::from_sanitized(&sanitized);
    if let Some(ticket) = ticket {
        parts = parts.with_ticket(ticket);
    }
    let name = parts.format(&policy.ticket_prefix);

    if opts.dry_run {
        println!("{name}");
        return Ok(Some(name));
    }

    git::checkout_new_branch(repo, &name)?;
    ui::info(&format!("Created and switched to branch: {name}"));
    Ok(Some(name))
}

fn choose_source(
    repo: &Path,
    opts: &BranchOptions,
    prompter: &dyn Prompter,
) -> Result<Option<BranchSource>> {
    if let Some(description) = &opts.description {
        let description = description.trim();
        if description.is_empty() {
            return Err(GitAiError::InvalidInput("Description must not be empty".into()));
        }
        return Ok(Some(BranchSource::Description(description.to_string())));
    }

    let use_diff = if opts.from_diff {
        true
    } else {
        let items = [USE_DESCRIPTION.to_string(), USE_CHANGES.to_string()];
        let choice = prompter
            .select("How would you like to generate the branch name?", &items, 0)
            .map_err(|e| GitAiError::Prompt(e.to_string()))?;
        match choice {
            None => return Ok(None),
            Some(idx) => idx == 1,
        }
    };

    if use_diff {
        let diff = git::working_tree_diff(repo)?.ok_or(GitAiError::NoChanges)?;
        return Ok(Some(BranchSource::Diff(diff)));
    }

    let description = prompter
        .input("Describe what this branch will be used for")
        .map_err(|e| GitAiError::Prompt(e.to_string()))?;
    Ok(description.map(BranchSource::Description))
}

/// Change the preferred model, persisting it to the settings file at
/// `settings`. Compared against what the file holds, so an override from
/// `--model` or the environment never hides a needed write.
pub fn run_model(settings: &Path, requested: Option<&str>, prompter: &dyn Prompter) -> Result<()> {
    let current = stored_model(settings)?;

    let chosen = match requested {
        Some(raw) => raw.parse::<ModelId>().map_err(GitAiError::InvalidInput)?,
        None => {
            let items: Vec<String> = ModelId::ALL
                .iter()
                .map(|m| {
                    if Some(*m) == current {
                        format!("{m} (current)")
                    } else {
                        m.to_string()
                    }
                })
                .collect();
            let default = ModelId::ALL
                .iter()
                .position(|m| Some(*m) == current)
                .unwrap_or(0);
            let prompt = match current {
                Some(model) => format!("Select preferred model (current: {model})"),
                None => "Select preferred model (current setting is not recognised)".to_string(),
            };
            let choice = prompter
                .select(&prompt, &items, default)
                .map_err(|e| GitAiError::Prompt(e.to_string()))?;
            match choice.and_then(|idx| ModelId::ALL.get(idx).copied()) {
                Some(model) => model,
                None => return Ok(()),
            }
        }
    };

    if Some(chosen) == current {
        ui::info(&format!("Model is already set to {chosen}"));
        return Ok(());
    }

    write_setting(settings, "preferred_model", chosen.as_str())?;
    ui::info(&format!("Preferred model changed to {chosen}"));
    Ok(())
}

pub fn run_config_show(cfg: &Config) {
    println!("# {}", cfg.path.display());
    for (key, value) in cfg.describe() {
        println!("{key} = {value}");
    }
}

pub fn run_config_set(settings: &Path, key: &str, value: &str) -> Result<()> {
    write_setting(settings, key, value)?;
    ui::info(&format!("Updated {key} in {}", settings.display()));
    Ok(())
}
