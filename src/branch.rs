//! Branch name canonicalisation and ticket handling.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GitAiError, Result};

pub const MAX_BRANCH_LEN: usize = 50;

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("static regex"));
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("static regex"));
static TICKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("static regex"));

/// Branch categories, in the order they are searched for in model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchPrefix {
    Feature,
    Bugfix,
    Hotfix,
    Docs,
    Release,
}

impl BranchPrefix {
    pub const ALL: [BranchPrefix; 5] = [
        BranchPrefix::Feature,
        BranchPrefix::Bugfix,
        BranchPrefix::Hotfix,
        BranchPrefix::Docs,
        BranchPrefix::Release,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchPrefix::Feature => "feature/",
            BranchPrefix::Bugfix => "bugfix/",
            BranchPrefix::Hotfix => "hotfix/",
            BranchPrefix::Docs => "docs/",
            BranchPrefix::Release => "release/",
        }
    }
}

impl fmt::Display for BranchPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A branch name broken into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchConfig {
    pub prefix: BranchPrefix,
    pub ticket_number: Option<String>,
    pub description: String,
}

impl BranchConfig {
    /// Split an already sanitized name. Names without a known prefix are
    /// treated as feature branches.
    pub fn from_sanitized(name: &str) -> Self {
        for prefix in BranchPrefix::ALL {
            if let Some(rest) = name.strip_prefix(prefix.as_str()) {
                return Self {
                    prefix,
                    ticket_number: None,
                    description: rest.to_string(),
                };
            }
        }
        Self {
            prefix: BranchPrefix::Feature,
            ticket_number: None,
            description: name.to_string(),
        }
    }

    pub fn with_ticket(mut self, ticket: String) -> Self {
        self.ticket_number = Some(ticket);
        self
    }

    /// `<prefix>/<description>`, or `<prefix>/<ticket_prefix><TICKET>-<description>`
    /// when a ticket is attached.
    pub fn format(&self, ticket_prefix: &str) -> String {
        match &self.ticket_number {
            Some(ticket) => format!(
                "{}{}{}-{}",
                self.prefix,
                ticket_prefix,
                ticket.to_uppercase(),
                self.description
            ),
            None => format!("{}{}", self.prefix, self.description),
        }
    }
}

/// Turn raw model output into a branch name of the form
/// `(feature|bugfix|hotfix|docs|release)/[a-z0-9-]*`, at most 50 characters.
pub fn sanitize_branch_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    // Take the answer after the last occurrence of the prefix; models like to
    // restate the instructions first.
    let (prefix, body) = match BranchPrefix::ALL
        .into_iter()
        .find(|p| lowered.contains(p.as_str()))
    {
        Some(prefix) => {
            let body = lowered
                .rsplit(prefix.as_str())
                .next()
                .unwrap_or_default();
            (prefix, body)
        }
        None => (BranchPrefix::Feature, lowered.as_str()),
    };

    let body = INVALID_CHARS.replace_all(body, "-");
    let body = HYPHEN_RUNS.replace_all(&body, "-");
    let mut body = body.trim_matches('-').to_string();

    let budget = MAX_BRANCH_LEN - prefix.as_str().len();
    if body.len() > budget {
        // body is pure ASCII at this point, byte slicing is safe
        body.truncate(budget);
        body = body.trim_end_matches('-').to_string();
    }

    let name = format!("{prefix}{body}");
    log::debug!("Sanitized branch name {raw:?} -> {name:?}");
    name
}

/// Validate a user supplied ticket token and upper-case it.
pub fn validate_ticket(input: &str) -> Result<String> {
    let ticket = input.trim();
    if ticket.is_empty() {
        return Err(GitAiError::InvalidInput("Ticket number is required".into()));
    }
    if !TICKET.is_match(ticket) {
        return Err(GitAiError::InvalidInput(
            "Ticket number should only contain letters, numbers, and hyphens".into(),
        ));
    }
    Ok(ticket.to_uppercase())
}
