use crate::llm::prompts;

pub use prompts::{COMMIT_MESSAGE_MARKER, COMMIT_NAME_MARKER};

/// What a branch name is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchSource {
    Description(String),
    Diff(String),
}

impl BranchSource {
    fn kind(&self) -> &'static str {
        match self {
            BranchSource::Description(_) => "description",
            BranchSource::Diff(_) => "git diff",
        }
    }

    fn text(&self) -> &str {
        match self {
            BranchSource::Description(text) | BranchSource::Diff(text) => text,
        }
    }
}

pub fn commit_prompt(diff: &str) -> String {
    format!(
        "{instructions}\n\n\
         Git diff:\n\n\
         {diff}\n\n\
         Generate a commit message that clearly describes the changes.\n\n\
         {format}",
        instructions = prompts::COMMIT_INSTRUCTIONS,
        diff = diff,
        format = prompts::COMMIT_ANSWER_FORMAT,
    )
}

pub fn branch_prompt(source: &BranchSource) -> String {
    format!(
        "Generate a git branch name based on the following {kind}:\n\n\
         {text}\n\n\
         {rules}",
        kind = source.kind(),
        text = source.text(),
        rules = prompts::BRANCH_RULES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "diff --git a/src/lib.rs b/src/lib.rs\n\
                        --- a/src/lib.rs\n\
                        +++ b/src/lib.rs\n\
                        @@ -1 +1,2 @@\n\
                        +pub fn login() {}\n";

    #[test]
    fn commit_prompt_embeds_diff_verbatim() {
        let prompt = commit_prompt(DIFF);
        assert!(prompt.contains(DIFF));
    }

    #[test]
    fn commit_prompt_names_both_markers_and_types() {
        let prompt = commit_prompt("x");
        assert!(prompt.contains(COMMIT_NAME_MARKER));
        assert!(prompt.contains(COMMIT_MESSAGE_MARKER));
        for ty in ["feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore"] {
            assert!(prompt.contains(ty), "missing type {ty}");
        }
        assert!(prompt.contains("BREAKING CHANGE:"));
    }

    #[test]
    fn commit_prompt_is_deterministic() {
        assert_eq!(commit_prompt(DIFF), commit_prompt(DIFF));
    }

    #[test]
    fn branch_prompt_from_description() {
        let prompt = branch_prompt(&BranchSource::Description("Add a login page".into()));
        assert!(prompt.starts_with("Generate a git branch name based on the following description:"));
        assert!(prompt.contains("\n\nAdd a login page\n\n"));
        assert!(prompt.contains("feature/, bugfix/, hotfix/, docs/, release/"));
        assert!(prompt.ends_with("Return ONLY the branch name, nothing else."));
    }

    #[test]
    fn branch_prompt_from_diff() {
        let prompt = branch_prompt(&BranchSource::Diff(DIFF.into()));
        assert!(prompt.starts_with("Generate a git branch name based on the following git diff:"));
        assert!(prompt.contains(DIFF));
        assert!(prompt.contains("Maximum total length of 50 characters"));
    }
}
