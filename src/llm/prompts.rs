pub const COMMIT_NAME_MARKER: &str = "COMMIT_NAME:";
pub const COMMIT_MESSAGE_MARKER: &str = "COMMIT_MESSAGE:";

pub const COMMIT_INSTRUCTIONS: &str = r#"Given the following git diff, generate a concise, descriptive commit message following the Conventional Commits 1.0.0 specification. Use one of these types: feat, fix, docs, style, refactor, perf, test, build, ci, chore. Include a scope if appropriate. Format should be:
type(optional-scope): description

[optional body]

[optional footer]

Include BREAKING CHANGE: footer or ! after type/scope for breaking changes."#;

pub const COMMIT_ANSWER_FORMAT: &str = r#"Answer with exactly two labelled sections and nothing else:
COMMIT_NAME: the single-line header, type(optional-scope): description
COMMIT_MESSAGE: the body and footers, or an empty line if none are needed

Do not repeat the header inside COMMIT_MESSAGE and do not narrate your answer."#;

pub const BRANCH_RULES: &str = r#"Rules for the branch name:
1. Use only lowercase letters, numbers, and hyphens
2. No spaces, underscores, or special characters
3. Start with one of these prefixes: feature/, bugfix/, hotfix/, docs/, release/
4. Make it concise but descriptive
5. Don't use consecutive hyphens
6. Don't end with a hyphen
7. Maximum total length of 50 characters
8. Focus on the main purpose or feature being added/modified

Return ONLY the branch name, nothing else."#;
