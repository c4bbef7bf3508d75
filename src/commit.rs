//! Turning the model's labelled answer into a commit header and body.

use crate::error::{GitAiError, Result};
use crate::llm::prompt_builder::{COMMIT_MESSAGE_MARKER, COMMIT_NAME_MARKER};

/// A generated commit: the single-line header and the (possibly empty) body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDetails {
    pub name: String,
    pub message: String,
}

impl CommitDetails {
    /// Full commit text as git expects it: header, blank line, body.
    pub fn to_commit_text(&self) -> String {
        if self.message.is_empty() {
            self.name.clone()
        } else {
            format!("{}\n\n{}", self.name, self.message)
        }
    }
}

/// Split a raw backend answer on the `COMMIT_MESSAGE:` marker.
///
/// The two sections are treated as independent spans: the only coupling is
/// that a body which starts by restating the header verbatim loses that
/// leading copy.
pub fn parse_commit_response(raw: &str) -> Result<CommitDetails> {
    let parts: Vec<&str> = raw.split(COMMIT_MESSAGE_MARKER).collect();
    if parts.len() != 2 {
        return Err(GitAiError::MalformedResponse(format!(
            "expected exactly one {COMMIT_MESSAGE_MARKER} section, found {}",
            parts.len() - 1
        )));
    }

    let head = parts[0];
    let name = match head.rfind(COMMIT_NAME_MARKER) {
        Some(idx) => &head[idx + COMMIT_NAME_MARKER.len()..],
        None => head,
    }
    .trim()
    .to_string();

    let body = parts[1].trim();
    let message = match body.strip_prefix(name.as_str()) {
        Some(rest) if !name.is_empty() => rest.trim(),
        _ => body,
    }
    .to_string();

    log::debug!("Parsed commit name: {name:?}");
    Ok(CommitDetails { name, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labelled_sections() {
        let raw = "COMMIT_NAME: feat(auth): add login page\n\
                   COMMIT_MESSAGE: \n\
                   Adds a login form backed by the session API.\n\n\
                   Refs: #42\n";
        let details = parse_commit_response(raw).unwrap();
        assert_eq!(details.name, "feat(auth): add login page");
        assert_eq!(
            details.message,
            "Adds a login form backed by the session API.\n\nRefs: #42"
        );
    }

    #[test]
    fn drops_a_restated_header_at_the_start_of_the_body() {
        let raw = "COMMIT_NAME: fix: handle empty diff\n\
                   COMMIT_MESSAGE:\n\
                   fix: handle empty diff\n\n\
                   Skip the model call when nothing changed.";
        let details = parse_commit_response(raw).unwrap();
        assert_eq!(details.name, "fix: handle empty diff");
        assert_eq!(details.message, "Skip the model call when nothing changed.");
    }

    #[test]
    fn keeps_header_text_repeated_inside_the_body() {
        let raw = "COMMIT_NAME: docs: update readme\n\
                   COMMIT_MESSAGE:\n\
                   The docs: update readme step now runs in CI.";
        let details = parse_commit_response(raw).unwrap();
        assert_eq!(details.message, "The docs: update readme step now runs in CI.");
    }

    #[test]
    fn ignores_preamble_before_the_name_label() {
        let raw = "Sure, here you go!\n\nCOMMIT_NAME: chore: bump deps\nCOMMIT_MESSAGE:\n";
        let details = parse_commit_response(raw).unwrap();
        assert_eq!(details.name, "chore: bump deps");
        assert_eq!(details.message, "");
        assert_eq!(details.to_commit_text(), "chore: bump deps");
    }

    #[test]
    fn missing_marker_is_malformed() {
        let err = parse_commit_response("feat: something without labels").unwrap_err();
        assert!(matches!(err, GitAiError::MalformedResponse(_)));
    }

    #[test]
    fn repeated_marker_is_malformed() {
        let raw = "COMMIT_NAME: a\nCOMMIT_MESSAGE: b\nCOMMIT_MESSAGE: c";
        let err = parse_commit_response(raw).unwrap_err();
        assert!(matches!(err, GitAiError::MalformedResponse(_)));
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn commit_text_separates_header_and_body() {
        let details = CommitDetails {
            name: "feat: x".into(),
            message: "body".into(),
        };
        assert_eq!(details.to_commit_text(), "feat: x\n\nbody");
    }
}
