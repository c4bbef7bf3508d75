use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as GitCommand;

use crate::error::{GitAiError, Result};

/// Run a git command inside `repo` and capture stdout as String.
pub fn git_output(repo: &Path, args: &[&str]) -> Result<String> {
    let output = GitCommand::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|e| GitAiError::Git {
            command: args.join(" "),
            stderr: format!("failed to run git: {e}"),
        })?;

    if !output.status.success() {
        return Err(GitAiError::Git {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Resolve the top-level directory of the repository containing `start`.
pub fn workspace_root(start: &Path) -> Result<PathBuf> {
    if !start.is_dir() {
        return Err(GitAiError::NoWorkspace(start.to_path_buf()));
    }

    let top = git_output(start, &["rev-parse", "--show-toplevel"])
        .map_err(|_| GitAiError::NoWorkspace(start.to_path_buf()))?;
    let top = top.trim();
    if top.is_empty() {
        return Err(GitAiError::NoWorkspace(start.to_path_buf()));
    }
    Ok(PathBuf::from(top))
}

/// Diff of the working tree against HEAD. `None` when there is nothing to
/// describe.
pub fn working_tree_diff(repo: &Path) -> Result<Option<String>> {
    let diff = git_output(repo, &["diff", "HEAD"])?;
    if diff.trim().is_empty() {
        log::info!("git diff HEAD is empty");
        return Ok(None);
    }
    log::debug!("git diff HEAD: {} bytes", diff.len());
    Ok(Some(diff))
}

/// Create a new local branch and switch to it.
pub fn checkout_new_branch(repo: &Path, name: &str) -> Result<()> {
    log::info!("Creating branch {name}");
    git_output(repo, &["checkout", "-b", name])?;
    Ok(())
}

/// Stage all new, modified, and deleted files
pub fn stage_all(repo: &Path) -> Result<()> {
    log::warn!("Staging all changes");
    git_output(repo, &["add", "-A"])?;
    Ok(())
}

/// Get the path to the Git directory (e.g. .git)
pub fn git_dir(repo: &Path) -> Result<PathBuf> {
    let dir = git_output(repo, &["rev-parse", "--git-dir"])?
        .trim()
        .to_string();
    let dir = PathBuf::from(dir);
    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(repo.join(dir))
    }
}

/// Write the commit message into .git/COMMIT_EDITMSG so the next `git commit`
/// will use it as the default message in the editor.
pub fn write_commit_editmsg(repo: &Path, message: &str) -> Result<PathBuf> {
    let path = git_dir(repo)?.join("COMMIT_EDITMSG");
    fs::write(&path, message).map_err(|e| GitAiError::Git {
        command: "write COMMIT_EDITMSG".to_string(),
        stderr: format!("failed to write {}: {e}", path.display()),
    })?;
    Ok(path)
}

#[cfg(test)]
pub(crate) mod test_repo {
    use std::path::Path;
    use std::process::Command;

    use tempfile::TempDir;

    pub fn run(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    /// A repository with one committed file and a clean working tree.
    pub fn init() -> TempDir {
        let dir = TempDir::new().unwrap();
        run(dir.path(), &["init", "-q"]);
        std::fs::write(dir.path().join("README.md"), "hello\n").unwrap();
        run(dir.path(), &["add", "README.md"]);
        run(dir.path(), &["commit", "-q", "-m", "init"]);
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::test_repo;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn clean_tree_has_no_diff() {
        let repo = test_repo::init();
        assert_eq!(working_tree_diff(repo.path()).unwrap(), None);
    }

    #[test]
    fn modified_file_shows_up_in_diff() {
        let repo = test_repo::init();
        fs::write(repo.path().join("README.md"), "hello\nworld\n").unwrap();

        let diff = working_tree_diff(repo.path()).unwrap().unwrap();
        assert!(diff.contains("+world"));
    }

    #[test]
    fn staged_changes_are_included() {
        let repo = test_repo::init();
        fs::write(repo.path().join("new.txt"), "fresh\n").unwrap();
        test_repo::run(repo.path(), &["add", "new.txt"]);

        let diff = working_tree_diff(repo.path()).unwrap().unwrap();
        assert!(diff.contains("new.txt"));
    }

    #[test]
    fn plain_directory_is_not_a_workspace() {
        let dir = TempDir::new().unwrap();
        let err = workspace_root(dir.path()).unwrap_err();
        assert!(matches!(err, GitAiError::NoWorkspace(_)));
    }

    #[test]
    fn checkout_new_branch_switches() {
        let repo = test_repo::init();
        checkout_new_branch(repo.path(), "feature/add-login").unwrap();
        let head = git_output(repo.path(), &["rev-parse", "--abbrev-ref", "HEAD"]).unwrap();
        assert_eq!(head.trim(), "feature/add-login");

        let err = checkout_new_branch(repo.path(), "feature/add-login").unwrap_err();
        assert!(matches!(err, GitAiError::Git { .. }));
    }

    #[test]
    fn commit_editmsg_lands_in_git_dir() {
        let repo = test_repo::init();
        let path = write_commit_editmsg(repo.path(), "feat: x\n\nbody").unwrap();
        assert!(path.ends_with("COMMIT_EDITMSG"));
        assert_eq!(fs::read_to_string(path).unwrap(), "feat: x\n\nbody");
    }
}
