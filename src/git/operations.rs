//! Low-level git operations
//!
//! Every function shells out to the system `git` binary, scoped to an
//! explicit repository path with `current_dir`. The daemon manages many
//! project directories at once, so nothing here touches the process
//! working directory.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Initialize a repository at `repo`. Safe to repeat - `git init` on an
/// existing repository is a no-op.
pub fn init(repo: &Path) -> Result<()> {
    let output = Command::new("git")
        .arg("init")
        .current_dir(repo)
        .output()
        .context("Failed to run git init")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to initialize repository: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Set a repo-local commit identity.
///
/// A freshly initialized repository on a server has no ambient
/// user.name/user.email, and `git commit` refuses to run without one.
pub fn configure_identity(repo: &Path, name: &str, email: &str) -> Result<()> {
    for (key, value) in [("user.name", name), ("user.email", email)] {
        let output = Command::new("git")
            .args(["config", key, value])
            .current_dir(repo)
            .output()
            .context("Failed to run git config")?;

        if !output.status.success() {
            anyhow::bail!(
                "Failed to set {}: {}",
                key,
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }

    Ok(())
}

/// Stage all changes
pub fn add_all(repo: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["add", "-A"])
        .current_dir(repo)
        .output()
        .context("Failed to stage changes")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to stage changes: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Create a commit
pub fn commit(repo: &Path, message: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(repo)
        .output()
        .context("Failed to create commit")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to create commit: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Check whether a named remote exists
pub fn has_remote(repo: &Path, name: &str) -> Result<bool> {
    let output = Command::new("git")
        .arg("remote")
        .current_dir(repo)
        .output()
        .context("Failed to list remotes")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to list remotes: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let remotes = String::from_utf8_lossy(&output.stdout);
    Ok(remotes.lines().any(|line| line.trim() == name))
}

/// Add a git remote
pub fn add_remote(repo: &Path, name: &str, url: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["remote", "add", name, url])
        .current_dir(repo)
        .output()
        .context("Failed to add remote")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to add remote: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Force-push a refspec to a remote. Whatever the remote had is overwritten.
pub fn push_force(repo: &Path, remote: &str, refspec: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["push", "--force", remote, refspec])
        .current_dir(repo)
        .output()
        .context("Failed to run git push")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to push to {}: {}",
            remote,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}
