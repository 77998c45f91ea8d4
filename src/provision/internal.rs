//! Internal implementation of the provisioning workflow.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::forge::Forge;
use crate::git;
use crate::names;
use crate::paths;
use crate::session;

use super::{Outcome, ProjectLocks};

/// Refspec every provisioned project is pushed with. The local branch name
/// never matters; HEAD lands on the remote's main.
const PUSH_REFSPEC: &str = "HEAD:refs/heads/main";

/// Remote the provisioned repository is attached as.
const REMOTE: &str = "origin";

/// Message for the scaffold commit.
const COMMIT_MESSAGE: &str = "Initial commit";

pub fn create_or_reuse(
    config: &Config,
    forge: &dyn Forge,
    locks: &ProjectLocks,
    raw_name: &str,
    prompt: &str,
) -> Result<Outcome> {
    let name = names::sanitize_project_name(raw_name);

    // Serializes the exists-check and the scaffold/push window for this
    // name; other names proceed in parallel
    let lock = locks.for_name(&name);
    let _guard = lock.lock();

    let project_dir = paths::project_dir(&config.projects_root, &name);

    if project_dir.is_dir() {
        // Reuse: restore the entry file if it went missing, touch nothing
        // else - no git, no forge, even when the remote was never created
        let entry = paths::entry_point_path(&config.projects_root, &name);
        if !entry.exists() {
            write_entry_point(&entry, prompt)?;
        }
        let session_url = session::session_url(&config.github_username, &name);
        return Ok(Outcome::Reused { name, session_url });
    }

    println!("🚀 Provisioning project: {}", name);

    fs::create_dir_all(&project_dir)
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;
    write_entry_point(&paths::entry_point_path(&config.projects_root, &name), prompt)?;

    println!("📦 Committing initial scaffold...");
    git::init(&project_dir)?;
    git::configure_identity(
        &project_dir,
        &config.github_username,
        &format!("{}@users.noreply.github.com", config.github_username),
    )?;
    git::add_all(&project_dir)?;
    git::commit(&project_dir, COMMIT_MESSAGE)?;

    // Attempted unconditionally - the platform refuses with 422 when the
    // name is taken. Nothing below is rolled back if the push fails.
    forge.create_repo(&name)?;

    if !git::has_remote(&project_dir, REMOTE)? {
        git::add_remote(&project_dir, REMOTE, &push_url(config, &name))?;
    }
    println!("📤 Pushing to {}...", REMOTE);
    git::push_force(&project_dir, REMOTE, PUSH_REFSPEC)?;

    let session_url = session::session_url(&config.github_username, &name);
    Ok(Outcome::Created { name, session_url })
}

/// Authenticated push URL. Embeds the token - never log it.
fn push_url(config: &Config, name: &str) -> String {
    format!(
        "https://{}:{}@github.com/{}/{}.git",
        config.github_username, config.github_token, config.github_username, name
    )
}

fn write_entry_point(path: &Path, prompt: &str) -> Result<()> {
    let contents = format!(
        "# Generated from prompt: {}\nprint('Hello from the generated project!')\n",
        prompt
    );
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
