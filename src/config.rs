use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::paths;

/// Runtime configuration for drydock.
///
/// Loaded once at startup and handed to whoever needs it; request handlers
/// never read the environment themselves.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub account that owns every provisioned repository
    pub github_username: String,
    /// Personal access token with repo scope, used for the API and for pushes
    pub github_token: String,
    /// Directory holding all provisioned project directories
    pub projects_root: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `GITHUB_USERNAME` and `GITHUB_TOKEN` are required. The projects root
    /// is created if missing; see [`resolve_projects_root`] for where it
    /// comes from.
    pub fn from_env(projects_root: Option<PathBuf>) -> Result<Self> {
        let github_username = require_env("GITHUB_USERNAME")?;
        let github_token = require_env("GITHUB_TOKEN")?;

        let projects_root = resolve_projects_root(projects_root);
        std::fs::create_dir_all(&projects_root).with_context(|| {
            format!(
                "Failed to create projects root: {}",
                projects_root.display()
            )
        })?;

        Ok(Self {
            github_username,
            github_token,
            projects_root,
        })
    }
}

/// Resolve the projects root: explicit override first, then
/// `DRYDOCK_PROJECTS_ROOT`, then `./projects`.
pub fn resolve_projects_root(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os("DRYDOCK_PROJECTS_ROOT").map(PathBuf::from))
        .unwrap_or_else(paths::default_projects_root)
}

fn require_env(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("{} is not set. Export it before starting drydock.", key),
    }
}
