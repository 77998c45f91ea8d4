//! Project provisioning - the create-or-reuse workflow.
//!
//! One call takes a requested name all the way to a pushed GitHub
//! repository: sanitize, scaffold, initial commit, remote creation,
//! force-push. Reuse is cheap - an existing directory short-circuits
//! before any git or network work.
//!
//! # Example
//!
//! ```no_run
//! use drydock::config::Config;
//! use drydock::forge::GitHubForge;
//! use drydock::provision::{self, Outcome, ProjectLocks};
//!
//! let config = Config::from_env(None)?;
//! let forge = GitHubForge::new(&config.github_token)?;
//! let locks = ProjectLocks::new();
//!
//! match provision::create_or_reuse(&config, &forge, &locks, "my app", "a demo")? {
//!     Outcome::Created { session_url, .. } => println!("created: {}", session_url),
//!     Outcome::Reused { session_url, .. } => println!("already there: {}", session_url),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;
mod locks;

pub use locks::ProjectLocks;

use anyhow::Result;

use crate::config::Config;
use crate::forge::Forge;

/// What provisioning did for a given name.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Directory was already on disk. The entry file is restored if it went
    /// missing; no git or forge action is taken.
    Reused { name: String, session_url: String },
    /// Full pipeline ran: scaffold, initial commit, remote repository,
    /// force-push.
    Created { name: String, session_url: String },
}

/// Create the named project end to end, or reuse its existing directory.
///
/// `raw_name` is sanitized first; the prompt lands as a comment in the
/// generated entry file. Requests for the same sanitized name serialize on
/// `locks`.
pub fn create_or_reuse(
    config: &Config,
    forge: &dyn Forge,
    locks: &ProjectLocks,
    raw_name: &str,
    prompt: &str,
) -> Result<Outcome> {
    internal::create_or_reuse(config, forge, locks, raw_name, prompt)
}
