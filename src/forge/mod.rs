//! Forge integration for repository creation.
//!
//! "Do X": create the remote repository a provisioned project pushes to.
//!
//! The forge is the remote code host - GitHub here. Provisioning talks to
//! `dyn Forge` rather than a concrete client, so tests can substitute a
//! stub that never dials out.

mod github;

pub use github::GitHubForge;

use anyhow::Result;
use thiserror::Error;

/// Repository creation was refused by the platform.
///
/// Carries the upstream HTTP status so the server can mirror it to the
/// client (422 when the name is already taken). The platform's response
/// body is dropped; clients get the fixed detail string below.
#[derive(Debug, Error)]
#[error("Failed to create GitHub repository.")]
pub struct CreateRepoError {
    /// Status code the platform answered with.
    pub status: u16,
}

/// Write operations on a forge platform.
pub trait Forge: Send + Sync {
    /// Create a public repository named `name` in the configured account.
    fn create_repo(&self, name: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_repo_error_detail_is_fixed() {
        let err = CreateRepoError { status: 422 };
        assert_eq!(err.to_string(), "Failed to create GitHub repository.");
    }

    #[test]
    fn test_create_repo_error_survives_anyhow() {
        let err: anyhow::Error = CreateRepoError { status: 422 }.into();
        let repo_err = err.downcast_ref::<CreateRepoError>().unwrap();
        assert_eq!(repo_err.status, 422);
    }
}
