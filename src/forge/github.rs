//! GitHub implementation of [`Forge`] over the v3 REST API.

use anyhow::{Context, Result};
use serde_json::json;

use super::{CreateRepoError, Forge};

/// Endpoint for creating a repository under the authenticated user.
const CREATE_REPO_URL: &str = "https://api.github.com/user/repos";

/// GitHub forge client. One instance per daemon; the blocking reqwest
/// client pools connections internally.
pub struct GitHubForge {
    token: String,
    client: reqwest::blocking::Client,
}

impl GitHubForge {
    pub fn new(token: &str) -> Result<Self> {
        // GitHub rejects requests that lack a User-Agent
        let client = reqwest::blocking::Client::builder()
            .user_agent("drydock")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            token: token.to_string(),
            client,
        })
    }
}

impl Forge for GitHubForge {
    fn create_repo(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .post(CREATE_REPO_URL)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .json(&json!({ "name": name, "private": false }))
            .send()
            .context("Failed to reach the GitHub API")?;

        // Anything but 201 Created is a refusal, including 422 for a name
        // that already exists on the account
        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            return Err(CreateRepoError {
                status: status.as_u16(),
            }
            .into());
        }

        println!("✅ Repository created: {}", name);
        Ok(())
    }
}
