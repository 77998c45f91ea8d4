//! Provisioning daemon for drydock
//!
//! Provides HTTP endpoints for:
//! - One-shot project provisioning (scaffold + push to GitHub)
//! - Resolving github.dev sessions for local and external repos
//!
//! Design: Blocking HTTP microserver (no async/tokio)
//!
//! Transport model:
//! - TCP at --host/--port, loopback by default
//! - Responses are CORS-open so a browser frontend can call straight in

mod internal;
pub(crate) mod microserver;

use anyhow::Result;
use std::path::PathBuf;

/// Options for the serve command
pub struct ServeOptions {
    /// Host to bind to (default: loopback only)
    pub host: String,
    /// Port to bind to (default: 8000)
    pub port: u16,
    /// Override for the projects root directory
    pub projects_root: Option<PathBuf>,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            projects_root: None,
        }
    }
}

/// Start the drydock daemon
pub fn execute(options: ServeOptions) -> Result<()> {
    internal::run_server(options)
}
