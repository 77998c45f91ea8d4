pub mod commands;
pub mod config;
pub mod forge;
pub mod git;
pub mod names;
pub mod paths;
pub mod provision;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use forge::{Forge, GitHubForge};
pub use provision::{Outcome, ProjectLocks};
