//! Single source of truth for the drydock filesystem layout.
//!
//! This module defines WHERE provisioned projects live. It has no I/O, no
//! validation, no business logic - callers decide when directories exist.
//!
//! ```text
//! {projects_root}/            # ./projects unless configured
//! └── {project}/              # one directory per sanitized name
//!     ├── .git/               # local history, force-pushed to origin
//!     └── main.py             # generated entry point
//! ```

use std::path::{Path, PathBuf};

/// Directory name used when no explicit projects root is configured.
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

/// File scaffolded into every new project.
pub const ENTRY_POINT: &str = "main.py";

/// Default projects root, relative to the working directory: `./projects`
pub fn default_projects_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROJECTS_DIR)
}

/// A project's directory: `{root}/{name}`
pub fn project_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

/// A project's entry point: `{root}/{name}/main.py`
pub fn entry_point_path(root: &Path, name: &str) -> PathBuf {
    project_dir(root, name).join(ENTRY_POINT)
}
