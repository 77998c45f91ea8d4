//! Project name sanitizing.
//!
//! Inbound names arrive as arbitrary user text. Before a name touches the
//! filesystem or the forge it is reduced to `[A-Za-z0-9_-]` by deleting
//! every other character. No length cap, no reserved-name screening:
//! whatever survives the filter is the canonical project name.

use regex::Regex;
use std::sync::OnceLock;

/// Compiled regex for characters a project name may not contain.
fn forbidden_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("Invalid forbidden character regex"))
}

/// Reduce an arbitrary name to its filesystem- and GitHub-safe form.
///
/// Deletion, not substitution: `"my cool app!"` becomes `"mycoolapp"`.
/// An all-invalid input collapses to the empty string; downstream that
/// resolves to the projects root itself and reads as an existing project.
pub fn sanitize_project_name(raw: &str) -> String {
    forbidden_regex().replace_all(raw, "").into_owned()
}
