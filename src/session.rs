//! github.dev session URLs.
//!
//! github.dev is GitHub's web editor; any repository on github.com can be
//! opened in it by swapping the host. Nothing here touches the network -
//! session URLs are derived purely from owner and repository name.

use regex::Regex;
use std::sync::OnceLock;

/// Compiled regex for the leading `https://github.com/<owner>/<repo>` of a
/// repository URL. Anchored at the start only, so trailing segments such as
/// `/tree/main` are ignored.
fn repo_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://github\.com/([^/]+)/([^/]+)")
            .expect("Invalid repository URL regex")
    })
}

/// Web editor session URL for a repository: `https://github.dev/{owner}/{repo}`
pub fn session_url(owner: &str, repo: &str) -> String {
    format!("https://github.dev/{}/{}", owner, repo)
}

/// Extract `(owner, repo)` from a github.com repository URL.
///
/// Only the prefix is inspected: `https://github.com/rust-lang/cargo/issues`
/// parses as `("rust-lang", "cargo")`. A trailing `.git` stays part of the
/// repo segment. Returns `None` for anything that is not an https
/// github.com URL with both segments present.
pub fn parse_repo_url(url: &str) -> Option<(String, String)> {
    let caps = repo_url_regex().captures(url)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}
