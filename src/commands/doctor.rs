//! Preflight checks for the drydock daemon.
//!
//! Verifies everything `serve` needs before it starts: git on PATH, GitHub
//! credentials in the environment, and a writable projects root.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config;

struct CheckResult {
    name: &'static str,
    passed: bool,
    detail: String,
}

fn check_git(resolved: Option<PathBuf>) -> CheckResult {
    match resolved {
        Some(path) => CheckResult {
            name: "git",
            passed: true,
            detail: path.display().to_string(),
        },
        None => CheckResult {
            name: "git",
            passed: false,
            detail: "not found on PATH".to_string(),
        },
    }
}

fn check_env_var(name: &'static str, value: Option<String>, secret: bool) -> CheckResult {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => CheckResult {
            name,
            passed: true,
            detail: if secret {
                "set (hidden)".to_string()
            } else {
                value
            },
        },
        None => CheckResult {
            name,
            passed: false,
            detail: format!("not set. Export {} before starting drydock.", name),
        },
    }
}

fn check_projects_root(root: &Path) -> CheckResult {
    let name = "projects root";

    if let Err(e) = std::fs::create_dir_all(root) {
        return CheckResult {
            name,
            passed: false,
            detail: format!("cannot create {}: {}", root.display(), e),
        };
    }

    // Probe with a real write; a read-only mount passes create_dir_all
    let probe = root.join(".drydock-doctor");
    match std::fs::write(&probe, b"ok") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            CheckResult {
                name,
                passed: true,
                detail: format!("{} is writable", root.display()),
            }
        }
        Err(e) => CheckResult {
            name,
            passed: false,
            detail: format!("cannot write to {}: {}", root.display(), e),
        },
    }
}

/// Run every check and report. Returns the process exit code.
pub fn execute() -> Result<i32> {
    println!("🏥 Checking drydock environment...\n");

    let checks = [
        check_git(which::which("git").ok()),
        check_env_var(
            "GITHUB_USERNAME",
            std::env::var("GITHUB_USERNAME").ok(),
            false,
        ),
        check_env_var("GITHUB_TOKEN", std::env::var("GITHUB_TOKEN").ok(), true),
        check_projects_root(&config::resolve_projects_root(None)),
    ];

    let mut failed = 0;
    for check in &checks {
        let marker = if check.passed { "✓" } else { "✗" };
        println!("  {} {}: {}", marker, check.name, check.detail);
        if !check.passed {
            failed += 1;
        }
    }

    if failed == 0 {
        println!("\n✅ All checks passed. Ready to serve.");
        Ok(0)
    } else {
        println!("\n⚠️  {} of {} checks failed.", failed, checks.len());
        Ok(1)
    }
}
