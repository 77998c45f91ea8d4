//! Internal implementation for the serve command.
//!
//! Handlers are transport-free: they take a parsed request plus the server
//! state and return a response, so the whole routing table is testable
//! without a socket.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{Shutdown, TcpListener};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::forge::{CreateRepoError, Forge, GitHubForge};
use crate::paths;
use crate::provision::{self, Outcome, ProjectLocks};
use crate::session;

use super::microserver::{self, HttpRequest, HttpResponse};
use super::ServeOptions;

// === Server state ===

/// Server state shared across request handlers
pub struct ServerState {
    config: Config,
    forge: Box<dyn Forge>,
    locks: ProjectLocks,
    start_time: Instant,
    version: String,
}

impl ServerState {
    fn new(config: Config, forge: Box<dyn Forge>) -> Self {
        Self {
            config,
            forge,
            locks: ProjectLocks::new(),
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// === API types ===

/// Request body shared by the provisioning endpoints. Everything is
/// optional; each handler checks what it needs.
#[derive(Deserialize)]
struct ProjectRequest {
    prompt: Option<String>,
    project_name: Option<String>,
    repo_url: Option<String>,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

// === Helpers ===

/// JSON response with a serialized body
fn json_response(status: u16, value: &impl Serialize) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: serde_json::to_vec(value).unwrap_or_default(),
    }
}

/// Consistent JSON error body: `{"detail": ...}`
fn json_error(status: u16, detail: &str) -> HttpResponse {
    json_response(status, &serde_json::json!({ "detail": detail }))
}

/// Every response is CORS-open; the frontend is served from another origin
fn with_cors_headers(response: HttpResponse) -> HttpResponse {
    response.with_header("Access-Control-Allow-Origin", "*")
}

/// First value for `name` in a raw query string, percent-decoded.
fn query_param(query: &str, name: &str) -> Option<String> {
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key == name {
            return Some(value.into_owned());
        }
    }
    None
}

// === Transport-free handlers ===

/// Route request to handler
fn route_request(request: &HttpRequest, state: &ServerState) -> HttpResponse {
    let (path, query) = match request.path.split_once('?') {
        Some((path, query)) => (path, query),
        None => (request.path.as_str(), ""),
    };
    // Trailing slashes are not significant
    let path = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    let response = match (request.method.as_str(), path) {
        ("OPTIONS", _) => handle_preflight(),
        ("POST", "/generate_project") => handle_generate_project(request, state),
        ("GET", "/open_in_codespaces") => handle_open_in_codespaces(query, state),
        ("POST", "/open_existing_repo") => handle_open_existing_repo(request),
        ("GET", "/health") => handle_health(state),
        _ => json_error(404, "Not found"),
    };
    with_cors_headers(response)
}

/// Handle GET /health
fn handle_health(state: &ServerState) -> HttpResponse {
    json_response(
        200,
        &HealthResponse {
            status: "ok".to_string(),
            version: state.version.clone(),
            uptime_secs: state.uptime_secs(),
        },
    )
}

/// CORS preflight; browsers send one before every cross-origin POST
fn handle_preflight() -> HttpResponse {
    HttpResponse {
        status: 204,
        headers: vec![
            (
                "Access-Control-Allow-Methods".to_string(),
                "GET, POST, OPTIONS".to_string(),
            ),
            (
                "Access-Control-Allow-Headers".to_string(),
                "Content-Type, Authorization".to_string(),
            ),
            ("Access-Control-Max-Age".to_string(), "86400".to_string()),
        ],
        body: Vec::new(),
    }
}

/// Handle POST /generate_project/
fn handle_generate_project(request: &HttpRequest, state: &ServerState) -> HttpResponse {
    if request.body.is_empty() {
        return json_error(400, "Missing request body");
    }

    let body: ProjectRequest = match serde_json::from_slice(&request.body) {
        Ok(req) => req,
        Err(e) => return json_error(400, &format!("Invalid JSON: {}", e)),
    };

    let raw_name = match body.project_name.as_deref() {
        Some(name) => name,
        None => return json_error(400, "Project name is required."),
    };
    let prompt = body.prompt.unwrap_or_default();

    let outcome = provision::create_or_reuse(
        &state.config,
        state.forge.as_ref(),
        &state.locks,
        raw_name,
        &prompt,
    );

    match outcome {
        Ok(Outcome::Reused { session_url, .. }) => json_response(
            200,
            &serde_json::json!({
                "message": "Project already exists.",
                "codespace_url": session_url,
            }),
        ),
        Ok(Outcome::Created { session_url, .. }) => json_response(
            200,
            &serde_json::json!({
                "message": "Project created successfully.",
                "codespace_url": session_url,
            }),
        ),
        Err(err) => provisioning_error(&err),
    }
}

/// Map a provisioning failure onto the wire: platform refusals keep their
/// upstream status, everything else is a 500 carrying the rendered chain.
fn provisioning_error(err: &anyhow::Error) -> HttpResponse {
    if let Some(refusal) = err.downcast_ref::<CreateRepoError>() {
        return json_error(refusal.status, &refusal.to_string());
    }
    json_error(500, &format!("{:#}", err))
}

/// Handle GET /open_in_codespaces/?project_name=...
fn handle_open_in_codespaces(query: &str, state: &ServerState) -> HttpResponse {
    let project_name = match query_param(query, "project_name") {
        Some(name) if !name.is_empty() => name,
        _ => return json_error(400, "Project name is required."),
    };

    // Name is deliberately not sanitized here; only existence is checked
    if !paths::project_dir(&state.config.projects_root, &project_name).exists() {
        return json_error(400, "Project does not exist.");
    }

    json_response(
        200,
        &serde_json::json!({
            "codespace_url": session::session_url(&state.config.github_username, &project_name),
        }),
    )
}

/// Handle POST /open_existing_repo/
fn handle_open_existing_repo(request: &HttpRequest) -> HttpResponse {
    if request.body.is_empty() {
        return json_error(400, "Missing request body");
    }

    let body: ProjectRequest = match serde_json::from_slice(&request.body) {
        Ok(req) => req,
        Err(e) => return json_error(400, &format!("Invalid JSON: {}", e)),
    };

    let repo_url = match body.repo_url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => return json_error(400, "Repository URL is required."),
    };

    match session::parse_repo_url(repo_url) {
        Some((owner, repo)) => json_response(
            200,
            &serde_json::json!({
                "codespace_url": session::session_url(&owner, &repo),
            }),
        ),
        None => json_error(400, "Invalid GitHub repository URL."),
    }
}

// === Transport: microserver accept loop ===

fn handle_connection(stream: &mut (impl std::io::Read + std::io::Write), state: &ServerState) {
    let request = match microserver::read_request(stream) {
        Some(Ok(request)) => request,
        Some(Err(msg)) => {
            let status = if msg.contains("too large") { 413 } else { 400 };
            let response = with_cors_headers(json_error(status, &msg));
            microserver::write_response(stream, &response);
            return;
        }
        None => return,
    };

    let response = route_request(&request, state);
    microserver::write_response(stream, &response);
}

/// Run the drydock daemon
pub fn run_server(options: ServeOptions) -> Result<()> {
    let config = Config::from_env(options.projects_root)?;
    let forge = GitHubForge::new(&config.github_token)?;

    if options.host != "127.0.0.1" && options.host != "localhost" {
        eprintln!(
            "WARNING: Binding to {} exposes the server to the network.",
            options.host
        );
        eprintln!("  Requests are unauthenticated and travel over plain HTTP.");
    }

    let addr = format!("{}:{}", options.host, options.port);
    let listener = TcpListener::bind(&addr).with_context(|| format!("Failed to bind {}", addr))?;

    let state = Arc::new(ServerState::new(config, Box::new(forge)));

    println!("🚀 drydock daemon starting...");
    println!("   Projects root: {}", state.config.projects_root.display());
    // local_addr, not addr: with --port 0 the OS picks the real port
    println!("   Listening on http://{}", listener.local_addr()?);
    println!("   Press Ctrl+C to stop\n");

    accept_loop(listener, state)
}

fn accept_loop(listener: TcpListener, state: Arc<ServerState>) -> ! {
    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    handle_connection(&mut stream, &state);
                    let _ = stream.shutdown(Shutdown::Write);
                });
            }
            Err(e) => eprintln!("TCP accept error: {}", e),
        }
    }
    std::process::exit(0);
}
