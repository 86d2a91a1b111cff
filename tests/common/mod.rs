//! Common test utilities for smart-pm integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.local/share/smart-pm/` directory, and `StubServer`, a
//! `wiremock` server standing in for the assistant API.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API URL nothing listens on.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:1/api";

/// A test environment with isolated data storage.
///
/// The `spm()` method returns a `Command` that sets `SPM_DATA_DIR`,
/// `SPM_CONFIG` and `SPM_API_URL` per invocation, making tests
/// parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    api_url: String,
}

impl TestEnv {
    /// Create a new test environment whose assistant is unreachable.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            api_url: UNREACHABLE_API.to_string(),
        }
    }

    /// Create a test environment talking to `server`.
    pub fn with_server(server: &StubServer) -> Self {
        Self {
            api_url: server.api_url(),
            ..Self::new()
        }
    }

    /// Get a Command for the spm binary with isolated data directory.
    pub fn spm(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_spm"));
        cmd.env("SPM_DATA_DIR", self.data_dir.path());
        cmd.env("SPM_CONFIG", self.config_path());
        cmd.env("SPM_API_URL", &self.api_url);
        cmd.env_remove("SPM_BACKEND");
        cmd.env_remove("SPM_LOG");
        cmd.env_remove("SPM_LOG_FORMAT");
        cmd
    }

    /// Run `spm` with `args` and parse its JSON stdout.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.spm().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "spm {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Path of the (initially missing) config file.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.path().join("config.toml")
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    /// Path of the persisted backlog file.
    pub fn backlog_path(&self) -> PathBuf {
        self.data_dir.path().join("smart-pm-backlog.json")
    }

    /// Write a file into the data directory and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.data_dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A request received by a `StubServer`.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub body: String,
}

/// Assistant API stand-in answering `POST /api<suffix>` routes.
///
/// Unrouted paths get a 404. The mock server lives on its own runtime so
/// the synchronous CLI tests can drive it.
pub struct StubServer {
    runtime: Runtime,
    server: MockServer,
}

impl StubServer {
    /// Start a server; `routes` maps path suffix to (status, JSON body).
    pub fn start(routes: &[(&str, u16, &str)]) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            for (suffix, status, body) in routes {
                Mock::given(method("POST"))
                    .and(path(format!("/api{}", suffix)))
                    .respond_with(
                        ResponseTemplate::new(*status)
                            .set_body_raw(body.as_bytes().to_vec(), "application/json"),
                    )
                    .mount(&server)
                    .await;
            }
            server
        });
        Self { runtime, server }
    }

    /// Base URL to hand to `spm`.
    pub fn api_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .map(|request| Recorded {
                path: request.url.path().to_string(),
                body: String::from_utf8_lossy(&request.body).into_owned(),
            })
            .collect()
    }
}
