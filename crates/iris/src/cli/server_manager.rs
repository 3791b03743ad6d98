//! Automatic summary server startup for the CLI
//!
//! Summarization commands need a reachable server; when the configured one
//! is down and it points at localhost, the CLI starts a local `iris_server`
//! in the background and waits for it to come up.

use anyhow::{anyhow, Result};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;

use crate::cli::client::{get_client, SummaryClient};

const SERVER_STARTUP_TIMEOUT_SECS: u64 = 30;
const SERVER_CHECK_INTERVAL_MS: u64 = 500;

/// Manages the local summary server lifecycle
pub struct ServerManager {
  client: SummaryClient,
}

impl Default for ServerManager {
  fn default() -> Self {
    Self::new()
  }
}

impl ServerManager {
  pub fn new() -> Self {
    Self { client: get_client() }
  }

  /// Ensure the server is running, starting it if necessary.
  pub async fn ensure_server_running(&self) -> Result<()> {
    if self.client.health_check().await.is_ok() {
      return Ok(());
    }

    if !autostart_enabled() {
      return Err(anyhow!("Summary server is not reachable and autostart is disabled"));
    }

    tracing::info!("starting local summary server");
    self.start_server()?;
    self.wait_for_server().await?;

    Ok(())
  }

  /// Start the server in the background, inheriting the environment so the
  /// gateway picks up its API configuration.
  fn start_server(&self) -> Result<Child> {
    let server_binary = find_server_binary()?;

    let mut cmd = Command::new(server_binary);
    cmd
      .args(["--bind", "127.0.0.1:3000"])
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .stdin(Stdio::null())
      .envs(std::env::vars());

    let child = cmd.spawn().map_err(|e| anyhow!("Failed to start summary server: {}", e))?;
    Ok(child)
  }

  /// Wait for the server to answer its health check.
  async fn wait_for_server(&self) -> Result<()> {
    let max_attempts = (SERVER_STARTUP_TIMEOUT_SECS * 1000) / SERVER_CHECK_INTERVAL_MS;
    let mut attempts = 0;

    while attempts < max_attempts {
      if self.client.health_check().await.is_ok() {
        return Ok(());
      }

      sleep(Duration::from_millis(SERVER_CHECK_INTERVAL_MS)).await;
      attempts += 1;
    }

    Err(anyhow!("Server failed to start within {SERVER_STARTUP_TIMEOUT_SECS} seconds"))
  }
}

/// Locate the `iris_server` binary: next to the CLI binary first, then the
/// local build directories, then PATH.
fn find_server_binary() -> Result<String> {
  if let Ok(current) = std::env::current_exe() {
    let sibling = current.with_file_name("iris_server");
    if sibling.exists() {
      return Ok(sibling.to_string_lossy().to_string());
    }
  }

  for path in ["target/release/iris_server", "target/debug/iris_server"] {
    if std::fs::metadata(path).is_ok() {
      return Ok(path.to_string());
    }
  }

  if let Ok(output) = Command::new("which").arg("iris_server").output() {
    if output.status.success() {
      let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
      if !path.is_empty() {
        return Ok(path);
      }
    }
  }

  Err(anyhow!("iris_server binary not found. Build it or add it to PATH."))
}

/// Autostart is on unless `IRIS_SERVER_AUTOSTART` is set to 0/false/no.
fn autostart_enabled() -> bool {
  match std::env::var("IRIS_SERVER_AUTOSTART") {
    Ok(value) => !matches!(value.trim(), "0" | "false" | "no"),
    Err(_) => true,
  }
}

/// Ensure a summary server is reachable before a summarization call.
pub async fn ensure_server_running() -> Result<()> {
  ServerManager::new().ensure_server_running().await
}
