//! HTTP client for the summary API
//!
//! Lets the CLI run as a thin client against a local or remote summary
//! server.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;

use crate::gateway::GatewayError;
use crate::server::types::{GenerateSummaryRequest, GenerateSummaryResponse, RawTabular};
use crate::tabular::TabularData;
use crate::workbench::Summarizer;

/// Configuration for the summary HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the summary server (e.g., "http://localhost:3000")
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: "http://localhost:3000".to_string(), timeout_secs: 120 }
  }
}

/// HTTP client for the summary API
pub struct SummaryClient {
  client: Client,
  config: ClientConfig,
}

impl Default for SummaryClient {
  fn default() -> Self {
    Self::new()
  }
}

impl SummaryClient {
  /// Create a new client with default configuration
  pub fn new() -> Self {
    Self::with_config(ClientConfig::default())
  }

  /// Create a new client with custom configuration
  pub fn with_config(config: ClientConfig) -> Self {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .expect("Failed to create HTTP client");

    Self { client, config }
  }

  /// Submit a dataset and instruction list for summarization.
  pub async fn generate_summary(
    &self,
    data: &TabularData,
    prompts: &[String],
  ) -> Result<String, GatewayError> {
    let request = GenerateSummaryRequest {
      data: Some(RawTabular {
        headers: Some(data.headers.clone()),
        rows: Some(data.rows.clone()),
      }),
      prompts: prompts.to_vec(),
    };

    let url = format!("{}/summary/generate", self.config.base_url);
    let response = self.client.post(&url).json(&request).send().await?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(GatewayError::Service { status, body });
    }

    let result: GenerateSummaryResponse = response.json().await?;
    Ok(result.summary)
  }

  /// Check if the server is reachable
  pub async fn health_check(&self) -> Result<()> {
    let url = format!("{}/status", self.config.base_url);
    let response = timeout(
      Duration::from_secs(5), // Shorter timeout for health checks
      self.client.get(&url).send(),
    )
    .await??;

    if response.status().is_success() {
      Ok(())
    } else {
      Err(anyhow!("Server health check failed: {}", response.status()))
    }
  }
}

#[async_trait]
impl Summarizer for SummaryClient {
  async fn summarize(
    &self,
    data: &TabularData,
    instructions: &[String],
  ) -> Result<String, GatewayError> {
    self.generate_summary(data, instructions).await
  }
}

/// Get the configured client (checks environment variables)
pub fn get_client() -> SummaryClient {
  let base_url =
    std::env::var("IRIS_SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

  let timeout_secs = std::env::var("IRIS_TIMEOUT_SECS")
    .unwrap_or_else(|_| "120".to_string())
    .parse()
    .unwrap_or(120);

  SummaryClient::with_config(ClientConfig { base_url, timeout_secs })
}
