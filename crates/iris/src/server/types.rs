//! Wire types for the summary API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /summary/generate`.
///
/// The dataset fields are optional so the handler can answer a proper
/// client error when they are missing, instead of a bare deserialization
/// rejection.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateSummaryRequest {
  pub data: Option<RawTabular>,

  /// Instruction strings to fold into the summary, in order.
  #[serde(default)]
  pub prompts: Vec<String>,
}

/// Dataset payload before validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct RawTabular {
  pub headers: Option<Vec<String>>,
  pub rows: Option<Vec<Vec<String>>>,
}

/// Success response for `POST /summary/generate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateSummaryResponse {
  pub summary: String,
}

/// Error response body for every non-2xx answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub error: String,
}

/// Response for the `/status` endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
  pub status: String,
  pub model: String,
  pub version: String,
}

/// Response for the `/version` endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
  pub version: String,
}
