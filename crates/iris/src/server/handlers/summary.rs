//! Summary generation endpoint handler

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::Json as ResponseJson;

use crate::formatter;
use crate::server::types::{
  ErrorResponse, GenerateSummaryRequest, GenerateSummaryResponse, RawTabular,
};
use crate::server::AppState;
use crate::tabular::TabularData;

/// POST /summary/generate - format the dataset and instructions into an AI
/// request and return the completion text.
pub async fn generate_summary(
  State(state): State<AppState>,
  Json(request): Json<GenerateSummaryRequest>,
) -> Result<ResponseJson<GenerateSummaryResponse>, (StatusCode, ResponseJson<ErrorResponse>)> {
  let data = match validate(request.data) {
    Some(data) => data,
    None => {
      return Err((
        StatusCode::BAD_REQUEST,
        ResponseJson(ErrorResponse { error: "Invalid request. CSV data is required.".to_string() }),
      ));
    }
  };

  let summary_request = formatter::build_request(&data, &request.prompts);

  tracing::info!(rows = data.rows.len(), prompts = request.prompts.len(), "generating summary");

  match state.gateway.complete(&summary_request).await {
    Ok(summary) => Ok(ResponseJson(GenerateSummaryResponse { summary })),
    Err(err) => {
      tracing::error!("summary generation failed: {err}");
      Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        ResponseJson(ErrorResponse { error: "Failed to generate summary with AI.".to_string() }),
      ))
    }
  }
}

/// Reject requests lacking the dataset fields before any processing
/// happens.
fn validate(data: Option<RawTabular>) -> Option<TabularData> {
  let data = data?;
  let headers = data.headers?;
  let rows = data.rows?;
  Some(TabularData { headers, rows })
}
