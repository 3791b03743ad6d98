//! Builds the two-message AI request payload from a dataset and the active
//! instruction strings.

use serde::{Deserialize, Serialize};

use crate::tabular::TabularData;

/// Fixed framing for the text-completion service.
pub const SYSTEM_MESSAGE: &str = "You are an expert data analyst. Your task is to analyze the following CSV data and provide a comprehensive summary.";

/// Data rows beyond this count are elided from the request body.
pub const MAX_PROMPT_ROWS: usize = 100;

/// A fully rendered summarization request: one system message and one user
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
  pub system: String,
  pub user: String,
}

/// Build the complete request payload for one summarization attempt.
///
/// Pure transformation over already-validated data; there is no failure
/// mode here.
pub fn build_request(data: &TabularData, instructions: &[String]) -> SummaryRequest {
  let mut user = render_dataset(data);
  user.push('\n');

  if instructions.is_empty() {
    user.push_str("Please provide a comprehensive summary of this data.");
  } else {
    user.push_str("Please incorporate the following instructions in your summary:\n");
    for (index, instruction) in instructions.iter().enumerate() {
      user.push_str(&format!("{}. {}\n", index + 1, instruction));
    }
  }

  SummaryRequest { system: SYSTEM_MESSAGE.to_string(), user }
}

/// Render the dataset as comma-joined lines, capped at [`MAX_PROMPT_ROWS`].
///
/// Values are joined with a plain comma and no quoting, so embedded commas
/// do not survive the trip. The note line only appears when rows were
/// elided.
fn render_dataset(data: &TabularData) -> String {
  let mut out = data.headers.join(",");
  out.push('\n');

  let shown = data.rows.len().min(MAX_PROMPT_ROWS);
  for row in &data.rows[..shown] {
    out.push_str(&row.join(","));
    out.push('\n');
  }

  if data.rows.len() > shown {
    out.push('\n');
    out.push_str(&format!(
      "(Note: Only showing first {} rows out of {} total rows)",
      shown,
      data.rows.len()
    ));
    out.push('\n');
  }

  out
}
