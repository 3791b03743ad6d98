use async_trait::async_trait;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use std::sync::{Arc, Mutex};

use iris::formatter::SummaryRequest;
use iris::gateway::{GatewayError, SummaryGateway};
use iris::server::handlers::summary::generate_summary;
use iris::server::types::{GenerateSummaryRequest, RawTabular};
use iris::server::AppState;

/// Gateway stand-in answering with one scripted response and recording the
/// formatted requests it receives.
struct StubGateway {
  response: Mutex<Option<Result<String, GatewayError>>>,
  seen: Mutex<Vec<SummaryRequest>>,
}

impl StubGateway {
  fn with(response: Result<String, GatewayError>) -> Arc<Self> {
    Arc::new(Self { response: Mutex::new(Some(response)), seen: Mutex::new(Vec::new()) })
  }

  fn silent() -> Arc<Self> {
    Arc::new(Self { response: Mutex::new(None), seen: Mutex::new(Vec::new()) })
  }
}

#[async_trait]
impl SummaryGateway for StubGateway {
  async fn complete(&self, request: &SummaryRequest) -> Result<String, GatewayError> {
    self.seen.lock().unwrap().push(request.clone());
    self
      .response
      .lock()
      .unwrap()
      .take()
      .unwrap_or_else(|| Ok("unscripted response".to_string()))
  }
}

fn state_with(gateway: Arc<StubGateway>) -> AppState {
  AppState { gateway, model: "gpt-4o".to_string() }
}

fn two_by_two() -> RawTabular {
  RawTabular {
    headers: Some(vec!["a".to_string(), "b".to_string()]),
    rows: Some(vec![
      vec!["1".to_string(), "2".to_string()],
      vec!["3".to_string(), "4".to_string()],
    ]),
  }
}

#[tokio::test]
async fn missing_dataset_is_a_client_error() {
  let gateway = StubGateway::silent();
  let request = GenerateSummaryRequest { data: None, prompts: Vec::new() };

  let result = generate_summary(State(state_with(gateway.clone())), Json(request)).await;

  let (status, body) = result.unwrap_err();
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body.0.error, "Invalid request. CSV data is required.");
  // No partial processing happened.
  assert!(gateway.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_headers_is_a_client_error() {
  let gateway = StubGateway::silent();
  let data = RawTabular { headers: None, rows: Some(Vec::new()) };
  let request = GenerateSummaryRequest { data: Some(data), prompts: Vec::new() };

  let result = generate_summary(State(state_with(gateway)), Json(request)).await;

  let (status, _body) = result.unwrap_err();
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_rows_is_a_client_error() {
  let gateway = StubGateway::silent();
  let data = RawTabular { headers: Some(vec!["a".to_string()]), rows: None };
  let request = GenerateSummaryRequest { data: Some(data), prompts: Vec::new() };

  let result = generate_summary(State(state_with(gateway)), Json(request)).await;

  let (status, _body) = result.unwrap_err();
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn success_formats_and_returns_summary() {
  let gateway = StubGateway::with(Ok("A fine summary.".to_string()));
  let request = GenerateSummaryRequest {
    data: Some(two_by_two()),
    prompts: vec!["Focus on column b".to_string()],
  };

  let response =
    generate_summary(State(state_with(gateway.clone())), Json(request)).await.unwrap();
  assert_eq!(response.0.summary, "A fine summary.");

  let seen = gateway.seen.lock().unwrap();
  assert_eq!(seen.len(), 1);
  assert!(seen[0].user.starts_with("a,b\n1,2\n3,4\n"));
  assert!(seen[0].user.ends_with("1. Focus on column b\n"));
}

#[tokio::test]
async fn upstream_failure_is_a_server_error() {
  let gateway = StubGateway::with(Err(GatewayError::Service {
    status: 429,
    body: "rate limited".to_string(),
  }));
  let request = GenerateSummaryRequest { data: Some(two_by_two()), prompts: Vec::new() };

  let result = generate_summary(State(state_with(gateway)), Json(request)).await;

  let (status, body) = result.unwrap_err();
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body.0.error, "Failed to generate summary with AI.");
}
