use iris::formatter::SummaryRequest;
use iris::gateway::{
  cancellation, GatewayConfig, GatewayError, OpenAiGateway, SummaryGateway,
  EMPTY_COMPLETION_FALLBACK,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn request() -> SummaryRequest {
  SummaryRequest {
    system: "You are an expert data analyst.".to_string(),
    user: "a,b\n1,2\n\nPlease provide a comprehensive summary of this data.".to_string(),
  }
}

fn config_for(addr: std::net::SocketAddr) -> GatewayConfig {
  GatewayConfig {
    api_base: format!("http://{addr}/v1"),
    api_key: "test-key".to_string(),
    timeout_secs: 10,
    ..GatewayConfig::default()
  }
}

/// Serve exactly one canned HTTP response on a fresh listener, returning
/// the address to point the gateway at.
async fn one_shot_server(status_line: &'static str, body: &'static str) -> std::net::SocketAddr {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  tokio::spawn(async move {
    if let Ok((mut socket, _)) = listener.accept().await {
      read_http_request(&mut socket).await;
      let response = format!(
        "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
      );
      let _ = socket.write_all(response.as_bytes()).await;
    }
  });

  addr
}

/// Read until the full request (headers plus content-length body) arrived.
async fn read_http_request(socket: &mut TcpStream) {
  let mut buf = Vec::new();
  let mut chunk = [0u8; 4096];

  loop {
    let read = match socket.read(&mut chunk).await {
      Ok(0) | Err(_) => return,
      Ok(read) => read,
    };
    buf.extend_from_slice(&chunk[..read]);

    if let Some(header_end) = find_subslice(&buf, b"\r\n\r\n") {
      let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
      let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

      if buf.len() >= header_end + 4 + content_length {
        return;
      }
    }
  }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  haystack.windows(needle.len()).position(|window| window == needle)
}

#[test]
fn default_config_matches_service_defaults() {
  let config = GatewayConfig::default();

  assert_eq!(config.model, "gpt-4o");
  assert!((config.temperature - 0.7).abs() < f32::EPSILON);
  assert_eq!(config.max_tokens, 1500);
}

#[tokio::test]
async fn completion_text_is_returned() {
  let addr = one_shot_server(
    "HTTP/1.1 200 OK",
    r#"{"choices":[{"message":{"content":"A solid summary."}}]}"#,
  )
  .await;

  let gateway = OpenAiGateway::new(config_for(addr));
  let summary = gateway.complete(&request()).await.unwrap();

  assert_eq!(summary, "A solid summary.");
}

#[tokio::test]
async fn empty_completion_falls_back_to_literal() {
  let addr =
    one_shot_server("HTTP/1.1 200 OK", r#"{"choices":[{"message":{"content":""}}]}"#).await;

  let gateway = OpenAiGateway::new(config_for(addr));
  let summary = gateway.complete(&request()).await.unwrap();

  assert_eq!(summary, EMPTY_COMPLETION_FALLBACK);
}

#[tokio::test]
async fn absent_choices_fall_back_to_literal() {
  let addr = one_shot_server("HTTP/1.1 200 OK", r#"{"choices":[]}"#).await;

  let gateway = OpenAiGateway::new(config_for(addr));
  let summary = gateway.complete(&request()).await.unwrap();

  assert_eq!(summary, EMPTY_COMPLETION_FALLBACK);
}

#[tokio::test]
async fn non_success_status_is_a_service_error() {
  let addr = one_shot_server(
    "HTTP/1.1 500 Internal Server Error",
    r#"{"error":{"message":"boom"}}"#,
  )
  .await;

  let gateway = OpenAiGateway::new(config_for(addr));
  let result = gateway.complete(&request()).await;

  match result {
    Err(GatewayError::Service { status, .. }) => assert_eq!(status, 500),
    other => panic!("expected a service error, got {other:?}"),
  }
}

#[tokio::test]
async fn cancel_aborts_an_in_flight_call() {
  // A listener that accepts connections but never answers.
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    let mut held = Vec::new();
    loop {
      match listener.accept().await {
        Ok((socket, _)) => held.push(socket),
        Err(_) => return,
      }
    }
  });

  let gateway = OpenAiGateway::new(config_for(addr));
  let payload = request();

  let (handle, token) = cancellation();
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();
  });

  match gateway.complete_cancellable(&payload, token).await {
    Err(GatewayError::Cancelled) => {}
    other => panic!("expected cancellation, got {other:?}"),
  }
}
