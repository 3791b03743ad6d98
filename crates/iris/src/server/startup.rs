//! Summary server startup and configuration

use anyhow::Result;
use axum::serve;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::gateway::{GatewayConfig, OpenAiGateway};
use crate::server::routing::create_router;
use crate::server::AppState;

/// Start the summary server with the given gateway configuration.
pub async fn start_server(addr: SocketAddr, config: GatewayConfig) -> Result<()> {
  let model = config.model.clone();
  let state = AppState { gateway: Arc::new(OpenAiGateway::new(config)), model };

  let app = create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await?;
  tracing::info!("summary server listening on {addr}");

  serve(listener, app).await?;
  Ok(())
}
