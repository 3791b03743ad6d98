//! Iris Summary Server
//!
//! HTTP boundary that accepts parsed CSV datasets plus instruction lists
//! and returns AI-generated summaries.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use iris::gateway::GatewayConfig;
use iris::server::startup::start_server;

#[derive(Parser)]
#[command(name = "iris_server")]
#[command(about = "Iris summary generation server")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, default_value = "127.0.0.1:3000")]
  bind: SocketAddr,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("debug,hyper=info,reqwest=info")
  } else {
    EnvFilter::new("iris=info,tower_http=info,warn")
  };

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Iris Summary Server v{}", env!("CARGO_PKG_VERSION"));
  start_server(args.bind, GatewayConfig::from_env()).await?;

  Ok(())
}
