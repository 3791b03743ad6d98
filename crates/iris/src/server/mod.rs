//! HTTP boundary for summary generation.
//!
//! The CLI submits parsed datasets and instruction lists here; this side
//! formats the AI payload and talks to the completion service.

use std::sync::Arc;

use crate::gateway::SummaryGateway;

pub mod handlers;
pub mod routing;
pub mod startup;
pub mod types;

/// Shared state injected into handlers.
#[derive(Clone)]
pub struct AppState {
  pub gateway: Arc<dyn SummaryGateway>,
  pub model: String,
}
