//! Client-side orchestration of one summarization session.
//!
//! The workbench owns the parsed dataset, the summary state, and the prompt
//! manager, and drives the upload → initial summary → refine → reset cycle.
//! Generation runs one request at a time; `is_loading` is resolved to false
//! on both the success and the failure path of every attempt.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::GatewayError;
use crate::prompts::PromptManager;
use crate::session::{SessionStore, KEY_CSV_DATA, KEY_CURRENT_SUMMARY, KEY_SUMMARY};
use crate::tabular::TabularData;

/// Boundary the workbench submits datasets through; implemented by the HTTP
/// client against the summary server and by scripted stand-ins in tests.
#[async_trait]
pub trait Summarizer: Send + Sync {
  async fn summarize(
    &self,
    data: &TabularData,
    instructions: &[String],
  ) -> Result<String, GatewayError>;
}

/// Dataset snapshot persisted under the `csv-data` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSnapshot {
  pub file_name: String,
  pub uploaded_at: DateTime<Utc>,
  pub data: TabularData,
}

/// The displayed summary and its generation status.
///
/// `initial` is set once per upload; `current` tracks generations and
/// direct edits and snaps back to `initial` on reset.
#[derive(Debug, Clone, Default)]
pub struct SummaryState {
  pub initial: String,
  pub current: String,
  pub is_loading: bool,
  pub last_error: Option<String>,
}

pub struct Workbench {
  store: SessionStore,
  summarizer: Box<dyn Summarizer>,
  dataset: Option<DatasetSnapshot>,
  summary: SummaryState,
  prompts: PromptManager,
}

impl Workbench {
  /// Rehydrate the previous session from the store, or start empty.
  pub fn open(store: SessionStore, summarizer: Box<dyn Summarizer>) -> Self {
    let dataset: Option<DatasetSnapshot> = store.load(KEY_CSV_DATA);
    let initial: String = store.load(KEY_SUMMARY).unwrap_or_default();
    let current: String = store.load(KEY_CURRENT_SUMMARY).unwrap_or_else(|| initial.clone());
    let prompts = PromptManager::load(store.clone());

    Self {
      summarizer,
      dataset,
      summary: SummaryState { initial, current, is_loading: false, last_error: None },
      prompts,
      store,
    }
  }

  pub fn dataset(&self) -> Option<&DatasetSnapshot> {
    self.dataset.as_ref()
  }

  pub fn summary(&self) -> &SummaryState {
    &self.summary
  }

  pub fn prompts(&self) -> &PromptManager {
    &self.prompts
  }

  pub fn prompts_mut(&mut self) -> &mut PromptManager {
    &mut self.prompts
  }

  /// Ingest a new dataset and request its prompt-less initial summary.
  ///
  /// The snapshot replaces any previous dataset even when generation fails;
  /// the failure is recorded on the summary state instead of unwinding, so
  /// the previously displayed summary stays intact for the user.
  pub async fn upload(&mut self, file_name: &str, data: TabularData) -> Result<(), GatewayError> {
    let snapshot =
      DatasetSnapshot { file_name: file_name.to_string(), uploaded_at: Utc::now(), data };
    self.store.save(KEY_CSV_DATA, &snapshot);
    self.store.record_recent_file(file_name);

    self.summary.is_loading = true;
    self.summary.last_error = None;

    let result = self.summarizer.summarize(&snapshot.data, &[]).await;
    self.dataset = Some(snapshot);
    self.summary.is_loading = false;

    match result {
      Ok(summary) => {
        self.summary.initial = summary.clone();
        self.summary.current = summary;
        self.store.save(KEY_SUMMARY, &self.summary.initial);
        self.store.save(KEY_CURRENT_SUMMARY, &self.summary.current);
        Ok(())
      }
      Err(err) => {
        self.summary.last_error = Some(err.to_string());
        Err(err)
      }
    }
  }

  /// Re-run summarization with the currently active instructions,
  /// replacing only the displayed summary. Without a dataset this is a
  /// no-op.
  pub async fn regenerate(&mut self) -> Result<(), GatewayError> {
    let Some(snapshot) = self.dataset.as_ref() else {
      return Ok(());
    };

    let instructions = self.prompts.active_instructions();

    self.summary.is_loading = true;
    self.summary.last_error = None;

    let result = self.summarizer.summarize(&snapshot.data, &instructions).await;
    self.summary.is_loading = false;

    match result {
      Ok(summary) => {
        self.summary.current = summary;
        self.store.save(KEY_CURRENT_SUMMARY, &self.summary.current);
        Ok(())
      }
      Err(err) => {
        self.summary.last_error = Some(err.to_string());
        Err(err)
      }
    }
  }

  /// Restore the displayed summary to the initial generation. Idempotent;
  /// before any generation this leaves the empty default in place.
  pub fn reset(&mut self) {
    self.summary.current = self.summary.initial.clone();
    self.store.save(KEY_CURRENT_SUMMARY, &self.summary.current);
  }

  /// Replace the displayed summary with user-edited text.
  pub fn edit(&mut self, text: &str) {
    self.summary.current = text.to_string();
    self.store.save(KEY_CURRENT_SUMMARY, &self.summary.current);
  }

  /// Forget the whole session: dataset, summaries, prompts, recents.
  pub fn clear(&mut self) {
    self.store.clear();
    self.dataset = None;
    self.summary = SummaryState::default();
    self.prompts = PromptManager::load(self.store.clone());
  }
}
