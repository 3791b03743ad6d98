//! Ordered, toggleable instruction entries driving summary refinement.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{SessionStore, KEY_PROMPTS};

const PROMPT_SCHEMA_VERSION: u32 = 1;

/// A single named instruction that can be toggled into the next
/// summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
  pub id: Uuid,
  pub name: String,
  pub text: String,
  pub is_active: bool,
}

impl PromptEntry {
  fn placeholder(position: usize, is_active: bool) -> Self {
    Self {
      id: Uuid::new_v4(),
      name: format!("Prompt {position}"),
      text: String::new(),
      is_active,
    }
  }
}

/// Versioned envelope the prompt set is persisted under.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedPrompts {
  version: u32,
  entries: Vec<PromptEntry>,
}

/// Pre-versioning persisted entry: early sessions saved a bare array, and
/// the oldest of those predate the `name` field.
#[derive(Debug, Deserialize)]
struct LegacyEntry {
  id: Uuid,
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  text: String,
  #[serde(default)]
  is_active: bool,
}

/// Manages the prompt set and mirrors every mutation into the session
/// store.
pub struct PromptManager {
  entries: Vec<PromptEntry>,
  store: SessionStore,
}

impl PromptManager {
  /// Load the persisted prompt set, migrating older payloads once here, or
  /// start from the two default entries.
  pub fn load(store: SessionStore) -> Self {
    let mut entries = match store.load::<serde_json::Value>(KEY_PROMPTS) {
      Some(raw) => migrate(raw),
      None => default_entries(),
    };
    if entries.is_empty() {
      entries = default_entries();
    }

    let manager = Self { entries, store };
    manager.persist();
    manager
  }

  pub fn entries(&self) -> &[PromptEntry] {
    &self.entries
  }

  /// Append a fresh entry named after its position, inactive and empty.
  pub fn add_entry(&mut self) -> Uuid {
    let entry = PromptEntry::placeholder(self.entries.len() + 1, false);
    let id = entry.id;
    self.entries.push(entry);
    self.persist();
    id
  }

  /// Remove the matching entry unless it is the last one remaining, in
  /// which case the call is a no-op.
  pub fn remove_entry(&mut self, id: Uuid) {
    if self.entries.len() <= 1 {
      return;
    }

    let before = self.entries.len();
    self.entries.retain(|entry| entry.id != id);
    if self.entries.len() != before {
      self.persist();
    }
  }

  /// Replace an entry's instruction text. Unknown ids are a no-op.
  pub fn set_text(&mut self, id: Uuid, text: &str) {
    if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
      entry.text = text.to_string();
      self.persist();
    }
  }

  /// Rename an entry. Unknown ids are a no-op.
  pub fn set_name(&mut self, id: Uuid, name: &str) {
    if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
      entry.name = name.to_string();
      self.persist();
    }
  }

  /// Flip an entry's inclusion flag. Unknown ids are a no-op.
  pub fn toggle_active(&mut self, id: Uuid) {
    if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
      entry.is_active = !entry.is_active;
      self.persist();
    }
  }

  /// Texts of active entries with non-blank content, in display order.
  /// This exact list feeds the request formatter.
  pub fn active_instructions(&self) -> Vec<String> {
    self
      .entries
      .iter()
      .filter(|entry| entry.is_active && !entry.text.trim().is_empty())
      .map(|entry| entry.text.clone())
      .collect()
  }

  fn persist(&self) {
    let payload =
      PersistedPrompts { version: PROMPT_SCHEMA_VERSION, entries: self.entries.clone() };
    self.store.save(KEY_PROMPTS, &payload);
  }
}

fn default_entries() -> Vec<PromptEntry> {
  vec![PromptEntry::placeholder(1, true), PromptEntry::placeholder(2, false)]
}

/// Upgrade a persisted payload to the current schema. Versioned payloads
/// pass through; legacy bare arrays get `Prompt N` names backfilled.
/// Anything unrecognizable falls back to the defaults.
fn migrate(raw: serde_json::Value) -> Vec<PromptEntry> {
  if let Ok(persisted) = serde_json::from_value::<PersistedPrompts>(raw.clone()) {
    return persisted.entries;
  }

  match serde_json::from_value::<Vec<LegacyEntry>>(raw) {
    Ok(legacy) => legacy
      .into_iter()
      .enumerate()
      .map(|(index, entry)| PromptEntry {
        id: entry.id,
        name: entry.name.unwrap_or_else(|| format!("Prompt {}", index + 1)),
        text: entry.text,
        is_active: entry.is_active,
      })
      .collect(),
    Err(err) => {
      tracing::warn!("discarding unrecognizable prompt payload: {err}");
      default_entries()
    }
  }
}
