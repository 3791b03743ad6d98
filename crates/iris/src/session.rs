//! Best-effort key-scoped persistence for the last workbench session.
//!
//! Persistence here is advisory: failures are logged and swallowed so the
//! primary flow never blocks on a bad disk or a corrupt payload.

use anyhow::{anyhow, Result};
use dirs::home_dir;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Dataset snapshot from the last upload.
pub const KEY_CSV_DATA: &str = "csv-data";
/// Summary produced by the first prompt-less request after an upload.
pub const KEY_SUMMARY: &str = "summary";
/// The persisted prompt set.
pub const KEY_PROMPTS: &str = "prompts";
/// The editable summary currently on display.
pub const KEY_CURRENT_SUMMARY: &str = "current-summary";
/// Bounded list of recently uploaded file names.
pub const KEY_RECENT_FILE_NAMES: &str = "recent-file-names";

/// How many uploaded file names are retained for display.
pub const RECENT_FILE_CAP: usize = 5;

const SESSION_KEYS: [&str; 5] =
  [KEY_CSV_DATA, KEY_SUMMARY, KEY_PROMPTS, KEY_CURRENT_SUMMARY, KEY_RECENT_FILE_NAMES];

/// File-backed key/value store holding one JSON document per key.
#[derive(Debug, Clone)]
pub struct SessionStore {
  root: PathBuf,
}

impl SessionStore {
  /// Open the store at the default root (`~/.iris/session`), honoring the
  /// `IRIS_SESSION_ROOT` override.
  pub fn open() -> Result<Self> {
    Ok(Self { root: session_root()? })
  }

  /// Open a store rooted at an explicit directory.
  pub fn at(root: PathBuf) -> Self {
    Self { root }
  }

  fn key_path(&self, key: &str) -> PathBuf {
    self.root.join(format!("{key}.json"))
  }

  /// Serialize and store a value. Failures are logged, never propagated.
  pub fn save<T: Serialize>(&self, key: &str, value: &T) {
    if let Err(err) = self.try_save(key, value) {
      tracing::warn!(key, "session save failed: {err}");
    }
  }

  fn try_save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
    fs::create_dir_all(&self.root)?;
    let payload = serde_json::to_string_pretty(value)?;
    fs::write(self.key_path(key), payload)?;
    Ok(())
  }

  /// Load and deserialize a value. Missing keys and corrupt payloads both
  /// come back as `None`; corruption is logged.
  pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let path = self.key_path(key);
    if !path.exists() {
      return None;
    }

    let raw = match fs::read_to_string(&path) {
      Ok(raw) => raw,
      Err(err) => {
        tracing::warn!(key, "session read failed: {err}");
        return None;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(value) => Some(value),
      Err(err) => {
        tracing::warn!(key, "discarding corrupt session payload: {err}");
        None
      }
    }
  }

  /// Remove a single key. Missing files are fine.
  pub fn remove(&self, key: &str) {
    let path = self.key_path(key);
    if path.exists() {
      if let Err(err) = fs::remove_file(&path) {
        tracing::warn!(key, "session remove failed: {err}");
      }
    }
  }

  /// Drop every session key.
  pub fn clear(&self) {
    for key in SESSION_KEYS {
      self.remove(key);
    }
  }

  /// Record an uploaded file name: newest first, duplicates moved to the
  /// front rather than re-inserted, capped at [`RECENT_FILE_CAP`].
  pub fn record_recent_file(&self, name: &str) {
    let mut recent: Vec<String> = self.load(KEY_RECENT_FILE_NAMES).unwrap_or_default();
    recent.retain(|existing| existing != name);
    recent.insert(0, name.to_string());
    recent.truncate(RECENT_FILE_CAP);
    self.save(KEY_RECENT_FILE_NAMES, &recent);
  }

  pub fn recent_files(&self) -> Vec<String> {
    self.load(KEY_RECENT_FILE_NAMES).unwrap_or_default()
  }
}

/// Get the session root directory (`~/.iris/session`).
///
/// Tests and alternate installs can override the root via the
/// `IRIS_SESSION_ROOT` env var.
pub fn session_root() -> Result<PathBuf> {
  if let Ok(custom_root) = std::env::var("IRIS_SESSION_ROOT") {
    return Ok(PathBuf::from(custom_root));
  }

  let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
  Ok(home.join(".iris").join("session"))
}
