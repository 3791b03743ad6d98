//! CLI command implementations
//!
//! The CLI is a thin client: datasets are parsed and cached locally, while
//! summary generation goes through the summary server.

use anyhow::{anyhow, Result};
use colored::*;
use std::path::Path;
use uuid::Uuid;

use crate::cli::client::get_client;
use crate::cli::display;
use crate::cli::server_manager::ensure_server_running;
use crate::session::SessionStore;
use crate::tabular;
use crate::workbench::Workbench;

fn open_workbench() -> Result<Workbench> {
  let store = SessionStore::open()?;
  Ok(Workbench::open(store, Box::new(get_client())))
}

/// Parse a CSV file, snapshot it, and request the initial summary.
pub async fn upload(path: &Path) -> Result<()> {
  let file_name =
    path.file_name().and_then(|n| n.to_str()).unwrap_or("upload.csv").to_string();

  let data = tabular::read_csv_path(path)?;

  println!(
    "{} Loaded {} ({} rows, {} columns)",
    "✓".green(),
    file_name.cyan(),
    data.row_count(),
    data.column_count()
  );

  let mut workbench = open_workbench()?;

  if let Err(err) = ensure_server_running().await {
    tracing::warn!("summary server unavailable: {err}");
  }

  match workbench.upload(&file_name, data).await {
    Ok(()) => {
      println!();
      display::print_summary(workbench.summary());
    }
    Err(err) => {
      println!("{} Failed to generate summary. Please try again.", "✗".red());
      println!("  {}", err.to_string().dimmed());
    }
  }

  Ok(())
}

/// Regenerate the summary using the active prompt instructions.
pub async fn generate() -> Result<()> {
  let mut workbench = open_workbench()?;

  if workbench.dataset().is_none() {
    return Err(anyhow!("No dataset loaded. Upload a CSV file first."));
  }

  if workbench.prompts().active_instructions().is_empty() {
    println!("{}", "No active prompts with text; requesting a plain summary.".yellow());
  }

  if let Err(err) = ensure_server_running().await {
    tracing::warn!("summary server unavailable: {err}");
  }

  match workbench.regenerate().await {
    Ok(()) => display::print_summary(workbench.summary()),
    Err(err) => {
      println!("{} Failed to generate summary. Please try again.", "✗".red());
      println!("  {}", err.to_string().dimmed());
    }
  }

  Ok(())
}

pub fn prompt_add() -> Result<()> {
  let mut workbench = open_workbench()?;
  let id = workbench.prompts_mut().add_entry();

  println!("{} Added prompt {}", "✓".green(), display::short_id(&id).yellow());
  Ok(())
}

pub fn prompt_remove(id: &str) -> Result<()> {
  let mut workbench = open_workbench()?;
  let target = resolve_prompt_id(&workbench, id)?;

  let before = workbench.prompts().entries().len();
  workbench.prompts_mut().remove_entry(target);

  if workbench.prompts().entries().len() == before {
    println!("{}", "The last remaining prompt cannot be removed.".yellow());
  } else {
    println!("{} Removed prompt {}", "✓".green(), display::short_id(&target).yellow());
  }
  Ok(())
}

pub fn prompt_text(id: &str, text: &str) -> Result<()> {
  let mut workbench = open_workbench()?;
  let target = resolve_prompt_id(&workbench, id)?;
  workbench.prompts_mut().set_text(target, text);

  println!("{} Updated prompt {}", "✓".green(), display::short_id(&target).yellow());
  Ok(())
}

pub fn prompt_name(id: &str, name: &str) -> Result<()> {
  let mut workbench = open_workbench()?;
  let target = resolve_prompt_id(&workbench, id)?;
  workbench.prompts_mut().set_name(target, name);

  println!("{} Renamed prompt {}", "✓".green(), display::short_id(&target).yellow());
  Ok(())
}

pub fn prompt_toggle(id: &str) -> Result<()> {
  let mut workbench = open_workbench()?;
  let target = resolve_prompt_id(&workbench, id)?;
  workbench.prompts_mut().toggle_active(target);

  let active = workbench
    .prompts()
    .entries()
    .iter()
    .find(|entry| entry.id == target)
    .map(|entry| entry.is_active)
    .unwrap_or(false);
  let state = if active { "active".green() } else { "inactive".normal() };

  println!("{} Prompt {} is now {}", "✓".green(), display::short_id(&target).yellow(), state);
  Ok(())
}

pub fn prompt_list() -> Result<()> {
  let workbench = open_workbench()?;
  display::print_prompts(workbench.prompts().entries());
  Ok(())
}

pub fn summary_show() -> Result<()> {
  let workbench = open_workbench()?;
  display::print_summary(workbench.summary());
  Ok(())
}

pub fn summary_edit(text: &str) -> Result<()> {
  let mut workbench = open_workbench()?;
  workbench.edit(text);

  println!("{} Summary updated", "✓".green());
  Ok(())
}

pub fn summary_reset() -> Result<()> {
  let mut workbench = open_workbench()?;
  workbench.reset();

  println!("{} Summary reset to the initial generation", "✓".green());
  Ok(())
}

/// List recently uploaded file names, newest first.
pub fn recent() -> Result<()> {
  let store = SessionStore::open()?;
  let files = store.recent_files();

  if files.is_empty() {
    println!("No recent uploads.");
    return Ok(());
  }

  println!("Recent uploads:");
  for name in files {
    println!("  {name}");
  }
  Ok(())
}

/// Drop the cached session wholesale.
pub fn clear() -> Result<()> {
  let store = SessionStore::open()?;
  store.clear();

  println!("{} Session cleared", "✓".green());
  Ok(())
}

/// Accept a full prompt id or a unique prefix of one.
fn resolve_prompt_id(workbench: &Workbench, input: &str) -> Result<Uuid> {
  if let Ok(id) = Uuid::parse_str(input) {
    if workbench.prompts().entries().iter().any(|entry| entry.id == id) {
      return Ok(id);
    }
    return Err(anyhow!("No prompt matches id '{input}'"));
  }

  let matches: Vec<Uuid> = workbench
    .prompts()
    .entries()
    .iter()
    .filter(|entry| entry.id.to_string().starts_with(input))
    .map(|entry| entry.id)
    .collect();

  match matches.as_slice() {
    [id] => Ok(*id),
    [] => Err(anyhow!("No prompt matches id '{input}'")),
    _ => Err(anyhow!("Prompt id '{input}' is ambiguous")),
  }
}
