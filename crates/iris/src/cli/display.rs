//! Display formatting utilities for CLI output

use colored::*;

use crate::prompts::PromptEntry;
use crate::workbench::SummaryState;

/// Print the summary panel: any error first, then the text and its
/// character count.
pub fn print_summary(summary: &SummaryState) {
  if let Some(error) = &summary.last_error {
    println!("{} {}", "✗".red(), error.red());
  }

  if summary.current.is_empty() {
    println!("{}", "No summary generated yet".dimmed());
    return;
  }

  println!("{}", summary.current);
  println!();
  println!("{}", format!("{} characters", summary.current.len()).dimmed());
}

/// Print the prompt set with activity markers, short ids, names, and text.
pub fn print_prompts(entries: &[PromptEntry]) {
  for entry in entries {
    let marker = if entry.is_active { "[x]".green() } else { "[ ]".normal() };
    println!("{} {} {}", marker, short_id(&entry.id).yellow(), entry.name.bold());

    if !entry.text.trim().is_empty() {
      for line in entry.text.lines() {
        println!("             {}", line.dimmed());
      }
    }
  }
}

/// First eight hex digits of a prompt id; enough to address entries from
/// the command line.
pub fn short_id(id: &uuid::Uuid) -> String {
  id.to_string()[..8].to_string()
}
