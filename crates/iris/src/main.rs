use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use iris::cli::commands;

#[derive(Parser)]
#[command(name = "iris")]
#[command(
  about = "Iris - CSV Summarization Workbench\nUpload a CSV, get an AI summary, refine it with prompts"
)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Upload a CSV file and generate its initial summary
  Upload {
    /// Path to the CSV file
    path: PathBuf,
  },
  /// Regenerate the summary using the active prompts
  Generate,
  /// Manage the prompt set
  Prompt {
    #[command(subcommand)]
    command: PromptCommand,
  },
  /// Show, edit, or reset the current summary
  Summary {
    #[command(subcommand)]
    command: SummaryCommand,
  },
  /// List recently uploaded file names
  Recent,
  /// Clear the cached session
  Clear,
}

#[derive(Subcommand)]
enum PromptCommand {
  /// Append a new prompt entry
  Add,
  /// Remove a prompt entry (the last one is kept)
  Remove {
    /// Prompt id or unique prefix
    id: String,
  },
  /// Set a prompt's instruction text
  Text {
    /// Prompt id or unique prefix
    id: String,
    /// Instruction text for the summarizer
    text: String,
  },
  /// Rename a prompt entry
  Name {
    /// Prompt id or unique prefix
    id: String,
    /// New display name
    name: String,
  },
  /// Toggle whether a prompt feeds the next generation
  Toggle {
    /// Prompt id or unique prefix
    id: String,
  },
  /// List all prompt entries
  List,
}

#[derive(Subcommand)]
enum SummaryCommand {
  /// Print the current summary
  Show,
  /// Replace the summary text directly
  Edit {
    /// Replacement summary text
    text: String,
  },
  /// Restore the initial generated summary
  Reset,
}

async fn handle(command: Command) -> Result<()> {
  match command {
    Command::Upload { path } => commands::upload(&path).await,
    Command::Generate => commands::generate().await,
    Command::Prompt { command } => match command {
      PromptCommand::Add => commands::prompt_add(),
      PromptCommand::Remove { id } => commands::prompt_remove(&id),
      PromptCommand::Text { id, text } => commands::prompt_text(&id, &text),
      PromptCommand::Name { id, name } => commands::prompt_name(&id, &name),
      PromptCommand::Toggle { id } => commands::prompt_toggle(&id),
      PromptCommand::List => commands::prompt_list(),
    },
    Command::Summary { command } => match command {
      SummaryCommand::Show => commands::summary_show(),
      SummaryCommand::Edit { text } => commands::summary_edit(&text),
      SummaryCommand::Reset => commands::summary_reset(),
    },
    Command::Recent => commands::recent(),
    Command::Clear => commands::clear(),
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

  let cli = Cli::parse();
  handle(cli.command).await?;
  Ok(())
}
