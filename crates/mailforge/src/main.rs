//! `MailForge` - build, render and import HTML emails from the command line.
//!
//! Documents are JSON files in the element wire format. Drafts and named
//! templates live in a SQLite database configured in `settings.json`.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod commands;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// mailforge - email document builder
#[derive(Parser, Debug)]
#[command(name = "mailforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document to HTML and plain text
    Render {
        /// Document JSON file
        document: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(long)]
        html_out: Option<PathBuf>,

        /// Write the plain-text alternative here
        #[arg(long)]
        text_out: Option<PathBuf>,
    },

    /// Import an HTML email into a document (printed as JSON)
    Import {
        /// HTML file
        input: PathBuf,
    },

    /// Compile a markup file to an HTML fragment
    Markup {
        /// Markup source file
        input: PathBuf,

        /// Print the plain-text rendering instead
        #[arg(long)]
        text: bool,
    },

    /// Resolve a send schedule against the local clock
    Schedule {
        /// Preset such as "2h", "tomorrow-9am" or "next-monday-9am"
        #[arg(conflicts_with_all = ["date", "time"])]
        preset: Option<String>,

        /// Explicit date (YYYY-MM-DD)
        #[arg(long, requires = "time")]
        date: Option<chrono::NaiveDate>,

        /// Explicit time (HH:MM)
        #[arg(long, requires = "date", value_parser = commands::parse_time)]
        time: Option<chrono::NaiveTime>,
    },

    /// Inspect or replace autosaved drafts
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// Manage named templates
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },

    /// Show or initialise the settings file
    Config {
        /// Write the default settings file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand, Debug)]
enum DraftCommand {
    /// Print the owner's draft as a document
    Show {
        #[arg(long)]
        owner: String,
    },

    /// Replace the owner's draft with a document file
    Save {
        #[arg(long)]
        owner: String,

        /// Document JSON file
        document: PathBuf,
    },

    /// Delete the owner's draft
    Clear {
        #[arg(long)]
        owner: String,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// Save a document file as a named template
    Save {
        name: String,

        /// Document JSON file
        document: PathBuf,
    },

    /// Print a template's document
    Load { name: String },

    /// List template names
    List,

    /// Delete a template
    Delete { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailforge=info,mailforge_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings_path = cli.settings.unwrap_or_else(settings::settings_path);
    let settings = settings::load_settings(&settings_path).await?;

    match cli.command {
        Command::Render {
            document,
            html_out,
            text_out,
        } => {
            commands::render(&settings, &document, html_out.as_deref(), text_out.as_deref())
                .await
        }
        Command::Import { input } => commands::import(&settings, &input).await,
        Command::Markup { input, text } => commands::markup(&input, text).await,
        Command::Schedule { preset, date, time } => {
            commands::schedule(preset.as_deref(), date, time)
        }
        Command::Draft { command } => match command {
            DraftCommand::Show { owner } => commands::draft_show(&settings, &owner).await,
            DraftCommand::Save { owner, document } => {
                commands::draft_save(&settings, &owner, &document).await
            }
            DraftCommand::Clear { owner } => commands::draft_clear(&settings, &owner).await,
        },
        Command::Template { command } => match command {
            TemplateCommand::Save { name, document } => {
                commands::template_save(&settings, &name, &document).await
            }
            TemplateCommand::Load { name } => commands::template_load(&settings, &name).await,
            TemplateCommand::List => commands::template_list(&settings).await,
            TemplateCommand::Delete { name } => commands::template_delete(&settings, &name).await,
        },
        Command::Config { init } => commands::config(&settings_path, &settings, init).await,
    }
}
