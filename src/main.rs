use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod tui;

#[derive(Parser)]
#[command(name = "wfc")]
#[command(about = "Workflow console - browse sessions, attempts and their task trees")]
#[command(version)]
struct Cli {
    /// Path to the console data directory (default: .wfconsole in current dir)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Output as JSON for machine consumption
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a data directory with a default config
    Init,

    /// List sessions, optionally filtered by the status of their last attempt
    Sessions {
        /// Status to show (All, Success, Failure, Running, Canceling, Canceled, Pending)
        #[arg(long, short)]
        status: Option<String>,
    },

    /// Show one session
    Session {
        /// Session ID
        id: String,
    },

    /// Show an attempt with its timeline and task list
    Attempt {
        /// Attempt ID
        id: String,
    },

    /// Show the timeline of an attempt
    Timeline {
        /// Attempt ID
        id: String,

        /// Collapse the node with this full name (can specify multiple)
        #[arg(long, short)]
        collapse: Vec<String>,
    },

    /// Show every task of an attempt with its full name
    Tasks {
        /// Attempt ID
        id: String,
    },

    /// List workflows grouped by project
    Workflows {
        /// Only show workflows of this project (name or ID)
        #[arg(long, short)]
        project: Option<String>,
    },

    /// Validate the task list of an attempt
    Check {
        /// Attempt ID
        id: String,
    },

    /// Browse an attempt interactively
    Tui {
        /// Attempt ID
        id: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = cli.dir.unwrap_or_else(|| PathBuf::from(".wfconsole"));

    match cli.command {
        Commands::Init => commands::init::run(&data_dir),
        Commands::Sessions { status } => {
            commands::sessions::run(&data_dir, status.as_deref(), cli.json)
        }
        Commands::Session { id } => commands::session::run(&data_dir, &id, cli.json),
        Commands::Attempt { id } => commands::attempt::run(&data_dir, &id, cli.json),
        Commands::Timeline { id, collapse } => {
            commands::timeline::run(&data_dir, &id, &collapse, cli.json)
        }
        Commands::Tasks { id } => commands::tasks::run(&data_dir, &id, cli.json),
        Commands::Workflows { project } => {
            commands::workflows::run(&data_dir, project.as_deref(), cli.json)
        }
        Commands::Check { id } => commands::check::run(&data_dir, &id, cli.json),
        Commands::Tui { id } => {
            commands::ensure_data_dir(&data_dir)?;
            tui::run(data_dir, &id)
        }
    }
}
