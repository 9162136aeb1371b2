//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{dep, query, task};
use crate::storage::Project;

#[derive(Parser)]
#[command(name = "tether")]
#[command(author, version, about = "Local-first to-do list with task dependencies")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new tether project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Manage dependencies between tasks
    #[command(subcommand)]
    Dep(dep::DepCommands),

    /// Show tasks ready to work on
    Ready,

    /// Show blocked tasks
    Blocked,

    /// Show the critical path (longest dependency chain)
    Path,

    /// Show project status overview
    Status,

    /// Show pending tasks bucketed by deadline
    Timeline,

    /// Validate the dependency store (cycles, dangling edges)
    Check,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("Tether CLI starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized tether project at {}",
                project.root().display()
            ));
        }

        Commands::Task(cmd) => task::run(cmd, &output)?,
        Commands::Dep(cmd) => dep::run(cmd, &output)?,

        Commands::Ready => query::ready(&output)?,
        Commands::Blocked => query::blocked(&output)?,
        Commands::Path => query::path(&output)?,
        Commands::Status => query::status(&output)?,
        Commands::Timeline => query::timeline(&output)?,
        Commands::Check => query::check(&output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
