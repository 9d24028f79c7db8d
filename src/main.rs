use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "progression")]
#[command(about = "Track learner XP, levels, badges and daily streaks")]
#[command(version)]
struct Cli {
    /// Directory holding learner state files (defaults to ~/.progression/learners)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.progression/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Learner(LearnerCommands),

    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Commands that run against the configured engine and store
#[derive(Subcommand)]
enum LearnerCommands {
    /// Record a completed lesson for a learner
    Record {
        /// Learner id
        #[arg(short, long)]
        learner: String,

        /// Module the lesson belongs to
        #[arg(long)]
        module: Option<String>,

        /// Lesson id within the module
        #[arg(long)]
        lesson: Option<String>,

        /// Share of correct answers, 0.0 to 1.0
        #[arg(long)]
        accuracy: Option<f64>,

        /// Lesson was completed quickly
        #[arg(long)]
        fast: bool,

        /// Activity date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record a daily login (counts toward the streak, no XP)
    Login {
        /// Learner id
        #[arg(short, long)]
        learner: String,

        /// Activity date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show XP, level, streak and badges for a learner
    Status {
        /// Learner id (lists all learners when omitted)
        #[arg(short, long)]
        learner: Option<String>,
    },

    /// List the badge catalog
    Badges {
        /// Mark the badges this learner has earned
        #[arg(short, long)]
        learner: Option<String>,
    },

    /// Show the level table
    Levels,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Init { force } => cli::init::init_command(cli.config, force),
        Commands::Learner(command) => {
            let host = cli::Host::load(cli.config.as_deref(), cli.data_dir)?;
            run(&host, command)
        }
    }
}

fn run(host: &cli::Host, command: LearnerCommands) -> Result<()> {
    match command {
        LearnerCommands::Record {
            learner,
            module,
            lesson,
            accuracy,
            fast,
            date,
        } => {
            let event = progression::LessonEvent {
                module_id: module,
                lesson_id: lesson,
                accuracy,
                fast_completion: fast,
            };
            cli::record::record_command(host, &learner, &event, date)?;
        }
        LearnerCommands::Login { learner, date } => {
            cli::record::login_command(host, &learner, date)?;
        }
        LearnerCommands::Status { learner } => {
            cli::status::status_command(host, learner.as_deref())?;
        }
        LearnerCommands::Badges { learner } => {
            cli::badges::badges_command(host, learner.as_deref())?;
        }
        LearnerCommands::Levels => {
            cli::badges::levels_command(host);
        }
    }

    Ok(())
}
