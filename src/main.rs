use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "studykit")]
#[command(about = "StudyKit - exam prep progress tracking with XP, streaks and achievements")]
#[command(version)]
struct Cli {
    /// Profile to operate on
    #[arg(short, long, global = true, default_value = "default")]
    user: String,

    /// Path to the config file (defaults to ~/.studykit/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's progress dashboard
    Status,

    /// List today's goals
    Goals,

    /// Toggle a daily goal by id
    Toggle {
        /// Id of the goal, as shown by `studykit goals`
        goal_id: String,
    },

    /// Record a study activity worth some XP
    Record {
        /// Short description of what was done
        title: String,

        /// Kind of activity: quiz, practice or lesson
        #[arg(long, default_value = "quiz")]
        kind: String,

        /// XP earned
        #[arg(long, default_value_t = 20)]
        xp: u32,

        /// Questions answered in this session
        #[arg(long, default_value_t = 0)]
        answered: u64,

        /// Questions answered correctly
        #[arg(long, default_value_t = 0)]
        correct: u64,
    },

    /// Show the recent activity log
    Log,

    /// Show the achievement catalog with unlock state
    Achievements,

    /// Reset the profile to a fresh state
    Reset {
        /// Skip the confirmation check
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = studykit::config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Status) | None => {
            cli::status::status_command(&cli.user, &config).await?;
        }
        Some(Commands::Goals) => {
            cli::goals::goals_command(&cli.user, &config).await?;
        }
        Some(Commands::Toggle { goal_id }) => {
            cli::goals::toggle_command(&cli.user, &config, &goal_id).await?;
        }
        Some(Commands::Record {
            title,
            kind,
            xp,
            answered,
            correct,
        }) => {
            cli::record::record_command(&cli.user, &config, &title, &kind, xp, answered, correct)
                .await?;
        }
        Some(Commands::Log) => {
            cli::log::log_command(&cli.user, &config).await?;
        }
        Some(Commands::Achievements) => {
            cli::achievements::achievements_command(&cli.user, &config).await?;
        }
        Some(Commands::Reset { force }) => {
            cli::reset::reset_command(&cli.user, &config, force).await?;
        }
    }

    Ok(())
}
