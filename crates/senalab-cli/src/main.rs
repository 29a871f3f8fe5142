use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "senalab", version, about = "Senalab CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User profiles and logins
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Evaluate the streak policy without touching storage
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Top users by points
    Leaderboard {
        /// Number of users to show (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Lesson content
    Lesson {
        #[command(subcommand)]
        action: commands::lesson::LessonAction,
    },
    /// Sign dictionary
    Dictionary {
        #[command(subcommand)]
        action: commands::dictionary::DictionaryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Leaderboard { limit } => commands::leaderboard::run(limit),
        Commands::Lesson { action } => commands::lesson::run(action),
        Commands::Dictionary { action } => commands::dictionary::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "senalab", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
