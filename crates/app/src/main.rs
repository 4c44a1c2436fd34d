use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use finlingo_core::emergency::Choice;
use finlingo_core::model::{ChallengeId, LevelId, Theme, Username};
use services::{AppServices, Clock};

mod commands;

#[derive(Parser)]
#[command(name = "finlingo")]
#[command(about = "Money lessons for kids: levels, coins, stars and a savings jar")]
#[command(version)]
struct Cli {
    /// SQLite database URL or file path
    #[arg(long = "db", env = "FINLINGO_DB_URL", default_value = "sqlite://finlingo.sqlite3", global = true)]
    db_url: String,

    /// Learner whose progress is read and written
    #[arg(short, long, env = "FINLINGO_USER", default_value = Username::GUEST, global = true)]
    user: Username,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Visit the level-select screen (applies any pending unlock)
    Home,

    /// Tap a tile on the level-select grid
    Open { slot: u32 },

    /// Play a level, answering the given challenges
    Play {
        level: LevelId,

        /// Quiz challenge answered correctly (repeatable)
        #[arg(long = "solve", value_name = "ID")]
        solve: Vec<ChallengeId>,

        /// Quiz challenge answered wrong before any solve (repeatable)
        #[arg(long = "miss", value_name = "ID")]
        miss: Vec<ChallengeId>,

        /// Typed answer to a checked challenge, e.g. `rateCalc=36` (repeatable)
        #[arg(long = "answer", value_name = "ID=VALUE", value_parser = parse_answer)]
        answer: Vec<(ChallengeId, String)>,
    },

    /// Play the emergency-fund weeks of level 5
    Emergency {
        /// One choice per week: savings, credit or alternative
        #[arg(num_args = 1..=3, required = true)]
        choices: Vec<Choice>,
    },

    /// Show coins, stars and the unlocked level
    Status,

    /// Show earned and locked badges
    Badges,

    /// Show or change the colour theme
    Theme { theme: Option<ThemeArg> },

    /// Manage the savings-goal jar
    Goal {
        #[command(subcommand)]
        action: Option<GoalAction>,
    },

    /// Erase progress, preferences and goal for the user
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Neo,
    Enchanted,
    Reset,
}

#[derive(Subcommand)]
enum GoalAction {
    Show,
    /// Create or replace the goal, e.g. `goal create Bike 49.99`
    Create { name: String, price: String },
    /// Add money to the jar, e.g. `goal deposit 5`
    Deposit { amount: String },
    Reset,
}

fn parse_answer(raw: &str) -> Result<(ChallengeId, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got `{raw}`"))?;
    let id = id.parse::<ChallengeId>().map_err(|err| err.to_string())?;
    Ok((id, value.to_owned()))
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.starts_with("sqlite:file:")
    {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// The store creates a missing database file but not its directory.
fn ensure_parent_dir(db_url: &str) -> Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    anyhow::ensure!(!path.is_empty(), "invalid --db value: {db_url}");

    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_url = normalize_sqlite_url(&cli.db_url);
    ensure_parent_dir(&db_url)?;
    let app = AppServices::new_sqlite(&db_url, Clock::system())
        .await
        .with_context(|| format!("opening {db_url}"))?;
    let user = cli.user;
    tracing::debug!(%db_url, %user, "finlingo ready");

    match cli.command {
        Command::Home => commands::home(&app, &user).await,
        Command::Open { slot } => commands::open(&app, &user, slot).await,
        Command::Play {
            level,
            solve,
            miss,
            answer,
        } => commands::play(&app, &user, level, &miss, &answer, &solve).await,
        Command::Emergency { choices } => commands::emergency(&app, &user, &choices).await,
        Command::Status => commands::status(&app, &user).await,
        Command::Badges => commands::badges(&app, &user).await,
        Command::Theme { theme } => {
            let theme = theme.map(|arg| match arg {
                ThemeArg::Neo => Some(Theme::Neo),
                ThemeArg::Enchanted => Some(Theme::Enchanted),
                ThemeArg::Reset => None,
            });
            commands::theme(&app, &user, theme).await
        }
        Command::Goal { action } => match action.unwrap_or(GoalAction::Show) {
            GoalAction::Show => commands::goal_show(&app, &user).await,
            GoalAction::Create { name, price } => {
                commands::goal_create(&app, &user, &name, &price).await
            }
            GoalAction::Deposit { amount } => commands::goal_deposit(&app, &user, &amount).await,
            GoalAction::Reset => commands::goal_reset(&app, &user).await,
        },
        Command::Reset => {
            app.reset_user(&user).await?;
            println!("Progress for {user} has been reset.");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_play_flags() {
        let cli = Cli::try_parse_from([
            "finlingo", "--user", "mia", "play", "1", "--solve", "barter", "--miss", "coinCount",
            "--solve", "needsWants",
        ])
        .unwrap();
        assert_eq!(cli.user.as_str(), "mia");
        let Command::Play { level, solve, miss, answer } = cli.command else {
            panic!("expected play");
        };
        assert_eq!(level, LevelId::FIRST);
        assert_eq!(solve.len(), 2);
        assert_eq!(miss.len(), 1);
        assert!(answer.is_empty());
    }

    #[test]
    fn parses_typed_answers() {
        let cli = Cli::try_parse_from([
            "finlingo", "play", "2", "--answer", "rateCalc=36", "--answer", "paycheckPlan=30,50,20",
        ])
        .unwrap();
        let Command::Play { answer, .. } = cli.command else {
            panic!("expected play");
        };
        assert_eq!(answer[0].0.as_str(), "rateCalc");
        assert_eq!(answer[0].1, "36");
        assert_eq!(answer[1].1, "30,50,20");

        assert!(Cli::try_parse_from(["finlingo", "play", "2", "--answer", "rateCalc"]).is_err());
        assert!(Cli::try_parse_from(["finlingo", "play", "5", "--savings", "70"]).is_err());
    }

    #[test]
    fn rejects_out_of_range_level() {
        assert!(Cli::try_parse_from(["finlingo", "play", "6"]).is_err());
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/a.db"), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url("/tmp/a.db"), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/b.db"), "sqlite:///tmp/b.db");
    }
}
