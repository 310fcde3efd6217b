use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// mealwise - weekly meal plans and swap suggestions
#[derive(Parser)]
#[command(name = "mealwise")]
#[command(about = "Weekly meal plan generation and meal swap suggestions", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Register stored preferences for a user
    Preferences {
        user_id: String,

        #[command(flatten)]
        preferences: cli::PreferenceArgs,
    },
    /// Replace the pantry items of a user
    Pantry {
        user_id: String,

        /// Items already at hand, excluded from grocery lists
        #[arg(num_args = 0..)]
        items: Vec<String>,
    },
    /// Generate a weekly meal plan
    Generate {
        user_id: String,

        /// First day of the plan (YYYY-MM-DD), defaults to the upcoming Monday
        #[arg(long, value_parser = cli::parse_date)]
        week_start: Option<time::Date>,

        /// One-shot overrides applied on top of stored preferences
        #[command(flatten)]
        overrides: cli::PreferenceArgs,
    },
    /// Suggest substitutes for a meal of the latest plan
    Swap {
        user_id: String,
        meal_id: String,

        #[command(flatten)]
        constraints: cli::SwapArgs,
    },
    /// Replace a meal of the latest plan with a catalog meal
    AcceptSwap {
        user_id: String,
        meal_id: String,
        candidate_id: String,
    },
    /// List the most recent plans of a user
    Plans {
        user_id: String,

        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = mealwise::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealwise::observability::init_observability(
        "mealwise",
        &config.observability.log_level,
        config.observability.json,
    )?;

    match cli.command {
        Commands::Migrate => cli::migrate(config).await,
        Commands::Reset => cli::reset(config).await,
        Commands::Preferences {
            user_id,
            preferences,
        } => cli::register_preferences(config, user_id, preferences).await,
        Commands::Pantry { user_id, items } => cli::register_pantry(config, user_id, items).await,
        Commands::Generate {
            user_id,
            week_start,
            overrides,
        } => cli::generate(config, user_id, overrides, week_start).await,
        Commands::Swap {
            user_id,
            meal_id,
            constraints,
        } => cli::swap(config, user_id, meal_id, constraints).await,
        Commands::AcceptSwap {
            user_id,
            meal_id,
            candidate_id,
        } => cli::accept_swap(config, user_id, meal_id, candidate_id).await,
        Commands::Plans { user_id, limit } => cli::plans(config, user_id, limit).await,
    }
}
