use anyhow::Result;
use clap::Args;
use mealwise::config::Config;
use mealwise::{SqliteStore, build_pipeline, create_pool};
use mealwise_mealplan::SwapConstraints;
use mealwise_shared::{PreferenceRecord, PreferenceStore};
use serde::Serialize;
use time::{Date, macros::format_description};

#[derive(Args, Debug, Default)]
pub struct PreferenceArgs {
    /// Diet tag such as vegan, vegetarian or pescatarian
    #[arg(long)]
    pub diet: Option<String>,

    /// Comma separated allergy tags, pass the flag alone to clear them
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub allergies: Option<Vec<String>>,

    /// Weekly budget
    #[arg(long)]
    pub budget: Option<f64>,

    /// Longest acceptable prep time in minutes
    #[arg(long)]
    pub max_prep: Option<u32>,

    /// Comma separated pantry items, pass the flag alone to clear them
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub pantry: Option<Vec<String>>,
}

impl From<PreferenceArgs> for PreferenceRecord {
    fn from(value: PreferenceArgs) -> Self {
        Self {
            diet: value.diet,
            allergies: value.allergies,
            budget_limit: value.budget,
            max_prep_minutes: value.max_prep,
            pantry: value.pantry,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct SwapArgs {
    #[arg(long)]
    pub max_prep: Option<u32>,

    #[arg(long)]
    pub budget: Option<f64>,

    /// Comma separated allergy tags added to the plan's own
    #[arg(long, value_delimiter = ',')]
    pub allergies: Vec<String>,
}

impl From<SwapArgs> for SwapConstraints {
    fn from(value: SwapArgs) -> Self {
        Self {
            max_prep_minutes: value.max_prep,
            budget_limit: value.budget,
            allergies: value.allergies,
        }
    }
}

pub fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|e| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn migrate(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = create_pool(&config.database.url, 1).await?;
    mealwise::db::migrate(&pool).await?;

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn reset(config: Config) -> Result<()> {
    tracing::info!("Resetting database...");

    mealwise::db::reset(&config.database.url).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

pub async fn register_preferences(
    config: Config,
    user_id: String,
    preferences: PreferenceArgs,
) -> Result<()> {
    let pool = create_pool(&config.database.url, 1).await?;
    let store = SqliteStore(pool);
    let record = PreferenceRecord::from(preferences);

    mealwise_mealplan::resolve(&record, None)?;
    store.register_preferences(&user_id, &record).await?;

    print_json(&store.get_user_preferences(&user_id).await?)
}

pub async fn register_pantry(config: Config, user_id: String, items: Vec<String>) -> Result<()> {
    let pool = create_pool(&config.database.url, 1).await?;
    let store = SqliteStore(pool);

    store.register_pantry_items(&user_id, &items).await?;

    print_json(&store.get_user_preferences(&user_id).await?)
}

pub async fn generate(
    config: Config,
    user_id: String,
    overrides: PreferenceArgs,
    week_start: Option<Date>,
) -> Result<()> {
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    let pipeline = build_pipeline(&config, pool)?;
    let overrides = PreferenceRecord::from(overrides);
    let overrides = (!overrides.is_empty()).then_some(&overrides);

    let plan = pipeline.generate_plan(&user_id, overrides, week_start).await?;
    pipeline.flush().await;

    print_json(&plan)
}

pub async fn swap(
    config: Config,
    user_id: String,
    meal_id: String,
    constraints: SwapArgs,
) -> Result<()> {
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    let pipeline = build_pipeline(&config, pool)?;

    let suggestions = pipeline
        .suggest_swaps(&user_id, &meal_id, &constraints.into())
        .await?;

    print_json(&suggestions)
}

pub async fn accept_swap(
    config: Config,
    user_id: String,
    meal_id: String,
    candidate_id: String,
) -> Result<()> {
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    let pipeline = build_pipeline(&config, pool)?;

    let plan = pipeline
        .accept_swap(&user_id, &meal_id, &candidate_id)
        .await?;

    print_json(&plan)
}

pub async fn plans(config: Config, user_id: String, limit: u32) -> Result<()> {
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    let pipeline = build_pipeline(&config, pool)?;

    print_json(&pipeline.recent_plans(&user_id, limit).await?)
}
