use std::sync::Arc;

use mealwise_mealplan::{Catalog, RuleBasedPlanEngine, Schedule, SwapEngine};
use sqlx::SqlitePool;

pub mod config;
pub mod db;
pub mod feature_log;
pub mod observability;
pub mod pipeline;
pub mod store;

pub use config::Config;
pub use db::create_pool;
pub use feature_log::{SqliteFeatureLogger, TracingFeatureLogger};
pub use pipeline::Pipeline;
pub use store::SqliteStore;

/// Wires the SQLite collaborators and the configured planner into a pipeline.
pub fn build_pipeline(
    config: &Config,
    pool: SqlitePool,
) -> anyhow::Result<Pipeline<SqliteStore, SqliteFeatureLogger>> {
    let catalog = match &config.planner.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };
    let catalog = Arc::new(catalog);
    let schedule = Schedule::new(config.planner.meal_types.to_vec())?;

    tracing::debug!(
        meals = catalog.meals().len(),
        meal_types = ?schedule.meal_types(),
        "catalog loaded"
    );

    Ok(Pipeline::new(
        SqliteStore(pool.clone()),
        SqliteFeatureLogger(pool),
        RuleBasedPlanEngine::new(catalog.clone(), schedule),
        SwapEngine::new(catalog).with_limit(config.planner.swap_limit),
    ))
}
