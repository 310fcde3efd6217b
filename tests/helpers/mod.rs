#![allow(dead_code)]

use std::{path::PathBuf, str::FromStr, sync::Arc};

use mealwise::{Pipeline, SqliteStore};
use mealwise_mealplan::{Catalog, RuleBasedPlanEngine, Schedule, SwapEngine};
use mealwise_shared::{FeatureLogger, GeneratedMealPlan, PlanPreferences};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

pub struct TestState {
    pub pool: SqlitePool,
    pub store: SqliteStore,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    mealwise::db::migrate(&pool).await?;

    Ok(TestState {
        store: SqliteStore(pool.clone()),
        pool,
    })
}

pub fn pipeline<L: FeatureLogger + 'static>(
    state: &TestState,
    logger: L,
) -> Pipeline<SqliteStore, L> {
    let catalog = Arc::new(Catalog::builtin().unwrap());

    Pipeline::new(
        state.store.clone(),
        logger,
        RuleBasedPlanEngine::new(catalog.clone(), Schedule::default()),
        SwapEngine::new(catalog),
    )
}

pub async fn feature_log_count(state: &TestState, user_id: &str) -> anyhow::Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM feature_log WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&state.pool)
        .await?;

    Ok(count.0)
}

pub struct FailingLogger;

#[async_trait::async_trait]
impl FeatureLogger for FailingLogger {
    async fn log_plan_generation(
        &self,
        _plan: &GeneratedMealPlan,
        _preferences: &PlanPreferences,
    ) -> anyhow::Result<()> {
        anyhow::bail!("analytics endpoint unreachable")
    }
}
