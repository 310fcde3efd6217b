use mealwise_db::table::FeatureLog;
use mealwise_shared::{FeatureLogger, GeneratedMealPlan, PlanPreferences};
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use ulid::Ulid;

pub const PLAN_GENERATED: &str = "plan_generated";

#[derive(Serialize)]
struct PlanGenerated<'a> {
    plan_id: &'a str,
    week_start: String,
    meals: usize,
    total_cost: f64,
    total_calories: u32,
    grocery_items: usize,
    notes: &'a [String],
    diet: &'a str,
    budget_limit: Option<f64>,
    max_prep_minutes: Option<u32>,
}

impl<'a> PlanGenerated<'a> {
    fn new(plan: &'a GeneratedMealPlan, preferences: &'a PlanPreferences) -> Self {
        Self {
            plan_id: &plan.id,
            week_start: plan.week_start.to_string(),
            meals: plan.meals.len(),
            total_cost: plan.total_cost,
            total_calories: plan.total_calories,
            grocery_items: plan.grocery_list.len(),
            notes: &plan.metadata.notes,
            diet: &preferences.diet,
            budget_limit: preferences.budget_limit,
            max_prep_minutes: preferences.max_prep_minutes,
        }
    }
}

/// Appends generation events to the `feature_log` table.
#[derive(Clone)]
pub struct SqliteFeatureLogger(pub SqlitePool);

#[async_trait::async_trait]
impl FeatureLogger for SqliteFeatureLogger {
    async fn log_plan_generation(
        &self,
        plan: &GeneratedMealPlan,
        preferences: &PlanPreferences,
    ) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&PlanGenerated::new(plan, preferences))?;

        let statement = Query::insert()
            .into_table(FeatureLog::Table)
            .columns([
                FeatureLog::Id,
                FeatureLog::UserId,
                FeatureLog::PlanId,
                FeatureLog::Event,
                FeatureLog::Payload,
                FeatureLog::CreatedAt,
            ])
            .values_panic([
                Ulid::new().to_string().into(),
                plan.user_id.to_owned().into(),
                plan.id.to_owned().into(),
                PLAN_GENERATED.into(),
                payload.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }
}

/// Emits generation events as structured log records.
#[derive(Clone, Default)]
pub struct TracingFeatureLogger;

#[async_trait::async_trait]
impl FeatureLogger for TracingFeatureLogger {
    async fn log_plan_generation(
        &self,
        plan: &GeneratedMealPlan,
        preferences: &PlanPreferences,
    ) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&PlanGenerated::new(plan, preferences))?;

        tracing::info!(
            event = PLAN_GENERATED,
            user_id = %plan.user_id,
            plan_id = %plan.id,
            payload = %payload,
            "feature event"
        );

        Ok(())
    }
}
