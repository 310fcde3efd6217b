use mealwise_db::table::{MealPlan, UserPreferences};
use mealwise_shared::{GeneratedMealPlan, PlanRepository, PreferenceRecord, PreferenceStore};
use sea_query::{Expr, ExprTrait, OnConflict, Order, Query, SimpleExpr, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow, types::Json};
use time::OffsetDateTime;

/// SQLite-backed preference store and plan repository.
#[derive(Clone)]
pub struct SqliteStore(pub SqlitePool);

#[derive(FromRow)]
struct PreferenceRow {
    diet: Option<String>,
    allergies: Option<Json<Vec<String>>>,
    budget_limit: Option<f64>,
    max_prep_minutes: Option<u32>,
    pantry: Option<Json<Vec<String>>>,
}

impl From<PreferenceRow> for PreferenceRecord {
    fn from(value: PreferenceRow) -> Self {
        Self {
            diet: value.diet,
            allergies: value.allergies.map(|v| v.0),
            budget_limit: value.budget_limit,
            max_prep_minutes: value.max_prep_minutes,
            pantry: value.pantry.map(|v| v.0),
        }
    }
}

impl SqliteStore {
    /// Upserts the given columns of a user's preference row, leaving the others untouched.
    async fn upsert_preferences(
        &self,
        user_id: &str,
        fields: Vec<(UserPreferences, SimpleExpr)>,
    ) -> mealwise_shared::Result<()> {
        let mut columns = vec![UserPreferences::UserId, UserPreferences::UpdatedAt];
        let mut values: Vec<SimpleExpr> = vec![
            user_id.into(),
            OffsetDateTime::now_utc().unix_timestamp().into(),
        ];
        let mut updated = vec![UserPreferences::UpdatedAt];

        for (column, value) in fields {
            columns.push(column.clone());
            values.push(value);
            updated.push(column);
        }

        let statement = Query::insert()
            .into_table(UserPreferences::Table)
            .columns(columns)
            .values_panic(values)
            .on_conflict(
                OnConflict::column(UserPreferences::UserId)
                    .update_columns(updated)
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl PreferenceStore for SqliteStore {
    async fn get_user_preferences(
        &self,
        user_id: &str,
    ) -> mealwise_shared::Result<Option<PreferenceRecord>> {
        let statement = Query::select()
            .columns([
                UserPreferences::Diet,
                UserPreferences::Allergies,
                UserPreferences::BudgetLimit,
                UserPreferences::MaxPrepMinutes,
                UserPreferences::Pantry,
            ])
            .from(UserPreferences::Table)
            .and_where(Expr::col(UserPreferences::UserId).eq(user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, PreferenceRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn register_preferences(
        &self,
        user_id: &str,
        record: &PreferenceRecord,
    ) -> mealwise_shared::Result<()> {
        let mut fields: Vec<(UserPreferences, SimpleExpr)> = vec![];

        if let Some(diet) = &record.diet {
            fields.push((UserPreferences::Diet, diet.as_str().into()));
        }
        if let Some(allergies) = &record.allergies {
            fields.push((
                UserPreferences::Allergies,
                serde_json::to_string(allergies)?.into(),
            ));
        }
        if let Some(budget_limit) = record.budget_limit {
            fields.push((UserPreferences::BudgetLimit, budget_limit.into()));
        }
        if let Some(max_prep_minutes) = record.max_prep_minutes {
            fields.push((UserPreferences::MaxPrepMinutes, max_prep_minutes.into()));
        }
        if let Some(pantry) = &record.pantry {
            fields.push((UserPreferences::Pantry, serde_json::to_string(pantry)?.into()));
        }

        self.upsert_preferences(user_id, fields).await
    }

    async fn register_pantry_items(
        &self,
        user_id: &str,
        items: &[String],
    ) -> mealwise_shared::Result<()> {
        let pantry = serde_json::to_string(items)?;

        self.upsert_preferences(user_id, vec![(UserPreferences::Pantry, pantry.into())])
            .await
    }
}

#[async_trait::async_trait]
impl PlanRepository for SqliteStore {
    async fn save_generated_plan(&self, plan: &GeneratedMealPlan) -> mealwise_shared::Result<()> {
        let payload = serde_json::to_string(plan)?;
        let generated_at = i64::try_from(plan.generated_at.unix_timestamp_nanos())
            .map_err(anyhow::Error::from)?;

        let statement = Query::insert()
            .into_table(MealPlan::Table)
            .columns([
                MealPlan::Id,
                MealPlan::UserId,
                MealPlan::WeekStart,
                MealPlan::GeneratedAt,
                MealPlan::TotalCost,
                MealPlan::TotalCalories,
                MealPlan::Payload,
            ])
            .values_panic([
                plan.id.to_owned().into(),
                plan.user_id.to_owned().into(),
                plan.week_start.to_string().into(),
                generated_at.into(),
                plan.total_cost.into(),
                plan.total_calories.into(),
                payload.into(),
            ])
            .on_conflict(
                OnConflict::column(MealPlan::Id)
                    .update_columns([
                        MealPlan::UserId,
                        MealPlan::WeekStart,
                        MealPlan::GeneratedAt,
                        MealPlan::TotalCost,
                        MealPlan::TotalCalories,
                        MealPlan::Payload,
                    ])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }

    async fn list_recent_plans(
        &self,
        user_id: &str,
        limit: u32,
    ) -> mealwise_shared::Result<Vec<GeneratedMealPlan>> {
        let statement = Query::select()
            .column(MealPlan::Payload)
            .from(MealPlan::Table)
            .and_where(Expr::col(MealPlan::UserId).eq(user_id))
            .order_by(MealPlan::GeneratedAt, Order::Desc)
            .order_by(MealPlan::Id, Order::Desc)
            .limit(limit.into())
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (Json<GeneratedMealPlan>,), _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(|(plan,)| plan.0).collect())
    }
}
