use std::sync::{Arc, Mutex, PoisonError};

use mealwise_mealplan::{
    PlanCoordinator, RuleBasedPlanEngine, SwapConstraints, SwapEngine, SwapSuggestion, resolve,
};
use mealwise_shared::{
    Error, FeatureLogger, GeneratedMealPlan, PlanPreferences, PlanRepository, PreferenceRecord,
    PreferenceStore, Result, today, upcoming_week_start,
};
use time::Date;
use tokio::task::JoinSet;

/// Entry point tying the preference store, planner, swap engine and feature log together.
pub struct Pipeline<S, L>
where
    S: PreferenceStore + PlanRepository + Clone + 'static,
    L: FeatureLogger + 'static,
{
    store: S,
    coordinator: PlanCoordinator<S>,
    swaps: SwapEngine,
    logger: Arc<L>,
    pending: Mutex<JoinSet<()>>,
}

impl<S, L> Pipeline<S, L>
where
    S: PreferenceStore + PlanRepository + Clone + 'static,
    L: FeatureLogger + 'static,
{
    pub fn new(store: S, logger: L, engine: RuleBasedPlanEngine, swaps: SwapEngine) -> Self {
        Self {
            coordinator: PlanCoordinator::new(engine, store.clone()),
            store,
            swaps,
            logger: Arc::new(logger),
            pending: Mutex::new(JoinSet::new()),
        }
    }

    /// Generates and saves a plan for the week starting at `week_start`, or the
    /// upcoming Monday when none is given.
    #[tracing::instrument(skip(self, overrides))]
    pub async fn generate_plan(
        &self,
        user_id: &str,
        overrides: Option<&PreferenceRecord>,
        week_start: Option<Date>,
    ) -> Result<GeneratedMealPlan> {
        let stored = self
            .store
            .get_user_preferences(user_id)
            .await?
            .unwrap_or_default();

        let preferences = resolve(&stored, overrides)?;
        let week_start = week_start.unwrap_or_else(|| upcoming_week_start(today()));

        let plan = self
            .coordinator
            .generate_plan(user_id, &preferences, week_start)
            .await?;

        self.spawn_feature_log(&plan, &preferences);

        Ok(plan)
    }

    /// Ranked substitutes for one meal of the user's latest plan.
    pub async fn suggest_swaps(
        &self,
        user_id: &str,
        meal_id: &str,
        constraints: &SwapConstraints,
    ) -> Result<Vec<SwapSuggestion>> {
        let plan = self.latest_plan(user_id).await?;
        let Some(meal) = plan.find_meal(meal_id) else {
            return Err(Error::NotFound(format!("meal {meal_id}")));
        };

        self.swaps
            .suggest(&plan.id, meal, &plan.metadata.preferences, constraints)
    }

    /// Applies a chosen substitute to the user's latest plan.
    pub async fn accept_swap(
        &self,
        user_id: &str,
        meal_id: &str,
        candidate_id: &str,
    ) -> Result<GeneratedMealPlan> {
        let plan = self.latest_plan(user_id).await?;

        self.coordinator
            .apply_swap(&plan, meal_id, candidate_id)
            .await
    }

    pub async fn recent_plans(&self, user_id: &str, limit: u32) -> Result<Vec<GeneratedMealPlan>> {
        self.store.list_recent_plans(user_id, limit).await
    }

    /// Waits for feature-log writes still in flight.
    pub async fn flush(&self) {
        let mut pending = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );

        while let Some(result) = pending.join_next().await {
            if let Err(err) = result {
                tracing::warn!(err = %err, "feature log task failed");
            }
        }
    }

    async fn latest_plan(&self, user_id: &str) -> Result<GeneratedMealPlan> {
        self.store
            .list_recent_plans(user_id, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("meal plan for user {user_id}")))
    }

    fn spawn_feature_log(&self, plan: &GeneratedMealPlan, preferences: &PlanPreferences) {
        let logger = self.logger.clone();
        let plan = plan.clone();
        let preferences = preferences.clone();

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while pending.try_join_next().is_some() {}

        pending.spawn(async move {
            if let Err(err) = logger.log_plan_generation(&plan, &preferences).await {
                tracing::warn!(
                    err = %err,
                    plan_id = %plan.id,
                    user_id = %plan.user_id,
                    "failed to log plan generation"
                );
            }
        });
    }
}
