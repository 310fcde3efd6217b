use crate::{GeneratedMealPlan, PlanPreferences, PreferenceRecord, Result};

/// Read and setup access to stored user preferences.
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns `None` when the user never registered preferences.
    async fn get_user_preferences(&self, user_id: &str) -> Result<Option<PreferenceRecord>>;

    async fn register_preferences(&self, user_id: &str, record: &PreferenceRecord) -> Result<()>;

    async fn register_pantry_items(&self, user_id: &str, items: &[String]) -> Result<()>;
}

/// Plan persistence. Saving an existing plan id replaces it in place.
#[async_trait::async_trait]
pub trait PlanRepository: Send + Sync {
    async fn save_generated_plan(&self, plan: &GeneratedMealPlan) -> Result<()>;

    /// Most recent first.
    async fn list_recent_plans(&self, user_id: &str, limit: u32)
    -> Result<Vec<GeneratedMealPlan>>;
}

/// Downstream analytics sink for generation events.
#[async_trait::async_trait]
pub trait FeatureLogger: Send + Sync {
    async fn log_plan_generation(
        &self,
        plan: &GeneratedMealPlan,
        preferences: &PlanPreferences,
    ) -> anyhow::Result<()>;
}
