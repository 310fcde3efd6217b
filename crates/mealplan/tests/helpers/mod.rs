#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mealwise_mealplan::{Catalog, PlanCoordinator, RuleBasedPlanEngine, Schedule, SwapEngine};
use mealwise_shared::{GeneratedMealPlan, PlanRepository};

#[derive(Clone, Default)]
pub struct MemoryPlans(pub Arc<Mutex<Vec<GeneratedMealPlan>>>);

impl MemoryPlans {
    pub fn saved(&self) -> Vec<GeneratedMealPlan> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PlanRepository for MemoryPlans {
    async fn save_generated_plan(&self, plan: &GeneratedMealPlan) -> mealwise_shared::Result<()> {
        let mut plans = self.0.lock().unwrap();
        plans.retain(|existing| existing.id != plan.id);
        plans.push(plan.clone());

        Ok(())
    }

    async fn list_recent_plans(
        &self,
        user_id: &str,
        limit: u32,
    ) -> mealwise_shared::Result<Vec<GeneratedMealPlan>> {
        let mut plans: Vec<GeneratedMealPlan> = self
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|plan| plan.user_id == user_id)
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        plans.truncate(limit as usize);

        Ok(plans)
    }
}

pub struct BrokenPlans;

#[async_trait::async_trait]
impl PlanRepository for BrokenPlans {
    async fn save_generated_plan(&self, _plan: &GeneratedMealPlan) -> mealwise_shared::Result<()> {
        Err(anyhow::anyhow!("disk full").into())
    }

    async fn list_recent_plans(
        &self,
        _user_id: &str,
        _limit: u32,
    ) -> mealwise_shared::Result<Vec<GeneratedMealPlan>> {
        Ok(vec![])
    }
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin().unwrap())
}

pub fn coordinator<R: PlanRepository>(repository: R) -> PlanCoordinator<R> {
    PlanCoordinator::new(
        RuleBasedPlanEngine::new(catalog(), Schedule::default()),
        repository,
    )
}

pub fn swap_engine() -> SwapEngine {
    SwapEngine::new(catalog())
}
