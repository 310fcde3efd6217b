use mealwise_shared::{
    GeneratedMealPlan, PlanMetadata, PlanPreferences, PlanRepository, reject, total_cost,
};
use time::{Date, OffsetDateTime};
use ulid::Ulid;

use crate::constraints::{contains_allergen, diet_accepts};
use crate::engine::RuleBasedPlanEngine;

/// Turns engine drafts into stored plans. The only writer of plans.
pub struct PlanCoordinator<R: PlanRepository> {
    engine: RuleBasedPlanEngine,
    repository: R,
}

impl<R: PlanRepository> PlanCoordinator<R> {
    pub fn new(engine: RuleBasedPlanEngine, repository: R) -> Self {
        Self { engine, repository }
    }

    pub async fn generate_plan(
        &self,
        user_id: &str,
        preferences: &PlanPreferences,
        week_start: Date,
    ) -> mealwise_shared::Result<GeneratedMealPlan> {
        let draft = self.engine.generate(preferences, week_start);
        let grocery_list = mealwise_shopping::aggregate(&draft.meals, &preferences.pantry);

        let mut plan = GeneratedMealPlan {
            id: Ulid::new().to_string(),
            user_id: user_id.to_owned(),
            week_start,
            generated_at: OffsetDateTime::now_utc(),
            meals: draft.meals,
            total_cost: 0.0,
            total_calories: 0,
            grocery_list,
            metadata: PlanMetadata {
                notes: draft.notes,
                preferences: preferences.clone(),
            },
        };
        plan.refresh_totals();

        self.repository
            .save_generated_plan(&plan)
            .await
            .map_err(mealwise_shared::Error::into_persistence)?;

        tracing::info!(
            plan_id = %plan.id,
            user_id,
            total_cost = plan.total_cost,
            "meal plan saved"
        );

        Ok(plan)
    }

    /// Replaces one meal with a catalog candidate and saves the plan in place.
    pub async fn apply_swap(
        &self,
        plan: &GeneratedMealPlan,
        meal_id: &str,
        candidate_id: &str,
    ) -> mealwise_shared::Result<GeneratedMealPlan> {
        let Some(position) = plan.meals.iter().position(|meal| meal.id == meal_id) else {
            return Err(mealwise_shared::Error::NotFound(format!("meal {meal_id}")));
        };

        let Some(candidate) = self.engine.catalog().get(candidate_id) else {
            return Err(mealwise_shared::Error::NotFound(format!(
                "catalog meal {candidate_id}"
            )));
        };

        let original = &plan.meals[position];
        let preferences = &plan.metadata.preferences;

        if candidate.meal_type != original.meal_type {
            reject!(
                "'{}' is a {} and cannot replace a {}",
                candidate.id,
                candidate.meal_type,
                original.meal_type
            );
        }

        if candidate.id == original.catalog_id {
            reject!("'{}' is already scheduled in this slot", candidate.id);
        }

        if !diet_accepts(&preferences.diet, &candidate.tags) {
            reject!("'{}' does not fit the {} diet", candidate.id, preferences.diet);
        }

        if contains_allergen(&candidate.ingredients, &preferences.allergies) {
            reject!("'{}' contains a listed allergen", candidate.id);
        }

        let mut updated = plan.clone();
        let replacement = candidate.schedule(original.date, original.meal_type);
        updated.metadata.notes.push(format!(
            "Swapped '{}' for '{}' on {} {}",
            original.title, replacement.title, original.day, original.meal_type
        ));
        updated.meals[position] = replacement;
        updated.grocery_list = mealwise_shopping::aggregate(&updated.meals, &preferences.pantry);
        updated.refresh_totals();

        if let Some(budget) = preferences.budget_limit {
            let total = total_cost(&updated.meals);
            if total > budget && !updated.metadata.mentions("budget") {
                updated.metadata.notes.push(format!(
                    "Weekly cost {total:.2} exceeds the budget of {budget:.2} after the swap"
                ));
            }
        }

        self.repository
            .save_generated_plan(&updated)
            .await
            .map_err(mealwise_shared::Error::into_persistence)?;

        tracing::info!(
            plan_id = %updated.id,
            meal_id,
            candidate_id,
            "meal swap applied"
        );

        Ok(updated)
    }
}
