use std::collections::HashMap;
use std::sync::Arc;

use mealwise_shared::{Meal, MealType, PlanPreferences, total_cost, week_days};
use time::Date;

use crate::catalog::{Catalog, CatalogMeal};
use crate::constraints::HardConstraints;

/// Meal types served every day, in serving order.
#[derive(Clone, Debug, PartialEq)]
pub struct Schedule(Vec<MealType>);

impl Default for Schedule {
    fn default() -> Self {
        Self(vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner])
    }
}

impl Schedule {
    pub fn new(meal_types: Vec<MealType>) -> mealwise_shared::Result<Self> {
        let mut deduped: Vec<MealType> = vec![];
        for meal_type in meal_types {
            if !deduped.contains(&meal_type) {
                deduped.push(meal_type);
            }
        }

        if !deduped.contains(&MealType::Dinner) {
            mealwise_shared::bail!("schedule must include dinner");
        }

        deduped.sort();

        Ok(Self(deduped))
    }

    pub fn meal_types(&self) -> &[MealType] {
        &self.0
    }

    pub fn slots(&self, week_start: Date) -> Vec<Slot> {
        week_days(week_start)
            .into_iter()
            .flat_map(|date| {
                self.0
                    .iter()
                    .map(move |meal_type| Slot {
                        date,
                        meal_type: *meal_type,
                    })
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    pub date: Date,
    pub meal_type: MealType,
}

/// Engine output before the coordinator turns it into a stored plan.
#[derive(Clone, Debug, Default)]
pub struct PlanDraft {
    pub meals: Vec<Meal>,
    pub notes: Vec<String>,
}

/// Deterministic, rule-based weekly planner over an injected catalog.
#[derive(Clone)]
pub struct RuleBasedPlanEngine {
    catalog: Arc<Catalog>,
    schedule: Schedule,
}

impl RuleBasedPlanEngine {
    pub fn new(catalog: Arc<Catalog>, schedule: Schedule) -> Self {
        Self { catalog, schedule }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    fn cheapest(&self, constraints: &HardConstraints, meal_type: MealType) -> f64 {
        self.catalog
            .of_type(meal_type)
            .filter(|(_, meal)| constraints.admits(meal))
            .map(|(_, meal)| meal.cost)
            .min_by(f64::total_cmp)
            .unwrap_or(self.catalog.fallback().cost)
    }

    pub fn generate(&self, preferences: &PlanPreferences, week_start: Date) -> PlanDraft {
        let constraints = HardConstraints::new(preferences);
        let slots = self.schedule.slots(week_start);

        let floors: Vec<f64> = slots
            .iter()
            .map(|slot| self.cheapest(&constraints, slot.meal_type))
            .collect();

        let mut used: HashMap<&str, u32> = HashMap::new();
        let mut running = 0.0;
        let mut draft = PlanDraft::default();

        for (position, slot) in slots.iter().enumerate() {
            let mut candidates: Vec<(usize, &CatalogMeal)> = self
                .catalog
                .of_type(slot.meal_type)
                .filter(|(_, meal)| constraints.admits(meal))
                .collect();

            if candidates.is_empty() {
                let fallback = self.catalog.fallback();
                let meal = fallback.schedule(slot.date, slot.meal_type);

                tracing::debug!(
                    date = %slot.date,
                    meal_type = %slot.meal_type,
                    "no candidate matched, using fallback"
                );

                draft.notes.push(format!(
                    "No {} option matched your constraints on {}; used fallback '{}'",
                    slot.meal_type, meal.day, fallback.title
                ));
                running += meal.cost;
                draft.meals.push(meal);

                continue;
            }

            candidates.sort_by(|(a_index, a), (b_index, b)| {
                let a_used = used.get(a.id.as_str()).copied().unwrap_or_default();
                let b_used = used.get(b.id.as_str()).copied().unwrap_or_default();

                a_used
                    .cmp(&b_used)
                    .then(a.cost.total_cmp(&b.cost))
                    .then(a_index.cmp(b_index))
            });

            let chosen = match preferences.budget_limit {
                Some(budget) => {
                    // Keep enough for the cheapest option of every later slot.
                    let reserved: f64 = floors[position + 1..].iter().sum();
                    let allowance = budget - running - reserved;

                    candidates
                        .iter()
                        .find(|(_, meal)| meal.cost <= allowance)
                        .or_else(|| {
                            candidates.iter().min_by(|(a_index, a), (b_index, b)| {
                                a.cost.total_cmp(&b.cost).then(a_index.cmp(b_index))
                            })
                        })
                        .map(|(_, meal)| *meal)
                }
                None => candidates.first().map(|(_, meal)| *meal),
            };

            let Some(chosen) = chosen else {
                continue;
            };

            tracing::debug!(
                date = %slot.date,
                meal_type = %slot.meal_type,
                meal = %chosen.id,
                cost = chosen.cost,
                "slot filled"
            );

            *used.entry(chosen.id.as_str()).or_default() += 1;
            running += chosen.cost;
            draft.meals.push(chosen.schedule(slot.date, slot.meal_type));
        }

        let total = total_cost(&draft.meals);
        if let Some(budget) = preferences.budget_limit {
            if total > budget {
                draft.notes.push(format!(
                    "Weekly cost {total:.2} exceeds the budget of {budget:.2}; budget relaxed to keep every meal"
                ));
            }
        }

        tracing::info!(
            week_start = %week_start,
            meals = draft.meals.len(),
            total_cost = total,
            notes = draft.notes.len(),
            "meal plan drafted"
        );

        draft
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use time::macros::date;

    use super::*;

    fn entry(id: &str, meal_type: MealType, cost: f64, prep: u32, tags: &[&str]) -> CatalogMeal {
        CatalogMeal {
            id: id.to_owned(),
            meal_type,
            title: id.to_owned(),
            description: String::new(),
            ingredients: vec![format!("{id} base"), "salt".to_owned()],
            calories: 500,
            prep_minutes: prep,
            macros: BTreeMap::new(),
            cost,
            tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn engine(meals: Vec<CatalogMeal>, meal_types: Vec<MealType>) -> RuleBasedPlanEngine {
        let fallback = entry("fallback", MealType::Dinner, 1.0, 5, &["fallback", "vegan"]);
        let catalog = Catalog::new(meals, fallback).unwrap();

        RuleBasedPlanEngine::new(Arc::new(catalog), Schedule::new(meal_types).unwrap())
    }

    const MONDAY: Date = date!(2025 - 01 - 27);

    #[test]
    fn test_schedule_requires_dinner() {
        assert!(Schedule::new(vec![MealType::Breakfast]).is_err());
        assert!(Schedule::new(vec![]).is_err());
    }

    #[test]
    fn test_schedule_dedupes_and_orders() {
        let schedule =
            Schedule::new(vec![MealType::Dinner, MealType::Breakfast, MealType::Dinner]).unwrap();

        assert_eq!(
            schedule.meal_types(),
            &[MealType::Breakfast, MealType::Dinner]
        );
        assert_eq!(schedule.slots(MONDAY).len(), 14);
    }

    #[test]
    fn test_rotates_for_variety() {
        let engine = engine(
            vec![
                entry("a", MealType::Dinner, 3.0, 10, &[]),
                entry("b", MealType::Dinner, 4.0, 10, &[]),
            ],
            vec![MealType::Dinner],
        );

        let draft = engine.generate(&PlanPreferences::default(), MONDAY);
        let ids: Vec<&str> = draft.meals.iter().map(|m| m.catalog_id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "a", "b", "a", "b", "a"]);
        assert!(draft.notes.is_empty());
    }

    #[test]
    fn test_is_deterministic() {
        let engine = engine(
            vec![
                entry("a", MealType::Dinner, 3.0, 10, &[]),
                entry("b", MealType::Dinner, 3.0, 10, &[]),
                entry("c", MealType::Dinner, 2.0, 10, &[]),
            ],
            vec![MealType::Dinner],
        );
        let preferences = PlanPreferences {
            budget_limit: Some(20.0),
            ..Default::default()
        };

        let first: Vec<String> = engine
            .generate(&preferences, MONDAY)
            .meals
            .into_iter()
            .map(|m| m.catalog_id)
            .collect();
        let second: Vec<String> = engine
            .generate(&preferences, MONDAY)
            .meals
            .into_iter()
            .map(|m| m.catalog_id)
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_hard_constraints_filter_candidates() {
        let engine = engine(
            vec![
                entry("steak", MealType::Dinner, 9.0, 30, &[]),
                entry("slow-vegan", MealType::Dinner, 4.0, 60, &["vegan"]),
                entry("quick-vegan", MealType::Dinner, 5.0, 15, &["vegan"]),
            ],
            vec![MealType::Dinner],
        );
        let preferences = PlanPreferences {
            diet: "vegan".to_owned(),
            max_prep_minutes: Some(15),
            ..Default::default()
        };

        let draft = engine.generate(&preferences, MONDAY);

        assert_eq!(draft.meals.len(), 7);
        assert!(draft.meals.iter().all(|m| m.catalog_id == "quick-vegan"));
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let engine = engine(
            vec![
                entry("toast", MealType::Breakfast, 2.0, 5, &["vegetarian"]),
                entry("steak", MealType::Dinner, 9.0, 30, &[]),
            ],
            vec![MealType::Breakfast, MealType::Dinner],
        );
        let preferences = PlanPreferences {
            diet: "vegetarian".to_owned(),
            ..Default::default()
        };

        let draft = engine.generate(&preferences, MONDAY);

        assert_eq!(draft.meals.len(), 14);
        let fallbacks: Vec<&Meal> = draft
            .meals
            .iter()
            .filter(|m| m.catalog_id == "fallback")
            .collect();
        assert_eq!(fallbacks.len(), 7);
        assert!(fallbacks.iter().all(|m| m.meal_type == MealType::Dinner));
        assert_eq!(draft.notes.len(), 7);
        assert!(draft.notes[0].contains("dinner"));
        assert!(draft.notes[0].contains("monday"));
    }

    #[test]
    fn test_budget_note_when_exceeded() {
        let engine = engine(
            vec![entry("only", MealType::Dinner, 10.0, 10, &[])],
            vec![MealType::Dinner],
        );
        let preferences = PlanPreferences {
            budget_limit: Some(50.0),
            ..Default::default()
        };

        let draft = engine.generate(&preferences, MONDAY);

        assert_eq!(draft.meals.len(), 7);
        assert!(draft.notes.iter().any(|n| n.to_lowercase().contains("budget")));
    }

    #[test]
    fn test_budget_prefers_cheaper_meals() {
        let engine = engine(
            vec![
                entry("cheap", MealType::Dinner, 2.0, 10, &[]),
                entry("pricey", MealType::Dinner, 12.0, 10, &[]),
            ],
            vec![MealType::Dinner],
        );
        let preferences = PlanPreferences {
            budget_limit: Some(21.0),
            ..Default::default()
        };

        let draft = engine.generate(&preferences, MONDAY);

        assert!(draft.meals.iter().all(|m| m.catalog_id == "cheap"));
        assert!(draft.notes.is_empty());
    }

    #[test]
    fn test_budget_reserves_later_slots() {
        let engine = engine(
            vec![
                entry("toast", MealType::Breakfast, 1.0, 5, &[]),
                entry("pancakes", MealType::Breakfast, 2.0, 15, &[]),
                entry("stew", MealType::Dinner, 5.0, 40, &[]),
            ],
            vec![MealType::Breakfast, MealType::Dinner],
        );
        let preferences = PlanPreferences {
            budget_limit: Some(42.0),
            ..Default::default()
        };

        let draft = engine.generate(&preferences, MONDAY);

        assert_eq!(draft.meals.len(), 14);
        assert!(
            draft
                .meals
                .iter()
                .filter(|m| m.meal_type == MealType::Breakfast)
                .all(|m| m.catalog_id == "toast")
        );
        assert_eq!(total_cost(&draft.meals), 42.0);
        assert!(draft.notes.is_empty());
    }
}
