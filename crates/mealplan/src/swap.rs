use std::collections::BTreeSet;
use std::sync::Arc;

use mealwise_shared::{Meal, MealType, PlanPreferences};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

use crate::catalog::{Catalog, CatalogMeal};
use crate::constraints::{contains_allergen, diet_accepts, normalize_tag, within_prep};

pub const DEFAULT_LIMIT: usize = 5;
pub const MIN_LIMIT: usize = 3;

/// Ad-hoc bounds a user applies when asking for a substitute.
#[derive(Validate, Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct SwapConstraints {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub max_prep_minutes: Option<u32>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub budget_limit: Option<f64>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

/// What a badge predicate gets to look at.
pub struct BadgeContext<'a> {
    pub constraints: &'a SwapConstraints,
    pub allergies: &'a BTreeSet<String>,
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    Quick,
    AllergenSafe,
    BudgetFriendly,
}

impl Badge {
    pub fn applies(&self, meal: &CatalogMeal, ctx: &BadgeContext<'_>) -> bool {
        match self {
            Badge::Quick => ctx
                .constraints
                .max_prep_minutes
                .is_some_and(|max| within_prep(meal.prep_minutes, Some(max))),
            Badge::AllergenSafe => !contains_allergen(&meal.ingredients, ctx.allergies),
            Badge::BudgetFriendly => ctx
                .constraints
                .budget_limit
                .is_some_and(|budget| meal.cost <= budget),
        }
    }

    /// Every badge whose predicate holds for `meal`.
    pub fn evaluate(meal: &CatalogMeal, ctx: &BadgeContext<'_>) -> BTreeSet<Badge> {
        Badge::VARIANTS
            .iter()
            .filter(|badge| badge.applies(meal, ctx))
            .copied()
            .collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MealSummary {
    pub id: String,
    pub meal_type: MealType,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub calories: u32,
    pub prep_minutes: u32,
    pub cost: f64,
    pub tags: BTreeSet<String>,
}

impl From<&CatalogMeal> for MealSummary {
    fn from(value: &CatalogMeal) -> Self {
        Self {
            id: value.id.to_owned(),
            meal_type: value.meal_type,
            title: value.title.to_owned(),
            description: value.description.to_owned(),
            ingredients: value.ingredients.to_owned(),
            calories: value.calories,
            prep_minutes: value.prep_minutes,
            cost: value.cost,
            tags: value.tags.to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SwapSuggestion {
    pub candidate: MealSummary,
    pub badges: BTreeSet<Badge>,
    pub deep_link_path: String,
}

impl SwapSuggestion {
    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }
}

#[derive(Clone)]
pub struct SwapEngine {
    catalog: Arc<Catalog>,
    limit: usize,
}

impl SwapEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Caps the number of suggestions, never below [`MIN_LIMIT`].
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(MIN_LIMIT);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn suggest(
        &self,
        plan_id: &str,
        original: &Meal,
        preferences: &PlanPreferences,
        constraints: &SwapConstraints,
    ) -> mealwise_shared::Result<Vec<SwapSuggestion>> {
        constraints.validate()?;

        let mut allergies = preferences.allergies.clone();
        allergies.extend(
            constraints
                .allergies
                .iter()
                .map(|allergy| normalize_tag(allergy))
                .filter(|allergy| !allergy.is_empty()),
        );

        let ctx = BadgeContext {
            constraints,
            allergies: &allergies,
        };

        let mut ranked: Vec<(usize, &CatalogMeal, BTreeSet<Badge>)> = self
            .catalog
            .of_type(original.meal_type)
            .filter(|(_, meal)| meal.id != original.catalog_id)
            .filter(|(_, meal)| diet_accepts(&preferences.diet, &meal.tags))
            .filter(|(_, meal)| !contains_allergen(&meal.ingredients, &allergies))
            .map(|(index, meal)| (index, meal, Badge::evaluate(meal, &ctx)))
            .collect();

        ranked.sort_by(|(a_index, a, a_badges), (b_index, b, b_badges)| {
            b_badges
                .len()
                .cmp(&a_badges.len())
                .then(a.cost.total_cmp(&b.cost))
                .then(a.prep_minutes.cmp(&b.prep_minutes))
                .then(a_index.cmp(b_index))
        });

        let suggestions: Vec<SwapSuggestion> = ranked
            .into_iter()
            .take(self.limit)
            .map(|(_, meal, badges)| SwapSuggestion {
                deep_link_path: format!("/plans/{plan_id}/swap/{}", meal.id),
                candidate: meal.into(),
                badges,
            })
            .collect();

        tracing::debug!(
            plan_id,
            meal_id = %original.id,
            suggestions = suggestions.len(),
            "swap suggestions ranked"
        );

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::str::FromStr;

    use time::macros::date;

    use super::*;

    fn entry(id: &str, cost: f64, prep: u32, ingredients: &[&str]) -> CatalogMeal {
        CatalogMeal {
            id: id.to_owned(),
            meal_type: MealType::Dinner,
            title: id.to_owned(),
            description: String::new(),
            ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
            calories: 500,
            prep_minutes: prep,
            macros: BTreeMap::new(),
            cost,
            tags: BTreeSet::new(),
        }
    }

    fn engine(meals: Vec<CatalogMeal>) -> SwapEngine {
        let mut fallback = entry("fallback", 1.0, 5, &["rice"]);
        fallback.tags.insert("fallback".to_owned());

        SwapEngine::new(Arc::new(Catalog::new(meals, fallback).unwrap()))
    }

    fn original(engine: &SwapEngine, id: &str) -> Meal {
        engine
            .catalog
            .get(id)
            .unwrap()
            .schedule(date!(2025 - 01 - 27), MealType::Dinner)
    }

    #[test]
    fn test_badge_names() {
        assert_eq!(Badge::AllergenSafe.to_string(), "allergen-safe");
        assert_eq!(Badge::from_str("budget-friendly").unwrap(), Badge::BudgetFriendly);
        assert_eq!(
            serde_json::to_string(&Badge::Quick).unwrap(),
            "\"quick\""
        );
    }

    #[test]
    fn test_excludes_original_and_allergens() {
        let engine = engine(vec![
            entry("satay", 6.0, 20, &["peanut sauce", "chicken"]),
            entry("tacos", 5.0, 15, &["tortilla", "beans"]),
            entry("pad-thai", 7.0, 25, &["rice noodles", "crushed peanuts"]),
        ]);
        let constraints = SwapConstraints {
            allergies: vec!["Peanut".to_owned()],
            ..Default::default()
        };

        let suggestions = engine
            .suggest(
                "plan-1",
                &original(&engine, "satay"),
                &PlanPreferences::default(),
                &constraints,
            )
            .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].candidate.id, "tacos");
        assert!(suggestions[0].has_badge(Badge::AllergenSafe));
        assert_eq!(suggestions[0].deep_link_path, "/plans/plan-1/swap/tacos");
    }

    #[test]
    fn test_ranks_by_badge_count_then_cost() {
        let engine = engine(vec![
            entry("original", 9.0, 40, &["beef"]),
            entry("slow-cheap", 3.0, 45, &["lentils"]),
            entry("quick-pricey", 8.0, 10, &["eggs"]),
            entry("quick-cheap", 4.0, 10, &["tofu"]),
        ]);
        let constraints = SwapConstraints {
            max_prep_minutes: Some(15),
            budget_limit: Some(5.0),
            ..Default::default()
        };

        let ids: Vec<String> = engine
            .suggest(
                "plan-1",
                &original(&engine, "original"),
                &PlanPreferences::default(),
                &constraints,
            )
            .unwrap()
            .into_iter()
            .map(|s| s.candidate.id)
            .collect();

        assert_eq!(ids, vec!["quick-cheap", "slow-cheap", "quick-pricey"]);
    }

    #[test]
    fn test_no_survivors_is_empty() {
        let engine = engine(vec![entry("only", 5.0, 10, &["beans"])]);

        let suggestions = engine
            .suggest(
                "plan-1",
                &original(&engine, "only"),
                &PlanPreferences::default(),
                &SwapConstraints::default(),
            )
            .unwrap();

        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_limit_never_below_minimum() {
        let meals = (0..10)
            .map(|i| entry(&format!("meal-{i}"), i as f64, 10, &["beans"]))
            .collect();
        let engine = engine(meals).with_limit(1);

        assert_eq!(engine.limit(), MIN_LIMIT);

        let suggestions = engine
            .suggest(
                "plan-1",
                &original(&engine, "meal-0"),
                &PlanPreferences::default(),
                &SwapConstraints::default(),
            )
            .unwrap();

        assert_eq!(suggestions.len(), MIN_LIMIT);
    }

    #[test]
    fn test_invalid_constraints_are_rejected() {
        let engine = engine(vec![entry("only", 5.0, 10, &["beans"])]);
        let constraints = SwapConstraints {
            budget_limit: Some(-1.0),
            ..Default::default()
        };

        let err = engine
            .suggest(
                "plan-1",
                &original(&engine, "only"),
                &PlanPreferences::default(),
                &constraints,
            )
            .unwrap_err();

        assert!(matches!(err, mealwise_shared::Error::Validate(_)));
    }
}
