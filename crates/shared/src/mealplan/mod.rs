use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Date, OffsetDateTime};

use crate::user::PlanPreferences;

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
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    #[default]
    Dinner,
    Snack,
}

/// One scheduled meal of a plan.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Meal {
    pub id: String,
    pub catalog_id: String,
    pub day: String,
    pub date: Date,
    pub meal_type: MealType,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub calories: u32,
    pub prep_minutes: u32,
    pub macros: BTreeMap<String, f64>,
    pub cost: f64,
    pub tags: BTreeSet<String>,
}

impl Meal {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GroceryItem {
    pub name: String,
    pub quantity: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PlanMetadata {
    pub notes: Vec<String>,
    pub preferences: PlanPreferences,
}

impl PlanMetadata {
    /// Case-insensitive search over the plan notes.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();

        self.notes
            .iter()
            .any(|note| note.to_lowercase().contains(&needle))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GeneratedMealPlan {
    pub id: String,
    pub user_id: String,
    pub week_start: Date,
    pub generated_at: OffsetDateTime,
    pub meals: Vec<Meal>,
    pub total_cost: f64,
    pub total_calories: u32,
    pub grocery_list: Vec<GroceryItem>,
    pub metadata: PlanMetadata,
}

impl GeneratedMealPlan {
    pub fn find_meal(&self, meal_id: &str) -> Option<&Meal> {
        self.meals.iter().find(|meal| meal.id == meal_id)
    }

    /// Recomputes `total_cost` and `total_calories` from the meals.
    pub fn refresh_totals(&mut self) {
        self.total_cost = total_cost(&self.meals);
        self.total_calories = self.meals.iter().map(|meal| meal.calories).sum();
    }
}

/// Sum of meal costs rounded to cents.
pub fn total_cost(meals: &[Meal]) -> f64 {
    let total: f64 = meals.iter().map(|meal| meal.cost).sum();

    (total * 100.0).round() / 100.0
}
