use std::collections::BTreeSet;

use mealwise_shared::PlanPreferences;
use mealwise_shared::user::DEFAULT_DIET;

use crate::CatalogMeal;

/// Trimmed, lower-cased form used for diet, allergy and tag comparisons.
pub fn normalize_tag(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Diet tags that also satisfy `diet` because they are strictly narrower.
fn stricter_diets(diet: &str) -> &'static [&'static str] {
    match diet {
        "vegetarian" => &["vegan"],
        "pescatarian" => &["vegetarian", "vegan"],
        _ => &[],
    }
}

/// Whether a meal carrying `tags` is compatible with `diet`.
///
/// The omnivore diet accepts everything. Any other diet requires its own tag
/// or the tag of a stricter diet (a vegan meal suits a vegetarian).
pub fn diet_accepts(diet: &str, tags: &BTreeSet<String>) -> bool {
    if diet.is_empty() || diet == DEFAULT_DIET {
        return true;
    }

    tags.contains(diet) || stricter_diets(diet).iter().any(|tag| tags.contains(*tag))
}

/// Whether any ingredient contains any allergy tag, case-insensitively.
///
/// Matching is by substring so that `"peanut"` catches `"peanut oil"`.
pub fn contains_allergen(ingredients: &[String], allergies: &BTreeSet<String>) -> bool {
    if allergies.is_empty() {
        return false;
    }

    ingredients.iter().any(|ingredient| {
        let ingredient = ingredient.to_lowercase();

        allergies
            .iter()
            .filter(|allergy| !allergy.is_empty())
            .any(|allergy| ingredient.contains(allergy.as_str()))
    })
}

pub fn within_prep(prep_minutes: u32, max_prep_minutes: Option<u32>) -> bool {
    max_prep_minutes.is_none_or(|max| prep_minutes <= max)
}

/// The diet, allergy and prep-time bounds a scheduled meal must never violate.
pub struct HardConstraints<'a> {
    preferences: &'a PlanPreferences,
}

impl<'a> HardConstraints<'a> {
    pub fn new(preferences: &'a PlanPreferences) -> Self {
        Self { preferences }
    }

    pub fn admits(&self, meal: &CatalogMeal) -> bool {
        diet_accepts(&self.preferences.diet, &meal.tags)
            && !contains_allergen(&meal.ingredients, &self.preferences.allergies)
            && within_prep(meal.prep_minutes, self.preferences.max_prep_minutes)
    }
}
