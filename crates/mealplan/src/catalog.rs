use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use mealwise_shared::{Meal, MealType, day_label};
use serde::{Deserialize, Serialize};
use time::Date;
use ulid::Ulid;

use crate::constraints::normalize_tag;

const DEFAULT_CATALOG: &str = include_str!("../catalog/default.json");

pub const FALLBACK_TAG: &str = "fallback";

/// A candidate meal the engine can schedule.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CatalogMeal {
    pub id: String,
    pub meal_type: MealType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<String>,
    pub calories: u32,
    pub prep_minutes: u32,
    #[serde(default)]
    pub macros: BTreeMap<String, f64>,
    pub cost: f64,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl CatalogMeal {
    /// Materializes this entry as a scheduled meal with a fresh identifier.
    pub fn schedule(&self, date: Date, meal_type: MealType) -> Meal {
        Meal {
            id: Ulid::new().to_string(),
            catalog_id: self.id.to_owned(),
            day: day_label(date),
            date,
            meal_type,
            title: self.title.to_owned(),
            description: self.description.to_owned(),
            ingredients: self.ingredients.to_owned(),
            calories: self.calories,
            prep_minutes: self.prep_minutes,
            macros: self.macros.to_owned(),
            cost: self.cost,
            tags: self.tags.to_owned(),
        }
    }

    fn normalize(mut self) -> Self {
        self.id = self.id.trim().to_owned();
        self.tags = self.tags.iter().map(|tag| normalize_tag(tag)).collect();
        self
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    meals: Vec<CatalogMeal>,
    fallback: CatalogMeal,
}

/// Read-only reference data shared by the plan and swap engines.
#[derive(Clone, Debug)]
pub struct Catalog {
    meals: Vec<CatalogMeal>,
    fallback: CatalogMeal,
}

impl Catalog {
    pub fn new(
        meals: Vec<CatalogMeal>,
        fallback: CatalogMeal,
    ) -> mealwise_shared::Result<Self> {
        let meals: Vec<CatalogMeal> = meals.into_iter().map(CatalogMeal::normalize).collect();
        let fallback = fallback.normalize();

        if !fallback.tags.contains(FALLBACK_TAG) {
            mealwise_shared::bail!(
                "catalog fallback meal '{}' must be tagged '{}'",
                fallback.id,
                FALLBACK_TAG
            );
        }

        let mut ids = HashSet::new();
        for meal in meals.iter().chain(std::iter::once(&fallback)) {
            if meal.id.is_empty() {
                mealwise_shared::bail!("catalog meal '{}' has an empty id", meal.title);
            }

            if !ids.insert(meal.id.as_str()) {
                mealwise_shared::bail!("catalog meal id '{}' is duplicated", meal.id);
            }

            if !meal.cost.is_finite() || meal.cost < 0.0 {
                mealwise_shared::bail!("catalog meal '{}' has an invalid cost", meal.id);
            }
        }

        Ok(Self { meals, fallback })
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> mealwise_shared::Result<Self> {
        Self::from_json(DEFAULT_CATALOG)
    }

    pub fn from_json(json: &str) -> mealwise_shared::Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;

        Self::new(file.meals, file.fallback)
    }

    pub fn from_path(path: impl AsRef<Path>) -> mealwise_shared::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            mealwise_shared::Error::Server(format!(
                "failed to read catalog {}: {err}",
                path.display()
            ))
        })?;

        Self::from_json(&json)
    }

    pub fn meals(&self) -> &[CatalogMeal] {
        &self.meals
    }

    pub fn fallback(&self) -> &CatalogMeal {
        &self.fallback
    }

    pub fn get(&self, id: &str) -> Option<&CatalogMeal> {
        self.meals.iter().find(|meal| meal.id == id)
    }

    /// Entries of one meal type paired with their catalog position.
    pub fn of_type(&self, meal_type: MealType) -> impl Iterator<Item = (usize, &CatalogMeal)> {
        self.meals
            .iter()
            .enumerate()
            .filter(move |(_, meal)| meal.meal_type == meal_type)
    }
}
