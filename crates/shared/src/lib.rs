mod command;
mod date;
pub mod mealplan;
pub mod store;
pub mod user;

pub use command::*;
pub use date::*;
pub use mealplan::{
    GeneratedMealPlan, GroceryItem, Meal, MealType, PlanMetadata, total_cost,
};
pub use store::{FeatureLogger, PlanRepository, PreferenceStore};
pub use user::{PlanPreferences, PreferenceRecord};
