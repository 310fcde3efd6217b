mod feature_log;
mod meal_plan;
mod user_preferences;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "mealwise",
    "m0001",
    vec_box![],
    vec_box![
        user_preferences::CreateTable,
        meal_plan::CreateTable,
        meal_plan::CreateIdx1,
        feature_log::CreateTable,
        feature_log::CreateIdx1
    ]
);
