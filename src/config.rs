use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mealwise_shared::MealType;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Forces JSON log lines outside production.
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlannerConfig {
    /// Meal types scheduled every day of the week
    #[serde(default = "default_meal_types")]
    pub meal_types: Vec<MealType>,
    #[serde(default = "default_swap_limit")]
    pub swap_limit: usize,
    /// Replaces the bundled catalog when set
    #[serde(default)]
    pub catalog_path: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            meal_types: default_meal_types(),
            swap_limit: default_swap_limit(),
            catalog_path: None,
        }
    }
}

fn default_meal_types() -> Vec<MealType> {
    vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner]
}

fn default_swap_limit() -> usize {
    mealwise_mealplan::swap::DEFAULT_LIMIT
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy `DATABASE_URL`
    /// 2. Environment variables (MEALWISE__DATABASE__URL, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("database.url", "sqlite:mealwise.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALWISE")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.planner.meal_types.is_empty() {
            return Err("Planner meal_types must not be empty".to_string());
        }
        if !self.planner.meal_types.contains(&MealType::Dinner) {
            return Err("Planner meal_types must include dinner".to_string());
        }
        if self.planner.swap_limit < mealwise_mealplan::swap::MIN_LIMIT {
            return Err(format!(
                "Planner swap_limit must be at least {}",
                mealwise_mealplan::swap::MIN_LIMIT
            ));
        }
        Ok(())
    }
}
