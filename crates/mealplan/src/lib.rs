pub mod catalog;
pub mod constraints;
mod coordinator;
mod engine;
mod preferences;
pub mod swap;

pub use catalog::{Catalog, CatalogMeal};
pub use coordinator::*;
pub use engine::*;
pub use preferences::*;
pub use swap::{Badge, SwapConstraints, SwapEngine, SwapSuggestion};
