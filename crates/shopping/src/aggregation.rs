use std::collections::{HashMap, HashSet};

use mealwise_shared::{GroceryItem, Meal};

/// Key under which ingredient names are compared.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Builds the grocery list for a set of meals.
///
/// Each ingredient name is counted once per occurrence across all meals, with
/// names compared after trimming and lower-casing. The first spelling seen is
/// the one listed. Anything matching a pantry entry is treated as already owned
/// and left out entirely. Items keep the order in which they first appear.
pub fn aggregate(meals: &[Meal], pantry: &[String]) -> Vec<GroceryItem> {
    let owned: HashSet<String> = pantry.iter().map(|item| normalize_name(item)).collect();

    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut items: Vec<GroceryItem> = vec![];

    for ingredient in meals.iter().flat_map(|meal| meal.ingredients.iter()) {
        let key = normalize_name(ingredient);
        if key.is_empty() || owned.contains(&key) {
            continue;
        }

        match positions.get(&key) {
            Some(&position) => items[position].quantity += 1,
            None => {
                positions.insert(key, items.len());
                items.push(GroceryItem {
                    name: ingredient.trim().to_owned(),
                    quantity: 1,
                });
            }
        }
    }

    tracing::debug!(
        meals = meals.len(),
        items = items.len(),
        pantry = owned.len(),
        "grocery list aggregated"
    );

    items
}
