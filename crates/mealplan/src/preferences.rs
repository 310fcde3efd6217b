use std::collections::BTreeSet;

use mealwise_shared::user::DEFAULT_DIET;
use mealwise_shared::{PlanPreferences, PreferenceRecord};
use validator::Validate;

use crate::constraints::normalize_tag;

/// Picks the override when it is defined, otherwise the stored value.
fn merged<T: Clone>(stored: &Option<T>, overrides: Option<&Option<T>>) -> Option<T> {
    match overrides {
        Some(Some(value)) => Some(value.clone()),
        _ => stored.clone(),
    }
}

fn normalize_list(values: Vec<String>) -> impl Iterator<Item = String> {
    values
        .into_iter()
        .map(|value| normalize_tag(&value))
        .filter(|value| !value.is_empty())
}

/// Merges stored preferences with one-shot overrides into the effective set.
///
/// Fields are merged one by one: a defined override wins, then a defined
/// stored value, then the default. An override of an empty list clears the
/// stored list.
pub fn resolve(
    stored: &PreferenceRecord,
    overrides: Option<&PreferenceRecord>,
) -> mealwise_shared::Result<PlanPreferences> {
    stored.validate()?;
    if let Some(overrides) = overrides {
        overrides.validate()?;
    }

    let diet = merged(&stored.diet, overrides.map(|o| &o.diet))
        .map(|diet| normalize_tag(&diet))
        .filter(|diet| !diet.is_empty())
        .unwrap_or_else(|| DEFAULT_DIET.to_owned());

    let allergies: BTreeSet<String> =
        merged(&stored.allergies, overrides.map(|o| &o.allergies))
            .map(|values| normalize_list(values).collect())
            .unwrap_or_default();

    let mut pantry: Vec<String> = vec![];
    for item in merged(&stored.pantry, overrides.map(|o| &o.pantry)).unwrap_or_default() {
        let item = item.trim().to_owned();
        if item.is_empty() || pantry.iter().any(|p| p.eq_ignore_ascii_case(&item)) {
            continue;
        }

        pantry.push(item);
    }

    Ok(PlanPreferences {
        diet,
        allergies,
        budget_limit: merged(&stored.budget_limit, overrides.map(|o| &o.budget_limit)),
        max_prep_minutes: merged(
            &stored.max_prep_minutes,
            overrides.map(|o| &o.max_prep_minutes),
        ),
        pantry,
    })
}
