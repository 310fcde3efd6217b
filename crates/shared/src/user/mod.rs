use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_DIET: &str = "omnivore";

/// A stored or one-shot override preference record.
///
/// Every field is optional: `None` means "not defined here", which is distinct
/// from an explicitly empty list.
#[derive(Validate, Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct PreferenceRecord {
    #[validate(length(min = 1, max = 32))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_limit: Option<f64>,
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prep_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pantry: Option<Vec<String>>,
}

impl PreferenceRecord {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Effective constraint set used for a single generation call.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlanPreferences {
    pub diet: String,
    pub allergies: BTreeSet<String>,
    pub budget_limit: Option<f64>,
    pub max_prep_minutes: Option<u32>,
    pub pantry: Vec<String>,
}

impl Default for PlanPreferences {
    fn default() -> Self {
        Self {
            diet: DEFAULT_DIET.to_owned(),
            allergies: BTreeSet::new(),
            budget_limit: None,
            max_prep_minutes: None,
            pantry: vec![],
        }
    }
}

impl PlanPreferences {
    pub fn is_omnivore(&self) -> bool {
        self.diet == DEFAULT_DIET
    }
}
