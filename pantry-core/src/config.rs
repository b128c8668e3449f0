//! Matching and meal-planning tunables, loaded from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;
use crate::types::{MealType, RecipeCategory};

/// A recipe at or above this match percentage can be cooked right away.
pub const DEFAULT_CAN_MAKE_THRESHOLD: f64 = 70.0;

/// Recipes below this match percentage are never suggested for a meal slot.
pub const DEFAULT_MIN_MEAL_MATCH: f64 = 30.0;

/// Number of best candidates a meal slot picks from at random.
pub const DEFAULT_TOP_CANDIDATES: usize = 3;

/// Recipe categories allowed in one meal slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRule {
    pub meal_type: MealType,
    pub categories: Vec<RecipeCategory>,
}

impl SlotRule {
    pub fn allows(&self, category: RecipeCategory) -> bool {
        self.categories.contains(&category)
    }
}

/// Thresholds and slot allow-lists used by the ranker and the meal planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub can_make_threshold: f64,
    pub min_meal_match: f64,
    pub top_candidates: usize,
    /// Slots filled for each day, in order.
    pub slots: Vec<SlotRule>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            can_make_threshold: DEFAULT_CAN_MAKE_THRESHOLD,
            min_meal_match: DEFAULT_MIN_MEAL_MATCH,
            top_candidates: DEFAULT_TOP_CANDIDATES,
            slots: default_slots(),
        }
    }
}

/// Breakfast, lunch and dinner. Snacks are not planned.
pub fn default_slots() -> Vec<SlotRule> {
    vec![
        SlotRule {
            meal_type: MealType::Breakfast,
            categories: vec![RecipeCategory::Breakfast],
        },
        SlotRule {
            meal_type: MealType::Lunch,
            categories: vec![
                RecipeCategory::MainCourse,
                RecipeCategory::Salad,
                RecipeCategory::Soup,
            ],
        },
        SlotRule {
            meal_type: MealType::Dinner,
            categories: vec![RecipeCategory::MainCourse, RecipeCategory::Soup],
        },
    ]
}

impl MatchingConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `PANTRY_CAN_MAKE_THRESHOLD`: percentage (default: 70)
    /// - `PANTRY_MIN_MEAL_MATCH`: percentage (default: 30)
    /// - `PANTRY_TOP_CANDIDATES`: count, at least 1 (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build configuration from any variable source, such as a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var::<f64>(&lookup, "PANTRY_CAN_MAKE_THRESHOLD")? {
            config.can_make_threshold = percentage("PANTRY_CAN_MAKE_THRESHOLD", v)?;
        }
        if let Some(v) = parse_var::<f64>(&lookup, "PANTRY_MIN_MEAL_MATCH")? {
            config.min_meal_match = percentage("PANTRY_MIN_MEAL_MATCH", v)?;
        }
        if let Some(v) = parse_var::<usize>(&lookup, "PANTRY_TOP_CANDIDATES")? {
            if v == 0 {
                return Err(ConfigError::InvalidValue {
                    var: "PANTRY_TOP_CANDIDATES".to_string(),
                    value: v.to_string(),
                });
            }
            config.top_candidates = v;
        }

        Ok(config)
    }

    pub fn slot(&self, meal_type: MealType) -> Option<&SlotRule> {
        self.slots.iter().find(|s| s.meal_type == meal_type)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

fn percentage(var: &str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: value.to_string(),
        })
    }
}
