//! Day-by-day meal suggestions drawn from ranked recipe matches.

use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MatchingConfig, SlotRule};
use crate::matcher::normalize_names;
use crate::ranker::{find_matching_recipes, RecipeMatch};
use crate::store::{pantry_items_or_empty, PantryStore, RecipeStore};
use crate::types::{MealType, Recipe, RecipeIngredient};

/// Longest horizon accepted from API callers.
pub const MAX_PLAN_DAYS: u32 = 14;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MealPlanRequest {
    /// Restrict to one pantry; all of the user's items otherwise.
    #[serde(default)]
    pub pantry_id: Option<Uuid>,
    pub days: u32,
    /// Cuisines or tags to favour, e.g. "italian" or "vegetarian".
    #[serde(default)]
    pub preferences: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealPlanSuggestion {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe: Recipe,
    pub match_percentage: f64,
    pub missing_ingredients: Vec<RecipeIngredient>,
}

/// Matches that qualify for a slot, keeping ranked order.
pub fn slot_candidates<'a>(
    matches: &'a [RecipeMatch],
    slot: &SlotRule,
    config: &MatchingConfig,
) -> Vec<&'a RecipeMatch> {
    matches
        .iter()
        .filter(|m| m.match_percentage >= config.min_meal_match)
        .filter(|m| slot.allows(m.recipe.category))
        .collect()
}

fn matches_preference(recipe: &Recipe, preferences: &[String]) -> bool {
    let cuisine = recipe.cuisine.as_deref().map(|c| c.trim().to_lowercase());
    preferences.iter().any(|pref| {
        cuisine.as_deref() == Some(pref.as_str())
            || recipe.tags.iter().any(|tag| tag.trim().to_lowercase() == *pref)
    })
}

/// Candidates matching a preference, or all of them when none do.
fn apply_preferences<'a>(
    candidates: Vec<&'a RecipeMatch>,
    preferences: &[String],
) -> Vec<&'a RecipeMatch> {
    if preferences.is_empty() {
        return candidates;
    }
    let preferred: Vec<&RecipeMatch> = candidates
        .iter()
        .copied()
        .filter(|m| matches_preference(&m.recipe, preferences))
        .collect();
    if preferred.is_empty() {
        candidates
    } else {
        preferred
    }
}

/// Fill `days` days starting at `start`, one suggestion per configured slot
/// when some recipe qualifies.
///
/// `matches` must be ranked best first (see [`crate::ranker::rank_recipes`]).
/// Each slot picks uniformly among its top `config.top_candidates` candidates.
/// Output is ordered by day, then slot.
pub fn assemble_meal_plan<R: Rng>(
    matches: &[RecipeMatch],
    start: NaiveDate,
    days: u32,
    preferences: &[String],
    config: &MatchingConfig,
    rng: &mut R,
) -> Vec<MealPlanSuggestion> {
    let preferences = normalize_names(preferences.iter().map(|p| p.as_str()));
    let mut suggestions = Vec::new();

    for day in 0..days {
        let Some(date) = start.checked_add_days(Days::new(u64::from(day))) else {
            break;
        };

        for slot in &config.slots {
            let candidates = apply_preferences(slot_candidates(matches, slot, config), &preferences);
            if candidates.is_empty() {
                continue;
            }

            let top = candidates.len().min(config.top_candidates.max(1));
            let picked = candidates[rng.random_range(0..top)];

            suggestions.push(MealPlanSuggestion {
                date,
                meal_type: slot.meal_type,
                recipe: picked.recipe.clone(),
                match_percentage: picked.match_percentage,
                missing_ingredients: picked.missing_ingredients.clone(),
            });
        }
    }

    suggestions
}

/// Load the pantry once, rank visible recipes and assemble a plan from `today`.
///
/// A failed pantry read is logged and treated as an empty pantry, which leaves
/// no recipe above the meal threshold.
pub async fn generate_meal_plan<S, R>(
    store: &S,
    user_id: Uuid,
    request: &MealPlanRequest,
    today: NaiveDate,
    config: &MatchingConfig,
    rng: &mut R,
) -> Vec<MealPlanSuggestion>
where
    S: PantryStore + RecipeStore + ?Sized,
    R: Rng + Send,
{
    let pantry_items = pantry_items_or_empty(store, user_id, request.pantry_id).await;

    let matches = find_matching_recipes(store, user_id, &pantry_items, config).await;
    let plan = assemble_meal_plan(
        &matches,
        today,
        request.days,
        &request.preferences,
        config,
        rng,
    );

    tracing::info!(
        user_id = %user_id,
        days = request.days,
        suggestions = plan.len(),
        "Generated meal plan"
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeCategory;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ranked(name: &str, category: RecipeCategory, pct: f64) -> RecipeMatch {
        let recipe: Recipe = serde_json::from_value(serde_json::json!({
            "name": name,
            "category": category,
        }))
        .unwrap();
        RecipeMatch {
            recipe,
            match_percentage: pct,
            available_ingredients: vec![],
            missing_ingredients: vec![],
            can_make: pct >= 70.0,
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_slot_candidates_filters_category_and_threshold() {
        let config = MatchingConfig::default();
        let matches = vec![
            ranked("Soup", RecipeCategory::Soup, 80.0),
            ranked("Cake", RecipeCategory::Dessert, 90.0),
            ranked("Salad", RecipeCategory::Salad, 25.0),
            ranked("Stew", RecipeCategory::MainCourse, 30.0),
        ];
        let lunch = config.slot(MealType::Lunch).unwrap();
        let names: Vec<&str> = slot_candidates(&matches, lunch, &config)
            .iter()
            .map(|m| m.recipe.name.as_str())
            .collect();
        assert_eq!(names, vec!["Soup", "Stew"]);
    }

    #[test]
    fn test_picks_only_from_top_three() {
        let config = MatchingConfig::default();
        let matches = vec![
            ranked("A", RecipeCategory::MainCourse, 95.0),
            ranked("B", RecipeCategory::MainCourse, 90.0),
            ranked("C", RecipeCategory::MainCourse, 85.0),
            ranked("D", RecipeCategory::MainCourse, 80.0),
            ranked("E", RecipeCategory::MainCourse, 75.0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let plan = assemble_meal_plan(&matches, start(), 30, &[], &config, &mut rng);

        assert!(!plan.is_empty());
        for s in &plan {
            assert!(["A", "B", "C"].contains(&s.recipe.name.as_str()));
        }
    }

    #[test]
    fn test_single_candidate_is_always_picked() {
        let config = MatchingConfig::default();
        let matches = vec![ranked("Porridge", RecipeCategory::Breakfast, 50.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = assemble_meal_plan(&matches, start(), 3, &[], &config, &mut rng);

        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|s| s.meal_type == MealType::Breakfast));
        assert!(plan.iter().all(|s| s.recipe.name == "Porridge"));
    }

    #[test]
    fn test_day_major_slot_order() {
        let config = MatchingConfig::default();
        let matches = vec![
            ranked("Eggs", RecipeCategory::Breakfast, 100.0),
            ranked("Stew", RecipeCategory::MainCourse, 100.0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plan = assemble_meal_plan(&matches, start(), 2, &[], &config, &mut rng);

        let order: Vec<(NaiveDate, MealType)> = plan.iter().map(|s| (s.date, s.meal_type)).collect();
        let next = start().succ_opt().unwrap();
        assert_eq!(
            order,
            vec![
                (start(), MealType::Breakfast),
                (start(), MealType::Lunch),
                (start(), MealType::Dinner),
                (next, MealType::Breakfast),
                (next, MealType::Lunch),
                (next, MealType::Dinner),
            ]
        );
    }

    #[test]
    fn test_same_seed_same_plan() {
        let config = MatchingConfig::default();
        let matches = vec![
            ranked("A", RecipeCategory::MainCourse, 95.0),
            ranked("B", RecipeCategory::Soup, 90.0),
            ranked("C", RecipeCategory::Salad, 85.0),
        ];
        let names = |seed: u64| -> Vec<String> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assemble_meal_plan(&matches, start(), 5, &[], &config, &mut rng)
                .into_iter()
                .map(|s| s.recipe.name)
                .collect()
        };
        assert_eq!(names(42), names(42));
    }

    #[test]
    fn test_zero_days_is_empty() {
        let config = MatchingConfig::default();
        let matches = vec![ranked("A", RecipeCategory::MainCourse, 95.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(assemble_meal_plan(&matches, start(), 0, &[], &config, &mut rng).is_empty());
    }

    #[test]
    fn test_preferences_favour_matching_cuisine() {
        let config = MatchingConfig::default();
        let mut pasta = ranked("Pasta", RecipeCategory::MainCourse, 60.0);
        pasta.recipe.cuisine = Some("Italian".to_string());
        let matches = vec![
            ranked("Curry", RecipeCategory::MainCourse, 95.0),
            ranked("Chili", RecipeCategory::MainCourse, 90.0),
            ranked("Tacos", RecipeCategory::MainCourse, 85.0),
            pasta,
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let plan = assemble_meal_plan(
            &matches,
            start(),
            4,
            &["italian".to_string()],
            &config,
            &mut rng,
        );
        assert!(plan.iter().all(|s| s.recipe.name == "Pasta"));
    }

    #[test]
    fn test_unmatched_preferences_fall_back() {
        let config = MatchingConfig::default();
        let matches = vec![ranked("Curry", RecipeCategory::MainCourse, 95.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let plan = assemble_meal_plan(
            &matches,
            start(),
            1,
            &["vegan".to_string()],
            &config,
            &mut rng,
        );
        // Lunch and dinner both accept main courses
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_preference_matches_tag() {
        let mut recipe = ranked("Bowl", RecipeCategory::Salad, 50.0).recipe;
        recipe.tags = vec!["Vegetarian".to_string()];
        assert!(matches_preference(&recipe, &["vegetarian".to_string()]));
        assert!(!matches_preference(&recipe, &["vegan".to_string()]));
    }
}
