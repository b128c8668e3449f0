//! Scores every visible recipe against the pantry and orders the results.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::MatchingConfig;
use crate::matcher::{available_names, partition_ingredients};
use crate::store::{pantry_items_or_empty, PantryStore, RecipeStore};
use crate::types::{PantryItem, Recipe, RecipeIngredient};

/// How well the pantry covers one recipe. Built fresh on every call.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    /// Share of the recipe's ingredients found in the pantry, 0 to 100.
    pub match_percentage: f64,
    pub available_ingredients: Vec<RecipeIngredient>,
    pub missing_ingredients: Vec<RecipeIngredient>,
    pub can_make: bool,
}

/// `100 * available / total`, or 0 for a recipe without ingredients.
pub fn match_percentage(available: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    available as f64 * 100.0 / total as f64
}

pub fn match_recipe(recipe: &Recipe, available: &[String], config: &MatchingConfig) -> RecipeMatch {
    let (available_ingredients, missing_ingredients) =
        partition_ingredients(available, &recipe.ingredients);
    let percentage = match_percentage(available_ingredients.len(), recipe.ingredients.len());

    RecipeMatch {
        recipe: recipe.clone(),
        match_percentage: percentage,
        available_ingredients,
        missing_ingredients,
        can_make: !recipe.ingredients.is_empty() && percentage >= config.can_make_threshold,
    }
}

/// Best match first. Equal percentages are ordered by recipe name, then id,
/// so the output does not depend on fetch order.
pub fn sort_matches(matches: &mut [RecipeMatch]) {
    matches.sort_by(|a, b| {
        b.match_percentage
            .total_cmp(&a.match_percentage)
            .then_with(|| {
                a.recipe
                    .name
                    .to_lowercase()
                    .cmp(&b.recipe.name.to_lowercase())
            })
            .then_with(|| a.recipe.id.cmp(&b.recipe.id))
    });
}

/// Match every recipe against the pantry, best first. Nothing is dropped.
pub fn rank_recipes(
    pantry_items: &[PantryItem],
    recipes: &[Recipe],
    config: &MatchingConfig,
) -> Vec<RecipeMatch> {
    let available = available_names(pantry_items);
    let mut matches: Vec<RecipeMatch> = recipes
        .iter()
        .map(|recipe| match_recipe(recipe, &available, config))
        .collect();
    sort_matches(&mut matches);
    matches
}

/// Rank the recipes visible to `user_id` against an already loaded pantry.
///
/// A failed recipe read is logged and yields no matches.
pub async fn find_matching_recipes<S>(
    store: &S,
    user_id: Uuid,
    pantry_items: &[PantryItem],
    config: &MatchingConfig,
) -> Vec<RecipeMatch>
where
    S: RecipeStore + ?Sized,
{
    let recipes = match store.list_recipes(user_id).await {
        Ok(recipes) => recipes,
        Err(e) => {
            tracing::error!(user_id = %user_id, "Failed to load recipes for matching: {}", e);
            return Vec::new();
        }
    };

    let matches = rank_recipes(pantry_items, &recipes, config);
    tracing::debug!(
        user_id = %user_id,
        recipes = recipes.len(),
        pantry_items = pantry_items.len(),
        "Ranked recipes"
    );
    matches
}

/// Load the user's pantry and rank visible recipes against it.
///
/// A failed pantry read counts as an empty pantry, so every recipe still
/// comes back at 0%.
pub async fn match_pantry<S>(
    store: &S,
    user_id: Uuid,
    pantry_id: Option<Uuid>,
    config: &MatchingConfig,
) -> Vec<RecipeMatch>
where
    S: PantryStore + RecipeStore + ?Sized,
{
    let items = pantry_items_or_empty(store, user_id, pantry_id).await;
    find_matching_recipes(store, user_id, &items, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeCategory;

    fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "category": RecipeCategory::MainCourse,
            "ingredients": ingredients
                .iter()
                .map(|i| serde_json::json!({ "name": i }))
                .collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    fn available(raw: &[&str]) -> Vec<String> {
        crate::matcher::normalize_names(raw.iter().copied())
    }

    #[test]
    fn test_match_percentage() {
        assert_eq!(match_percentage(0, 0), 0.0);
        assert_eq!(match_percentage(1, 4), 25.0);
        assert_eq!(match_percentage(3, 3), 100.0);
    }

    #[test]
    fn test_match_recipe_counts() {
        let config = MatchingConfig::default();
        let r = recipe("Omelette", &["eggs", "milk", "cheese", "chives"]);
        let m = match_recipe(&r, &available(&["eggs", "milk", "cheddar cheese"]), &config);

        assert_eq!(m.match_percentage, 75.0);
        assert!(m.can_make);
        assert_eq!(m.available_ingredients.len(), 3);
        assert_eq!(m.missing_ingredients.len(), 1);
        assert_eq!(m.missing_ingredients[0].name, "chives");
    }

    #[test]
    fn test_can_make_boundary() {
        let config = MatchingConfig::default();
        let seven_of_ten: Vec<String> = (0..10).map(|i| format!("item{}", i)).collect();
        let refs: Vec<&str> = seven_of_ten.iter().map(|s| s.as_str()).collect();
        let r = recipe("Ten", &refs);

        let at = match_recipe(&r, &available(&refs[..7]), &config);
        assert_eq!(at.match_percentage, 70.0);
        assert!(at.can_make);

        let below = match_recipe(&r, &available(&refs[..6]), &config);
        assert!(!below.can_make);
    }

    #[test]
    fn test_zero_ingredient_recipe() {
        let config = MatchingConfig::default();
        let m = match_recipe(&recipe("Air", &[]), &available(&["milk"]), &config);
        assert_eq!(m.match_percentage, 0.0);
        assert!(!m.can_make);
        assert!(m.available_ingredients.is_empty());
        assert!(m.missing_ingredients.is_empty());
    }

    #[test]
    fn test_zero_ingredient_recipe_with_zero_threshold() {
        let config = MatchingConfig {
            can_make_threshold: 0.0,
            ..MatchingConfig::default()
        };
        let m = match_recipe(&recipe("Air", &[]), &[], &config);
        assert!(!m.can_make);
    }

    #[test]
    fn test_sort_ties_by_name() {
        let config = MatchingConfig::default();
        let recipes = vec![
            recipe("zucchini bake", &["flour"]),
            recipe("Apple pie", &["flour"]),
            recipe("bread", &["flour"]),
        ];
        let items: Vec<PantryItem> = vec![];
        let ranked = rank_recipes(&items, &recipes, &config);
        let names: Vec<&str> = ranked.iter().map(|m| m.recipe.name.as_str()).collect();
        assert_eq!(names, vec!["Apple pie", "bread", "zucchini bake"]);
    }
}
