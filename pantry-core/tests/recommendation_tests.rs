//! End-to-end tests for recipe matching and meal-plan suggestions.
//!
//! These drive the public API the way the server does: pantry items and
//! recipes come from a store, matches are ranked, and meal plans are drawn
//! with a seeded random source so runs are reproducible.

use chrono::{Duration, NaiveDate};
use pantry_core::config::MatchingConfig;
use pantry_core::meal_plan::{assemble_meal_plan, generate_meal_plan, MealPlanRequest};
use pantry_core::ranker::{find_matching_recipes, match_pantry, rank_recipes};
use pantry_core::store::{InMemoryStore, PantryStore};
use pantry_core::types::{MealType, PantryItem, Recipe, RecipeCategory};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

fn pantry(user_id: Uuid, names: &[&str]) -> Vec<PantryItem> {
    names
        .iter()
        .map(|name| {
            serde_json::from_value(serde_json::json!({
                "user_id": user_id,
                "name": name,
                "category": "OTHER",
                "quantity": 2.0,
            }))
            .unwrap()
        })
        .collect()
}

fn recipe(name: &str, category: RecipeCategory, ingredients: &[&str]) -> Recipe {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "category": category,
        "is_public": true,
        "ingredients": ingredients
            .iter()
            .map(|i| serde_json::json!({ "name": i, "quantity": 1.0, "unit": "piece" }))
            .collect::<Vec<_>>(),
    }))
    .unwrap()
}

/// A recipe with `total` ingredients of which the first `have` are named in the pantry.
fn recipe_with_coverage(
    name: &str,
    category: RecipeCategory,
    have: usize,
    total: usize,
) -> (Recipe, Vec<String>) {
    let ingredients: Vec<String> = (0..total).map(|i| format!("{}-part-{}", name, i)).collect();
    let refs: Vec<&str> = ingredients.iter().map(|s| s.as_str()).collect();
    let recipe = recipe(name, category, &refs);
    (recipe, ingredients.into_iter().take(have).collect())
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

#[test]
fn test_available_and_missing_partition_ingredients() {
    let user = Uuid::new_v4();
    let items = pantry(user, &["eggs", "whole milk", "Butter"]);
    let recipes = vec![
        recipe("Pancakes", RecipeCategory::Breakfast, &["egg", "milk", "flour", "butter", "sugar"]),
        recipe("Toast", RecipeCategory::Breakfast, &["bread", "butter"]),
        recipe("Nothing", RecipeCategory::Snack, &[]),
    ];

    for m in rank_recipes(&items, &recipes, &MatchingConfig::default()) {
        let total = m.recipe.ingredients.len();
        assert_eq!(m.available_ingredients.len() + m.missing_ingredients.len(), total);
        for ingredient in &m.recipe.ingredients {
            let available = m.available_ingredients.iter().filter(|i| i.id == ingredient.id).count();
            let missing = m.missing_ingredients.iter().filter(|i| i.id == ingredient.id).count();
            assert_eq!(available + missing, 1, "{} in {}", ingredient.name, m.recipe.name);
        }
    }
}

#[test]
fn test_percentage_is_exact_share_and_bounded() {
    let user = Uuid::new_v4();
    let items = pantry(user, &["egg", "milk"]);
    let recipes = vec![
        recipe("Custard", RecipeCategory::Dessert, &["eggs", "milk", "sugar"]),
        recipe("Glass of milk", RecipeCategory::Beverage, &["milk"]),
        recipe("Bread", RecipeCategory::SideDish, &["flour", "yeast"]),
    ];

    for m in rank_recipes(&items, &recipes, &MatchingConfig::default()) {
        assert!((0.0..=100.0).contains(&m.match_percentage));
        let expected = 100.0 * m.available_ingredients.len() as f64
            / m.recipe.ingredients.len() as f64;
        assert_eq!(m.match_percentage, expected);
    }
}

#[test]
fn test_can_make_tracks_seventy_percent() {
    let user = Uuid::new_v4();
    let mut recipes = Vec::new();
    let mut names = Vec::new();
    for (name, have) in [("six", 6), ("seven", 7), ("ten", 10)] {
        let (r, have_names) = recipe_with_coverage(name, RecipeCategory::MainCourse, have, 10);
        recipes.push(r);
        names.extend(have_names);
    }
    let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    let items = pantry(user, &refs);

    let matches = rank_recipes(&items, &recipes, &MatchingConfig::default());
    for m in &matches {
        assert_eq!(m.can_make, m.match_percentage >= 70.0, "{}", m.recipe.name);
    }
    let can_make: Vec<&str> = matches
        .iter()
        .filter(|m| m.can_make)
        .map(|m| m.recipe.name.as_str())
        .collect();
    assert_eq!(can_make, vec!["ten", "seven"]);
}

#[test]
fn test_containment_is_bidirectional() {
    let user = Uuid::new_v4();
    let config = MatchingConfig::default();

    let singular_pantry = rank_recipes(
        &pantry(user, &["tomato"]),
        &[recipe("Sauce", RecipeCategory::MainCourse, &["tomatoes"])],
        &config,
    );
    assert_eq!(singular_pantry[0].match_percentage, 100.0);

    let specific_pantry = rank_recipes(
        &pantry(user, &["cherry tomatoes"]),
        &[recipe("Sauce", RecipeCategory::MainCourse, &["tomatoes"])],
        &config,
    );
    assert_eq!(specific_pantry[0].match_percentage, 100.0);
}

#[test]
fn test_matching_ignores_case() {
    let user = Uuid::new_v4();
    let matches = rank_recipes(
        &pantry(user, &["MILK"]),
        &[recipe("Latte", RecipeCategory::Beverage, &["milk"])],
        &MatchingConfig::default(),
    );
    assert_eq!(matches[0].available_ingredients.len(), 1);
}

#[test]
fn test_ranked_best_first() {
    let user = Uuid::new_v4();
    let mut recipes = Vec::new();
    let mut names = Vec::new();
    for (name, have) in [("ninety", 9), ("forty", 4), ("seventy", 7)] {
        let (r, have_names) = recipe_with_coverage(name, RecipeCategory::MainCourse, have, 10);
        recipes.push(r);
        names.extend(have_names);
    }
    let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();

    let matches = rank_recipes(&pantry(user, &refs), &recipes, &MatchingConfig::default());
    let percentages: Vec<f64> = matches.iter().map(|m| m.match_percentage).collect();
    assert_eq!(percentages, vec![90.0, 70.0, 40.0]);
}

#[test]
fn test_dessert_is_never_planned() {
    let user = Uuid::new_v4();
    let items = pantry(user, &["sugar", "flour", "butter", "eggs"]);
    let recipes = vec![
        recipe("Cake", RecipeCategory::Dessert, &["sugar", "flour", "butter", "eggs"]),
        recipe("Cookies", RecipeCategory::Dessert, &["sugar", "flour", "butter"]),
        recipe("Omelette", RecipeCategory::Breakfast, &["eggs", "butter", "chives"]),
    ];
    let config = MatchingConfig::default();
    let matches = rank_recipes(&items, &recipes, &config);

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let plan = assemble_meal_plan(&matches, today(), 7, &[], &config, &mut rng);
        assert!(plan
            .iter()
            .all(|s| s.recipe.category != RecipeCategory::Dessert));
        assert!(plan.iter().all(|s| s.recipe.name == "Omelette"));
    }
}

#[test]
fn test_low_match_is_never_planned() {
    let user = Uuid::new_v4();
    let (stew, have) = recipe_with_coverage("stew", RecipeCategory::MainCourse, 2, 10);
    let refs: Vec<&str> = have.iter().map(|s| s.as_str()).collect();
    let config = MatchingConfig::default();
    let matches = rank_recipes(&pantry(user, &refs), &[stew], &config);
    assert_eq!(matches[0].match_percentage, 20.0);

    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let plan = assemble_meal_plan(&matches, today(), 7, &[], &config, &mut rng);
    assert!(plan.is_empty());
}

#[test]
fn test_empty_pantry_matches_nothing() {
    let recipes = vec![
        recipe("A", RecipeCategory::MainCourse, &["rice"]),
        recipe("B", RecipeCategory::Soup, &["lentils", "onion"]),
        recipe("C", RecipeCategory::Salad, &["lettuce", "tomato", "cucumber"]),
    ];
    let matches = rank_recipes(&[], &recipes, &MatchingConfig::default());
    assert_eq!(matches.len(), 3);
    for m in matches {
        assert_eq!(m.match_percentage, 0.0);
        assert!(!m.can_make);
        assert_eq!(m.missing_ingredients.len(), m.recipe.ingredients.len());
    }
}

#[tokio::test]
async fn test_two_day_plan_covers_today_and_tomorrow() {
    let user = Uuid::new_v4();
    let items = pantry(user, &["oats", "milk", "rice", "beans", "lettuce", "tomato"]);
    let recipes = vec![
        recipe("Porridge", RecipeCategory::Breakfast, &["oats", "milk"]),
        recipe("Rice and beans", RecipeCategory::MainCourse, &["rice", "beans", "onion"]),
        recipe("Side salad", RecipeCategory::Salad, &["lettuce", "tomato"]),
        recipe("Brownies", RecipeCategory::Dessert, &["chocolate", "milk"]),
    ];
    let store = InMemoryStore::new(items, recipes);
    let request = MealPlanRequest {
        pantry_id: None,
        days: 2,
        preferences: vec![],
    };
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let plan = generate_meal_plan(
        &store,
        user,
        &request,
        today(),
        &MatchingConfig::default(),
        &mut rng,
    )
    .await;

    assert!(plan.len() <= 6);
    let tomorrow = today() + Duration::days(1);
    assert!(plan.iter().all(|s| s.date == today() || s.date == tomorrow));
    for date in [today(), tomorrow] {
        let slots: Vec<MealType> = plan
            .iter()
            .filter(|s| s.date == date)
            .map(|s| s.meal_type)
            .collect();
        assert_eq!(
            slots,
            vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner]
        );
    }
}

#[tokio::test]
async fn test_failed_recipe_read_yields_no_matches() {
    let user = Uuid::new_v4();
    let store = InMemoryStore::new(pantry(user, &["milk"]), vec![]).fail_with("connection refused");
    let items = pantry(user, &["milk"]);

    let matches = find_matching_recipes(&store, user, &items, &MatchingConfig::default()).await;
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_failed_pantry_read_yields_empty_plan() {
    let user = Uuid::new_v4();
    let store = InMemoryStore::default().fail_with("timeout");
    assert!(store.list_pantry_items(user, None).await.is_err());

    let request = MealPlanRequest {
        pantry_id: None,
        days: 3,
        preferences: vec![],
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let plan = generate_meal_plan(
        &store,
        user,
        &request,
        today(),
        &MatchingConfig::default(),
        &mut rng,
    )
    .await;
    assert!(plan.is_empty());
}

#[tokio::test]
async fn test_private_recipes_of_others_are_not_matched() {
    let me = Uuid::new_v4();
    let someone = Uuid::new_v4();
    let mut secret = recipe("Secret soup", RecipeCategory::Soup, &["water"]);
    secret.is_public = false;
    secret.user_id = someone;
    let mut mine = recipe("My soup", RecipeCategory::Soup, &["water"]);
    mine.is_public = false;
    mine.user_id = me;

    let items = pantry(me, &["water"]);
    let store = InMemoryStore::new(items.clone(), vec![secret, mine]);
    let matches = find_matching_recipes(&store, me, &items, &MatchingConfig::default()).await;
    let names: Vec<&str> = matches.iter().map(|m| m.recipe.name.as_str()).collect();
    assert_eq!(names, vec!["My soup"]);
}

#[tokio::test]
async fn test_failed_pantry_read_ranks_against_empty_pantry() {
    let user = Uuid::new_v4();
    let store = InMemoryStore::new(
        pantry(user, &["egg", "flour"]),
        vec![
            recipe("Omelette", RecipeCategory::Breakfast, &["egg"]),
            recipe("Bread", RecipeCategory::SideDish, &["flour", "yeast"]),
        ],
    )
    .fail_pantry_with("connection refused");

    let matches = match_pantry(&store, user, None, &MatchingConfig::default()).await;
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.match_percentage == 0.0 && !m.can_make));
    assert!(matches.iter().all(|m| m.available_ingredients.is_empty()));
}
