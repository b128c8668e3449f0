use anyhow::Result;
use chrono::{NaiveDate, Utc};
use pantry_core::notifications::{recipe_suggestion_email, send_best_effort};
use pantry_core::{
    find_matching_recipes, generate_meal_plan, LogNotifier, MatchingConfig, MealPlanRequest,
    PantryStore,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::fixture::Fixture;

pub async fn run_match(
    fixture: &Fixture,
    pantry_id: Option<Uuid>,
    limit: usize,
    notify: Option<&str>,
) -> Result<()> {
    let config = MatchingConfig::from_env()?;
    let store = fixture.store();

    let items = store.list_pantry_items(fixture.user_id, pantry_id).await?;
    let matches = find_matching_recipes(&store, fixture.user_id, &items, &config).await;

    for m in matches.iter().take(limit) {
        let missing: Vec<&str> = m.missing_ingredients.iter().map(|i| i.name.as_str()).collect();
        println!(
            "{:>5.1}%  {}{}  {}",
            m.match_percentage,
            m.recipe.name,
            if m.can_make { " (can make)" } else { "" },
            if missing.is_empty() {
                String::new()
            } else {
                format!("missing: {}", missing.join(", "))
            }
        );
    }

    if let (Some(to), Some(best)) = (notify, matches.first()) {
        send_best_effort(&LogNotifier, &recipe_suggestion_email(to, best)).await;
    }

    Ok(())
}

pub async fn run_plan(
    fixture: &Fixture,
    days: u32,
    seed: Option<u64>,
    start: Option<NaiveDate>,
    preferences: Vec<String>,
) -> Result<()> {
    let config = MatchingConfig::from_env()?;
    let store = fixture.store();
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let request = MealPlanRequest {
        pantry_id: None,
        days,
        preferences,
    };
    let start = start.unwrap_or_else(|| Utc::now().date_naive());

    let plan = generate_meal_plan(&store, fixture.user_id, &request, start, &config, &mut rng).await;

    if plan.is_empty() {
        println!("No recipes qualify for any meal.");
    }
    for suggestion in plan {
        println!(
            "{}  {:<9}  {} ({:.0}%)",
            suggestion.date,
            suggestion.meal_type.as_str(),
            suggestion.recipe.name,
            suggestion.match_percentage
        );
    }

    Ok(())
}
