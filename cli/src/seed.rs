use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::fixture::Fixture;

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

async fn authenticate(client: &Client, server: &str, username: &str, password: &str) -> Result<String> {
    let response = client
        .post(format!("{}/api/auth/signup", server))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await?;

    if response.status() == StatusCode::CONFLICT {
        println!("User {} already exists, logging in", username);
        let login: TokenResponse = client
            .post(format!("{}/api/auth/login", server))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?
            .error_for_status()
            .context("Login failed")?
            .json()
            .await?;
        return Ok(login.token);
    }

    let signup: TokenResponse = response
        .error_for_status()
        .context("Signup failed")?
        .json()
        .await?;
    println!("Created user {}", username);
    Ok(signup.token)
}

pub async fn seed(server: &str, fixture: &Fixture, username: &str, password: &str) -> Result<()> {
    let server = server.trim_end_matches('/');
    let client = Client::new();
    let token = authenticate(&client, server, username, password).await?;

    for recipe in &fixture.recipes {
        let body = json!({
            "name": recipe.name,
            "description": recipe.description,
            "instructions": recipe.instructions,
            "prep_time": recipe.prep_time,
            "cook_time": recipe.cook_time,
            "servings": recipe.servings,
            "difficulty": recipe.difficulty,
            "cuisine": recipe.cuisine,
            "category": recipe.category,
            "tags": recipe.tags,
            "is_public": recipe.is_public,
            "ingredients": recipe.ingredients.iter().map(|i| json!({
                "name": i.name,
                "quantity": i.quantity,
                "unit": i.unit,
                "notes": i.notes,
            })).collect::<Vec<_>>(),
        });
        let response = client
            .post(format!("{}/api/recipes", server))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Failed to create recipe {}: {}", recipe.name, response.status());
        }
        println!("Created recipe: {}", recipe.name);
    }

    for item in &fixture.pantry {
        let body = json!({
            "name": item.name,
            "brand": item.brand,
            "barcode": item.barcode,
            "category": item.category,
            "quantity": item.quantity,
            "unit": item.unit,
            "location": item.location,
            "expiry_date": item.expiry_date,
            "price": item.price,
            "notes": item.notes,
        });
        let response = client
            .post(format!("{}/api/pantry-items", server))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Failed to add pantry item {}: {}", item.name, response.status());
        }
        println!("Added pantry item: {}", item.name);
    }

    println!(
        "Seeded {} recipes and {} pantry items",
        fixture.recipes.len(),
        fixture.pantry.len()
    );
    Ok(())
}
