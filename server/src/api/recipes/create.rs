use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewRecipe, NewRecipeIngredient, RecipeRow};
use crate::schema::{recipe_ingredients, recipes};
use crate::store::attach_ingredients;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use pantry_core::{Difficulty, Recipe, RecipeCategory};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    #[serde(default = "default_servings")]
    pub servings: i32,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    pub cuisine: Option<String>,
    pub category: RecipeCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub ingredients: Vec<CreateIngredientRequest>,
}

fn default_servings() -> i32 {
    4
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

fn validate(request: &CreateRecipeRequest) -> Result<(), &'static str> {
    if request.name.trim().is_empty() {
        return Err("Name is required");
    }
    if request.servings < 1 {
        return Err("Servings must be at least 1");
    }
    if request.prep_time.is_some_and(|t| t < 0) || request.cook_time.is_some_and(|t| t < 0) {
        return Err("Times cannot be negative");
    }
    if request.ingredients.iter().any(|i| i.name.trim().is_empty()) {
        return Err("Ingredient names are required");
    }
    Ok(())
}

/// Tags are stored trimmed and lower-cased, without duplicates.
fn normalize_tags(tags: &[String]) -> Vec<Option<String>> {
    let mut out: Vec<Option<String>> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.iter().any(|t| t.as_deref() == Some(tag.as_str())) {
            out.push(Some(tag));
        }
    }
    out
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> impl IntoResponse {
    if let Err(message) = validate(&request) {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    let mut conn = get_conn!(pool);

    let new_recipe = NewRecipe {
        user_id: user.id,
        name: request.name.trim(),
        description: request.description.as_deref(),
        instructions: request.instructions.iter().cloned().map(Some).collect(),
        prep_time: request.prep_time,
        cook_time: request.cook_time,
        servings: request.servings,
        difficulty: request.difficulty.as_str(),
        cuisine: request.cuisine.as_deref(),
        category: request.category.as_str(),
        tags: normalize_tags(&request.tags),
        image_url: request.image_url.as_deref(),
        is_public: request.is_public,
    };

    let result: QueryResult<Vec<Recipe>> = conn.transaction(|conn| {
        let row: RecipeRow = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(RecipeRow::as_returning())
            .get_result(conn)?;

        let ingredients: Vec<NewRecipeIngredient> = request
            .ingredients
            .iter()
            .enumerate()
            .map(|(i, ingredient)| NewRecipeIngredient {
                recipe_id: row.id,
                name: ingredient.name.trim(),
                quantity: ingredient.quantity,
                unit: &ingredient.unit,
                notes: ingredient.notes.as_deref(),
                sort_order: i as i32,
            })
            .collect();

        diesel::insert_into(recipe_ingredients::table)
            .values(&ingredients)
            .execute(conn)?;

        attach_ingredients(conn, vec![row])
    });

    match result.map(|mut recipes| recipes.pop()) {
        Ok(Some(recipe)) => {
            tracing::info!(user_id = %user.id, recipe_id = %recipe.id, "Created recipe");
            (StatusCode::CREATED, Json(recipe)).into_response()
        }
        Ok(None) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create recipe"),
        Err(e) => {
            tracing::error!("Failed to create recipe: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create recipe")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> CreateRecipeRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let r = request(serde_json::json!({"name": "Soup", "category": "SOUP"}));
        assert_eq!(r.servings, 4);
        assert_eq!(r.difficulty, Difficulty::Medium);
        assert!(!r.is_public);
        assert!(validate(&r).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_ingredient() {
        let r = request(serde_json::json!({
            "name": "Soup",
            "category": "SOUP",
            "ingredients": [{"name": "onion"}, {"name": "  "}]
        }));
        assert_eq!(validate(&r), Err("Ingredient names are required"));
    }

    #[test]
    fn test_validate_rejects_bad_servings() {
        let r = request(serde_json::json!({"name": "Soup", "category": "SOUP", "servings": 0}));
        assert_eq!(validate(&r), Err("Servings must be at least 1"));
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![" Vegan".to_string(), "vegan".to_string(), "".to_string(), "Quick".to_string()];
        assert_eq!(
            normalize_tags(&tags),
            vec![Some("vegan".to_string()), Some("quick".to_string())]
        );
    }
}
