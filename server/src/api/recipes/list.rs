use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::RecipeRow;
use crate::schema::recipes;
use crate::store::attach_ingredients;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use pantry_core::{Difficulty, Recipe, RecipeCategory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Case-insensitive text matched against name, description and cuisine
    pub q: Option<String>,
    pub category: Option<RecipeCategory>,
    pub difficulty: Option<Difficulty>,
    /// Upper bound on prep time, in minutes
    pub max_prep_time: Option<i32>,
    /// Upper bound on cook time, in minutes
    pub max_cook_time: Option<i32>,
    pub cuisine: Option<String>,
    /// Comma-separated; a recipe matches if it has any of them
    pub tags: Option<String>,
    /// Number of recipes to return (default: 50, max: 200)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<Recipe>,
}

/// Lower-cased, de-blanked tag list from a comma-separated parameter.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn like_pattern(text: &str) -> String {
    format!("%{}%", text.trim())
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Matching recipes, best rated first", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    // Visibility always applies; text search narrows within it.
    let mut query = recipes::table
        .filter(recipes::deleted_at.is_null())
        .filter(recipes::is_public.eq(true).or(recipes::user_id.eq(user.id)))
        .into_boxed();

    if let Some(q) = params.q.as_deref().filter(|q| !q.trim().is_empty()) {
        let pattern = like_pattern(q);
        query = query.filter(
            recipes::name
                .ilike(pattern.clone())
                .or(recipes::description.ilike(pattern.clone()))
                .or(recipes::cuisine.ilike(pattern)),
        );
    }
    if let Some(category) = params.category {
        query = query.filter(recipes::category.eq(category.as_str()));
    }
    if let Some(difficulty) = params.difficulty {
        query = query.filter(recipes::difficulty.eq(difficulty.as_str()));
    }
    if let Some(max) = params.max_prep_time {
        query = query.filter(recipes::prep_time.le(max));
    }
    if let Some(max) = params.max_cook_time {
        query = query.filter(recipes::cook_time.le(max));
    }
    if let Some(cuisine) = params.cuisine.as_deref().filter(|c| !c.trim().is_empty()) {
        query = query.filter(recipes::cuisine.ilike(like_pattern(cuisine)));
    }
    let tags = parse_tags(params.tags.as_deref());
    if !tags.is_empty() {
        let tags: Vec<Option<String>> = tags.into_iter().map(Some).collect();
        query = query.filter(recipes::tags.overlaps_with(tags));
    }

    let rows: Vec<RecipeRow> = match query
        .order((recipes::rating.desc(), recipes::name.asc()))
        .limit(limit)
        .offset(offset)
        .select(RecipeRow::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to search recipes: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to search recipes");
        }
    };

    match attach_ingredients(&mut conn, rows) {
        Ok(recipes) => (StatusCode::OK, Json(ListRecipesResponse { recipes })).into_response(),
        Err(e) => {
            tracing::error!("Failed to load recipe ingredients: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to search recipes")
        }
    }
}
