use crate::api::recipes::find_visible_recipe;
use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::get_conn;
use crate::store::load_pantry_items;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pantry_core::expiry::DEFAULT_LOW_STOCK_THRESHOLD;
use pantry_core::matcher::available_names;
use pantry_core::ranker::match_recipe;
use pantry_core::shopping::{low_stock_additions, missing_ingredient_additions};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{insert_drafts, open_item_names, ShoppingListItemResponse};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Only look at one pantry
    pub pantry_id: Option<Uuid>,
    /// Items at or below this quantity count as low (default: 1)
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeneratedItemsResponse {
    pub added: Vec<ShoppingListItemResponse>,
}

#[utoipa::path(
    post,
    path = "/api/shopping-list/generate",
    tag = "shopping_list",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Low-stock items added to the list", body = GeneratedItemsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate_from_pantry(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let items = match load_pantry_items(&mut conn, user.id, request.pantry_id) {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Failed to load pantry items: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate list");
        }
    };
    let open = match open_item_names(&mut conn, user.id) {
        Ok(names) => names,
        Err(e) => {
            tracing::error!("Failed to load shopping list: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate list");
        }
    };

    let threshold = request.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let drafts = low_stock_additions(&items, open.iter().map(String::as_str), threshold);

    match insert_drafts(&mut conn, user.id, &drafts, None) {
        Ok(rows) => {
            tracing::info!(user_id = %user.id, added = rows.len(), "Generated shopping list");
            let added = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(GeneratedItemsResponse { added })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add generated items: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate list")
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/shopping-list/from-recipe/{recipe_id}",
    tag = "shopping_list",
    params(
        ("recipe_id" = Uuid, Path, description = "Recipe whose missing ingredients to add")
    ),
    responses(
        (status = 200, description = "Missing ingredients added to the list", body = GeneratedItemsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_missing_ingredients(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let recipe = match find_visible_recipe(&mut conn, user.id, recipe_id) {
        Ok(Some(recipe)) => recipe,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add ingredients");
        }
    };

    let (items, open) = match load_pantry_items(&mut conn, user.id, None)
        .and_then(|items| Ok((items, open_item_names(&mut conn, user.id)?)))
    {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load pantry or shopping list: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add ingredients");
        }
    };

    let recipe_match = match_recipe(&recipe, &available_names(&items), &state.matching);
    let drafts = missing_ingredient_additions(
        &recipe_match.missing_ingredients,
        open.iter().map(String::as_str),
    );
    let note = format!("For {}", recipe.name);

    match insert_drafts(&mut conn, user.id, &drafts, Some(&note)) {
        Ok(rows) => {
            let added = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(GeneratedItemsResponse { added })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add missing ingredients: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add ingredients")
        }
    }
}
