use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::ShoppingListItemRow;
use crate::schema::shopping_list_items;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use pantry_core::FoodCategory;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{find_item, ShoppingListItemResponse};

#[derive(Debug, Clone, Deserialize, ToSchema, Default)]
pub struct UpdateShoppingListItemRequest {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<FoodCategory>,
    pub estimated_price: Option<f64>,
    pub notes: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/shopping-list/{id}",
    tag = "shopping_list",
    params(
        ("id" = Uuid, Path, description = "Shopping list item ID")
    ),
    request_body = UpdateShoppingListItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ShoppingListItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateShoppingListItemRequest>,
) -> impl IntoResponse {
    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return error_response(StatusCode::BAD_REQUEST, "Name cannot be empty");
    }
    if request.quantity.is_some_and(|q| !q.is_finite() || q <= 0.0) {
        return error_response(StatusCode::BAD_REQUEST, "Quantity must be positive");
    }

    let mut conn = get_conn!(pool);

    let current = match find_item(&mut conn, user.id, id) {
        Ok(Some(row)) => row,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => {
            tracing::error!("Failed to fetch shopping list item: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch item");
        }
    };

    let name = request
        .name
        .map(|n| n.trim().to_string())
        .unwrap_or(current.name);
    let category = request
        .category
        .map(|c| c.as_str().to_string())
        .or(current.category);

    let result = diesel::update(
        shopping_list_items::table
            .filter(shopping_list_items::id.eq(id))
            .filter(shopping_list_items::user_id.eq(user.id)),
    )
    .set((
        shopping_list_items::name.eq(&name),
        shopping_list_items::quantity.eq(request.quantity.unwrap_or(current.quantity)),
        shopping_list_items::unit.eq(request.unit.or(current.unit)),
        shopping_list_items::category.eq(category),
        shopping_list_items::estimated_price.eq(request.estimated_price.or(current.estimated_price)),
        shopping_list_items::notes.eq(request.notes.or(current.notes)),
        shopping_list_items::updated_at.eq(Utc::now()),
    ))
    .returning(ShoppingListItemRow::as_returning())
    .get_result::<ShoppingListItemRow>(&mut conn);

    match result {
        Ok(row) => (StatusCode::OK, Json(ShoppingListItemResponse::from(row))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update shopping list item: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update item")
        }
    }
}
