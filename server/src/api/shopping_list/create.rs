use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewShoppingListItem, ShoppingListItemRow};
use crate::schema::shopping_list_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use pantry_core::FoodCategory;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::ShoppingListItemResponse;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShoppingListItemRequest {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: Option<FoodCategory>,
    pub estimated_price: Option<f64>,
    pub notes: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

#[utoipa::path(
    post,
    path = "/api/shopping-list",
    tag = "shopping_list",
    request_body = CreateShoppingListItemRequest,
    responses(
        (status = 201, description = "Item added", body = ShoppingListItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateShoppingListItemRequest>,
) -> impl IntoResponse {
    let name = request.name.trim();
    if name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Name is required");
    }
    if !request.quantity.is_finite() || request.quantity <= 0.0 {
        return error_response(StatusCode::BAD_REQUEST, "Quantity must be positive");
    }

    let mut conn = get_conn!(pool);

    let new_item = NewShoppingListItem {
        user_id: user.id,
        name,
        quantity: request.quantity,
        unit: request.unit.as_deref(),
        category: request.category.map(|c| c.as_str()),
        estimated_price: request.estimated_price,
        notes: request.notes.as_deref(),
    };

    match diesel::insert_into(shopping_list_items::table)
        .values(&new_item)
        .returning(ShoppingListItemRow::as_returning())
        .get_result::<ShoppingListItemRow>(&mut conn)
    {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ShoppingListItemResponse::from(row)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create shopping list item: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create item")
        }
    }
}
