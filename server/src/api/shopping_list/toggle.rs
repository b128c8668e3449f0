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
use std::sync::Arc;
use uuid::Uuid;

use super::{find_item, ShoppingListItemResponse};

#[utoipa::path(
    post,
    path = "/api/shopping-list/{id}/toggle",
    tag = "shopping_list",
    params(
        ("id" = Uuid, Path, description = "Shopping list item ID")
    ),
    responses(
        (status = 200, description = "Completion flipped", body = ShoppingListItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let current = match find_item(&mut conn, user.id, id) {
        Ok(Some(row)) => row,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => {
            tracing::error!("Failed to fetch shopping list item: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch item");
        }
    };

    let now = Utc::now();
    let completed = !current.is_completed;

    let result = diesel::update(shopping_list_items::table.filter(shopping_list_items::id.eq(id)))
        .set((
            shopping_list_items::is_completed.eq(completed),
            shopping_list_items::completed_at.eq(completed.then_some(now)),
            shopping_list_items::updated_at.eq(now),
        ))
        .returning(ShoppingListItemRow::as_returning())
        .get_result::<ShoppingListItemRow>(&mut conn);

    match result {
        Ok(row) => (StatusCode::OK, Json(ShoppingListItemResponse::from(row))).into_response(),
        Err(e) => {
            tracing::error!("Failed to toggle shopping list item: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update item")
        }
    }
}
