use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::ShoppingListItemRow;
use crate::schema::shopping_list_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use pantry_core::shopping::DEFAULT_LIST_NAME;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::ShoppingListItemResponse;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingListResponse {
    pub name: String,
    /// Open entries first, oldest first within each group
    pub items: Vec<ShoppingListItemResponse>,
}

#[utoipa::path(
    get,
    path = "/api/shopping-list",
    tag = "shopping_list",
    responses(
        (status = 200, description = "The user's shopping list", body = ShoppingListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_items(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<ShoppingListItemRow> = match shopping_list_items::table
        .filter(shopping_list_items::user_id.eq(user.id))
        .filter(shopping_list_items::deleted_at.is_null())
        .order((
            shopping_list_items::is_completed.asc(),
            shopping_list_items::created_at.asc(),
        ))
        .select(ShoppingListItemRow::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list shopping list items: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list items");
        }
    };

    (
        StatusCode::OK,
        Json(ShoppingListResponse {
            name: DEFAULT_LIST_NAME.to_string(),
            items: rows.into_iter().map(Into::into).collect(),
        }),
    )
        .into_response()
}
