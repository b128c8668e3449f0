use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::pantry_items;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/pantry-items/{id}",
    tag = "pantry_items",
    params(
        ("id" = Uuid, Path, description = "Pantry item ID")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let now = Utc::now();
    let result = diesel::update(
        pantry_items::table
            .filter(pantry_items::id.eq(id))
            .filter(pantry_items::user_id.eq(user.id))
            .filter(pantry_items::deleted_at.is_null()),
    )
    .set((
        pantry_items::deleted_at.eq(now),
        pantry_items::updated_at.eq(now),
    ))
    .execute(&mut conn);

    match result {
        Ok(0) => error_response(StatusCode::NOT_FOUND, "Item not found"),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete pantry item: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete item")
        }
    }
}
