use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::shopping_list_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClearCompletedResponse {
    pub deleted_count: usize,
}

#[utoipa::path(
    delete,
    path = "/api/shopping-list/clear-completed",
    tag = "shopping_list",
    responses(
        (status = 200, description = "Completed items removed", body = ClearCompletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn clear_completed(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let now = Utc::now();
    let result = diesel::update(
        shopping_list_items::table
            .filter(shopping_list_items::user_id.eq(user.id))
            .filter(shopping_list_items::is_completed.eq(true))
            .filter(shopping_list_items::deleted_at.is_null()),
    )
    .set((
        shopping_list_items::deleted_at.eq(now),
        shopping_list_items::updated_at.eq(now),
    ))
    .execute(&mut conn);

    match result {
        Ok(deleted_count) => {
            (StatusCode::OK, Json(ClearCompletedResponse { deleted_count })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to clear completed items: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear completed items")
        }
    }
}
