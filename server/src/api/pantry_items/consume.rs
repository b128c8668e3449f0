use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewItemUsage, PantryItemRow};
use crate::schema::{item_usages, pantry_items};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{find_item, PantryItemResponse};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConsumeItemRequest {
    pub quantity_used: f64,
    /// What the item was used for, e.g. a recipe name
    pub used_for: Option<String>,
}

/// Quantity left after using `used`. Never negative.
pub fn remaining_quantity(current: f64, used: f64) -> f64 {
    (current - used).max(0.0)
}

#[utoipa::path(
    post,
    path = "/api/pantry-items/{id}/consume",
    tag = "pantry_items",
    params(
        ("id" = Uuid, Path, description = "Pantry item ID")
    ),
    request_body = ConsumeItemRequest,
    responses(
        (status = 200, description = "Usage recorded", body = PantryItemResponse),
        (status = 400, description = "Invalid quantity", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn consume_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConsumeItemRequest>,
) -> impl IntoResponse {
    if !request.quantity_used.is_finite() || request.quantity_used <= 0.0 {
        return error_response(StatusCode::BAD_REQUEST, "Quantity used must be positive");
    }

    let mut conn = get_conn!(pool);

    let item = match find_item(&mut conn, user.id, id) {
        Ok(Some(item)) => item,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => {
            tracing::error!("Failed to fetch pantry item: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch item");
        }
    };

    let remaining = remaining_quantity(item.quantity, request.quantity_used);

    let result = conn.transaction(|conn| {
        diesel::insert_into(item_usages::table)
            .values(&NewItemUsage {
                item_id: id,
                user_id: user.id,
                quantity_used: request.quantity_used,
                used_for: request.used_for.as_deref(),
            })
            .execute(conn)?;

        diesel::update(pantry_items::table.filter(pantry_items::id.eq(id)))
            .set((
                pantry_items::quantity.eq(remaining),
                pantry_items::updated_at.eq(Utc::now()),
            ))
            .returning(PantryItemRow::as_returning())
            .get_result::<PantryItemRow>(conn)
    });

    match result {
        Ok(row) => {
            tracing::info!(
                item_id = %id,
                used = request.quantity_used,
                remaining = remaining,
                "Recorded item usage"
            );
            (
                StatusCode::OK,
                Json(PantryItemResponse::new(row.into_domain(), Utc::now())),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to record item usage: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record usage")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_quantity_floors_at_zero() {
        assert_eq!(remaining_quantity(3.0, 1.0), 2.0);
        assert_eq!(remaining_quantity(1.0, 1.0), 0.0);
        assert_eq!(remaining_quantity(1.0, 5.0), 0.0);
    }
}
