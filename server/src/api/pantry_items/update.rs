use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::PantryItemRow;
use crate::schema::pantry_items;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pantry_core::{FoodCategory, StorageLocation};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::create::validate_quantity;
use super::{find_item, PantryItemResponse};

/// Fields left out keep their current value.
#[derive(Debug, Clone, Deserialize, ToSchema, Default)]
pub struct UpdatePantryItemRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<FoodCategory>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub location: Option<StorageLocation>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/pantry-items/{id}",
    tag = "pantry_items",
    params(
        ("id" = Uuid, Path, description = "Pantry item ID")
    ),
    request_body = UpdatePantryItemRequest,
    responses(
        (status = 200, description = "Item updated", body = PantryItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePantryItemRequest>,
) -> impl IntoResponse {
    if let Some(quantity) = request.quantity {
        if let Err(message) = validate_quantity(quantity) {
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    }
    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return error_response(StatusCode::BAD_REQUEST, "Name cannot be empty");
    }

    let mut conn = get_conn!(pool);

    let current = match find_item(&mut conn, user.id, id) {
        Ok(Some(item)) => item,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => {
            tracing::error!("Failed to fetch pantry item: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch item");
        }
    };

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .map(str::to_string)
        .unwrap_or(current.name);
    let category = request.category.unwrap_or(current.category);
    let location = request.location.unwrap_or(current.location);

    let result = diesel::update(
        pantry_items::table
            .filter(pantry_items::id.eq(id))
            .filter(pantry_items::user_id.eq(user.id)),
    )
    .set((
        pantry_items::name.eq(&name),
        pantry_items::brand.eq(request.brand.or(current.brand)),
        pantry_items::category.eq(category.as_str()),
        pantry_items::quantity.eq(request.quantity.unwrap_or(current.quantity)),
        pantry_items::unit.eq(request.unit.unwrap_or(current.unit)),
        pantry_items::location.eq(location.as_str()),
        pantry_items::expiry_date.eq(request.expiry_date.or(current.expiry_date)),
        pantry_items::purchase_date.eq(request.purchase_date.or(current.purchase_date)),
        pantry_items::price.eq(request.price.or(current.price)),
        pantry_items::notes.eq(request.notes.or(current.notes)),
        pantry_items::image_url.eq(request.image_url.or(current.image_url)),
        pantry_items::updated_at.eq(Utc::now()),
    ))
    .returning(PantryItemRow::as_returning())
    .get_result::<PantryItemRow>(&mut conn);

    match result {
        Ok(row) => (
            StatusCode::OK,
            Json(PantryItemResponse::new(row.into_domain(), Utc::now())),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update pantry item: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update item")
        }
    }
}
