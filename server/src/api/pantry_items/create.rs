use crate::api::pantries::{ensure_pantries, is_member};
use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewPantryItem, PantryItemRow};
use crate::schema::pantry_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pantry_core::{FoodCategory, StorageLocation};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::PantryItemResponse;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePantryItemRequest {
    /// Defaults to the user's first pantry
    pub pantry_id: Option<Uuid>,
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    #[serde(default = "default_category")]
    pub category: FoodCategory,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    #[serde(default = "default_location")]
    pub location: StorageLocation,
    pub expiry_date: Option<DateTime<Utc>>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    /// Raw product data from a barcode lookup
    #[schema(value_type = Option<Object>)]
    pub nutrition_data: Option<serde_json::Value>,
}

fn default_category() -> FoodCategory {
    FoodCategory::Other
}

fn default_quantity() -> f64 {
    1.0
}

fn default_location() -> StorageLocation {
    StorageLocation::Pantry
}

pub(super) fn validate_quantity(quantity: f64) -> Result<(), &'static str> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err("Quantity must be a non-negative number");
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/pantry-items",
    tag = "pantry_items",
    request_body = CreatePantryItemRequest,
    responses(
        (status = 201, description = "Item created", body = PantryItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a member of the pantry", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreatePantryItemRequest>,
) -> impl IntoResponse {
    let name = request.name.trim();
    if name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Name is required");
    }
    if let Err(message) = validate_quantity(request.quantity) {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    let mut conn = get_conn!(pool);

    let pantry_id = match request.pantry_id {
        Some(pantry_id) => match is_member(&mut conn, user.id, pantry_id) {
            Ok(true) => pantry_id,
            Ok(false) => {
                return error_response(StatusCode::FORBIDDEN, "Not a member of this pantry")
            }
            Err(e) => {
                tracing::error!("Failed to check pantry membership: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create item");
            }
        },
        None => match ensure_pantries(&mut conn, user.id) {
            Ok(pantries) => match pantries.first() {
                Some((pantry, _)) => pantry.id,
                None => {
                    return error_response(StatusCode::INTERNAL_SERVER_ERROR, "No pantry available")
                }
            },
            Err(e) => {
                tracing::error!("Failed to resolve default pantry: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create item");
            }
        },
    };

    let new_item = NewPantryItem {
        pantry_id,
        user_id: user.id,
        name,
        brand: request.brand.as_deref(),
        barcode: request.barcode.as_deref(),
        category: request.category.as_str(),
        quantity: request.quantity,
        unit: request.unit.as_deref().unwrap_or("piece"),
        location: request.location.as_str(),
        expiry_date: request.expiry_date,
        purchase_date: request.purchase_date,
        price: request.price,
        notes: request.notes.as_deref(),
        image_url: request.image_url.as_deref(),
        nutrition_data: request.nutrition_data.as_ref(),
    };

    match diesel::insert_into(pantry_items::table)
        .values(&new_item)
        .returning(PantryItemRow::as_returning())
        .get_result::<PantryItemRow>(&mut conn)
    {
        Ok(row) => {
            tracing::info!(user_id = %user.id, item_id = %row.id, "Added pantry item");
            (
                StatusCode::CREATED,
                Json(PantryItemResponse::new(row.into_domain(), Utc::now())),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create pantry item: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create item")
        }
    }
}
