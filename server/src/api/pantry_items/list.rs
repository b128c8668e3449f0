use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::PantryItemRow;
use crate::schema::pantry_items;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use pantry_core::{ExpiryStatus, FoodCategory, StorageLocation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::PantryItemResponse;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPantryItemsParams {
    /// Restrict to one pantry
    pub pantry_id: Option<Uuid>,
    pub category: Option<FoodCategory>,
    pub location: Option<StorageLocation>,
    /// Case-insensitive substring of the name or brand
    pub search: Option<String>,
    /// One of expired, expiring-soon, fresh, none
    pub expiry_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListPantryItemsResponse {
    pub items: Vec<PantryItemResponse>,
}

#[utoipa::path(
    get,
    path = "/api/pantry-items",
    tag = "pantry_items",
    params(ListPantryItemsParams),
    responses(
        (status = 200, description = "Pantry items, soonest expiry first", body = ListPantryItemsResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_items(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListPantryItemsParams>,
) -> impl IntoResponse {
    let status_filter = match params.expiry_status.as_deref() {
        None => None,
        Some(raw) => match ExpiryStatus::from_str(raw) {
            Some(status) => Some(status),
            None => return error_response(StatusCode::BAD_REQUEST, "Invalid expiry_status"),
        },
    };

    let mut conn = get_conn!(pool);

    let mut query = pantry_items::table
        .filter(pantry_items::user_id.eq(user.id))
        .filter(pantry_items::deleted_at.is_null())
        .into_boxed();

    if let Some(pantry_id) = params.pantry_id {
        query = query.filter(pantry_items::pantry_id.eq(pantry_id));
    }
    if let Some(category) = params.category {
        query = query.filter(pantry_items::category.eq(category.as_str()));
    }
    if let Some(location) = params.location {
        query = query.filter(pantry_items::location.eq(location.as_str()));
    }
    if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        query = query.filter(
            pantry_items::name
                .ilike(pattern.clone())
                .or(pantry_items::brand.ilike(pattern)),
        );
    }

    let rows: Vec<PantryItemRow> = match query
        .order((
            pantry_items::expiry_date.asc().nulls_last(),
            pantry_items::name.asc(),
        ))
        .select(PantryItemRow::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list pantry items: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list pantry items",
            );
        }
    };

    let now = Utc::now();
    let items = rows
        .into_iter()
        .map(|row| PantryItemResponse::new(row.into_domain(), now))
        .filter(|item| status_filter.is_none_or(|s| item.expiry_status == s))
        .collect();

    (StatusCode::OK, Json(ListPantryItemsResponse { items })).into_response()
}
