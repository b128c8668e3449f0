pub mod consume;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::models::PantryItemRow;
use crate::schema::pantry_items;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pantry_core::expiry::days_until_expiry;
use pantry_core::{ExpiryStatus, PantryItem};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/pantry-items endpoints (mounted at /api/pantry-items)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_items).post(create::create_item))
        .route(
            "/{id}",
            axum::routing::put(update::update_item).delete(delete::delete_item),
        )
        .route("/{id}/consume", post(consume::consume_item))
}

/// A pantry item with its freshness worked out for display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PantryItemResponse {
    #[serde(flatten)]
    pub item: PantryItem,
    pub expiry_status: ExpiryStatus,
    pub days_until_expiry: Option<i64>,
}

impl PantryItemResponse {
    pub fn new(item: PantryItem, now: DateTime<Utc>) -> Self {
        Self {
            expiry_status: ExpiryStatus::of(item.expiry_date, now),
            days_until_expiry: item.expiry_date.map(|e| days_until_expiry(e, now)),
            item,
        }
    }
}

/// A live item owned by `user_id`, if any.
pub(crate) fn find_item(
    conn: &mut PgConnection,
    user_id: Uuid,
    id: Uuid,
) -> QueryResult<Option<PantryItem>> {
    let row: Option<PantryItemRow> = pantry_items::table
        .filter(pantry_items::id.eq(id))
        .filter(pantry_items::user_id.eq(user_id))
        .filter(pantry_items::deleted_at.is_null())
        .select(PantryItemRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(PantryItemRow::into_domain))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_items,
        create::create_item,
        update::update_item,
        delete::delete_item,
        consume::consume_item,
    ),
    components(schemas(
        PantryItemResponse,
        list::ListPantryItemsResponse,
        create::CreatePantryItemRequest,
        update::UpdatePantryItemRequest,
        consume::ConsumeItemRequest,
        pantry_core::ExpiryStatus,
    ))
)]
pub struct ApiDoc;
