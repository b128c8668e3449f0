pub mod clear_completed;
pub mod create;
pub mod delete;
pub mod generate;
pub mod list;
pub mod remind;
pub mod toggle;
pub mod update;

use crate::models::{NewShoppingListItem, ShoppingListItemRow};
use crate::schema::shopping_list_items;
use crate::AppState;
use axum::routing::{delete as delete_method, get, post, put};
use axum::Router;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pantry_core::{FoodCategory, ShoppingItemDraft};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/shopping-list endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_items).post(create::create_item))
        .route("/clear-completed", delete_method(clear_completed::clear_completed))
        .route("/generate", post(generate::generate_from_pantry))
        .route("/from-recipe/{recipe_id}", post(generate::add_missing_ingredients))
        .route("/remind", post(remind::send_reminder))
        .route(
            "/{id}",
            put(update::update_item).delete(delete::delete_item),
        )
        .route("/{id}/toggle", post(toggle::toggle_item))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingListItemResponse {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: Option<FoodCategory>,
    pub estimated_price: Option<f64>,
    pub notes: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ShoppingListItemRow> for ShoppingListItemResponse {
    fn from(row: ShoppingListItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            unit: row.unit,
            category: row.category.as_deref().and_then(FoodCategory::from_str),
            estimated_price: row.estimated_price,
            notes: row.notes,
            is_completed: row.is_completed,
            completed_at: row.completed_at,
            created_at: row.created_at,
        }
    }
}

/// A live entry owned by `user_id`, if any.
pub(crate) fn find_item(
    conn: &mut PgConnection,
    user_id: Uuid,
    id: Uuid,
) -> QueryResult<Option<ShoppingListItemRow>> {
    shopping_list_items::table
        .filter(shopping_list_items::id.eq(id))
        .filter(shopping_list_items::user_id.eq(user_id))
        .filter(shopping_list_items::deleted_at.is_null())
        .select(ShoppingListItemRow::as_select())
        .first(conn)
        .optional()
}

/// Names of entries on the user's list that are not ticked off yet.
pub(crate) fn open_item_names(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<String>> {
    shopping_list_items::table
        .filter(shopping_list_items::user_id.eq(user_id))
        .filter(shopping_list_items::deleted_at.is_null())
        .filter(shopping_list_items::is_completed.eq(false))
        .select(shopping_list_items::name)
        .load(conn)
}

/// Store proposed entries and return them as saved.
pub(crate) fn insert_drafts(
    conn: &mut PgConnection,
    user_id: Uuid,
    drafts: &[ShoppingItemDraft],
    notes: Option<&str>,
) -> QueryResult<Vec<ShoppingListItemRow>> {
    let rows: Vec<NewShoppingListItem> = drafts
        .iter()
        .map(|draft| NewShoppingListItem {
            user_id,
            name: &draft.name,
            quantity: draft.quantity,
            unit: Some(draft.unit.as_str()).filter(|u| !u.is_empty()),
            category: draft.category.map(|c| c.as_str()),
            estimated_price: None,
            notes,
        })
        .collect();

    diesel::insert_into(shopping_list_items::table)
        .values(&rows)
        .returning(ShoppingListItemRow::as_returning())
        .get_results(conn)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_items,
        create::create_item,
        update::update_item,
        delete::delete_item,
        toggle::toggle_item,
        clear_completed::clear_completed,
        generate::generate_from_pantry,
        generate::add_missing_ingredients,
        remind::send_reminder,
    ),
    components(schemas(
        ShoppingListItemResponse,
        list::ShoppingListResponse,
        create::CreateShoppingListItemRequest,
        update::UpdateShoppingListItemRequest,
        clear_completed::ClearCompletedResponse,
        generate::GenerateRequest,
        generate::GeneratedItemsResponse,
        remind::ReminderResponse,
    ))
)]
pub struct ApiDoc;
