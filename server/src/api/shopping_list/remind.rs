use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::ShoppingListItemRow;
use crate::schema::shopping_list_items;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use pantry_core::notifications::{send_best_effort, shopping_list_reminder_email, ReminderItem};
use pantry_core::shopping::DEFAULT_LIST_NAME;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReminderResponse {
    /// Entries still open on the list
    pub open_items: usize,
    pub sent: bool,
}

#[utoipa::path(
    post,
    path = "/api/shopping-list/remind",
    tag = "shopping_list",
    responses(
        (status = 200, description = "Reminder sent (or attempted)", body = ReminderResponse),
        (status = 400, description = "No email address on file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_reminder(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let Some(email) = user.email.as_deref() else {
        return error_response(StatusCode::BAD_REQUEST, "No email address on file");
    };

    let rows: Vec<ShoppingListItemRow> = {
        let mut conn = get_conn!(state.pool);
        match shopping_list_items::table
            .filter(shopping_list_items::user_id.eq(user.id))
            .filter(shopping_list_items::deleted_at.is_null())
            .order(shopping_list_items::created_at.asc())
            .select(ShoppingListItemRow::as_select())
            .load(&mut conn)
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to load shopping list for reminder: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send reminder");
            }
        }
    };

    let items: Vec<ReminderItem> = rows
        .iter()
        .map(|row| ReminderItem {
            name: &row.name,
            quantity: row.quantity,
            unit: row.unit.as_deref(),
            is_completed: row.is_completed,
        })
        .collect();
    let open_items = items.iter().filter(|i| !i.is_completed).count();

    let message = shopping_list_reminder_email(email, DEFAULT_LIST_NAME, &items);
    let sent = send_best_effort(state.notifier.as_ref(), &message).await;

    (StatusCode::OK, Json(ReminderResponse { open_items, sent })).into_response()
}
