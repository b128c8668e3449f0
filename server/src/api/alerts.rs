use crate::api::pantry_items::find_item;
use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{AlertRow, NewAlert};
use crate::schema::alerts;
use crate::AppState;
use axum::routing::{get, post};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json, Router,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pantry_core::expiry::{low_stock_alert, DEFAULT_LOW_STOCK_THRESHOLD};
use pantry_core::{AlertPriority, AlertType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

const DEFAULT_LIMIT: usize = 20;

/// Returns the router for /api/alerts endpoints (mounted at /api/alerts)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/low-stock", post(create_low_stock_alert))
        .route("/{id}/read", post(mark_read))
        .route("/{id}/dismiss", post(dismiss))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertResponse {
    pub id: Uuid,
    pub item_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl AlertResponse {
    /// `None` for rows whose type or priority no longer parses.
    fn from_row(row: AlertRow) -> Option<Self> {
        Some(Self {
            alert_type: AlertType::from_str(&row.alert_type)?,
            priority: AlertPriority::from_str(&row.priority)?,
            id: row.id,
            item_id: row.item_id,
            title: row.title,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListAlertsResponse {
    pub alerts: Vec<AlertResponse>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListAlertsParams {
    /// Number of alerts to return (default: 20)
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LowStockAlertRequest {
    pub item_id: Uuid,
    /// Quantity at or below which the item counts as low (default: 1)
    pub threshold: Option<f64>,
}

/// Most urgent first, newest first within a priority.
pub fn sort_alerts(alerts: &mut [AlertResponse]) {
    alerts.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "alerts",
    params(ListAlertsParams),
    responses(
        (status = 200, description = "Active alerts, most urgent first", body = ListAlertsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_alerts(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListAlertsParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<AlertRow> = match alerts::table
        .filter(alerts::user_id.eq(user.id))
        .filter(alerts::is_dismissed.eq(false))
        .select(AlertRow::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list alerts: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list alerts");
        }
    };

    let mut alerts: Vec<AlertResponse> = rows.into_iter().filter_map(AlertResponse::from_row).collect();
    sort_alerts(&mut alerts);
    alerts.truncate(params.limit.unwrap_or(DEFAULT_LIMIT));

    (StatusCode::OK, Json(ListAlertsResponse { alerts })).into_response()
}

fn set_flag(
    conn: &mut PgConnection,
    user_id: Uuid,
    id: Uuid,
    dismiss: bool,
) -> QueryResult<usize> {
    let target = alerts::table
        .filter(alerts::id.eq(id))
        .filter(alerts::user_id.eq(user_id));
    if dismiss {
        diesel::update(target).set(alerts::is_dismissed.eq(true)).execute(conn)
    } else {
        diesel::update(target).set(alerts::is_read.eq(true)).execute(conn)
    }
}

#[utoipa::path(
    post,
    path = "/api/alerts/{id}/read",
    tag = "alerts",
    params(
        ("id" = Uuid, Path, description = "Alert ID")
    ),
    responses(
        (status = 204, description = "Alert marked as read"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_read(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match set_flag(&mut conn, user.id, id, false) {
        Ok(0) => error_response(StatusCode::NOT_FOUND, "Alert not found"),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to mark alert read: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update alert")
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/alerts/{id}/dismiss",
    tag = "alerts",
    params(
        ("id" = Uuid, Path, description = "Alert ID")
    ),
    responses(
        (status = 204, description = "Alert dismissed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn dismiss(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match set_flag(&mut conn, user.id, id, true) {
        Ok(0) => error_response(StatusCode::NOT_FOUND, "Alert not found"),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to dismiss alert: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update alert")
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/alerts/low-stock",
    tag = "alerts",
    request_body = LowStockAlertRequest,
    responses(
        (status = 201, description = "Low-stock alert raised", body = AlertResponse),
        (status = 204, description = "Item is not low on stock"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_low_stock_alert(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<LowStockAlertRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let item = match find_item(&mut conn, user.id, request.item_id) {
        Ok(Some(item)) => item,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => {
            tracing::error!("Failed to fetch pantry item: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create alert");
        }
    };

    let threshold = request.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let Some(draft) = low_stock_alert(&item, threshold) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let row = match diesel::insert_into(alerts::table)
        .values(&NewAlert::from_draft(&draft))
        .returning(AlertRow::as_returning())
        .get_result::<AlertRow>(&mut conn)
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Failed to create low-stock alert: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create alert");
        }
    };

    match AlertResponse::from_row(row) {
        Some(alert) => (StatusCode::CREATED, Json(alert)).into_response(),
        None => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create alert"),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(list_alerts, mark_read, dismiss, create_low_stock_alert),
    components(schemas(AlertResponse, ListAlertsResponse, LowStockAlertRequest))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alert(title: &str, priority: AlertPriority, hour: u32) -> AlertResponse {
        AlertResponse {
            id: Uuid::new_v4(),
            item_id: None,
            alert_type: AlertType::ExpiryWarning,
            priority,
            title: title.to_string(),
            message: String::new(),
            is_read: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_sort_alerts_priority_then_newest() {
        let mut alerts = vec![
            alert("old medium", AlertPriority::Medium, 1),
            alert("high", AlertPriority::High, 0),
            alert("new medium", AlertPriority::Medium, 5),
            alert("low", AlertPriority::Low, 9),
        ];
        sort_alerts(&mut alerts);
        let titles: Vec<&str> = alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["high", "new medium", "old medium", "low"]);
    }
}
