use crate::api::ErrorResponse;
use crate::models::{NewAlert, PantryItemRow};
use crate::schema::{alerts, pantry_items, users};
use crate::AppState;
use axum::routing::get;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use pantry_core::expiry::{expiry_rules, EXPIRING_SOON_DAYS};
use pantry_core::notifications::{expiry_alert_email, send_best_effort};
use pantry_core::{plan_expiry_alerts, AlertType, ExistingAlert, ExpiryScan, PantryItem};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/cron endpoints. Authenticated by shared secret,
/// not by user session.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/cron/expiry-check", get(expiry_check))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiryCheckResponse {
    pub success: bool,
    /// Items inside an alert horizon, counted once per rule
    pub processed: usize,
    pub alerts_created: usize,
    pub notifications_sent: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CronErrorResponse {
    pub success: bool,
    pub error: String,
}

fn cron_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(CronErrorResponse {
            success: false,
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Item and alert state the expiry pass needs, read in one go.
struct ExpirySnapshot {
    items: Vec<PantryItem>,
    recent: Vec<ExistingAlert>,
    emails: HashMap<Uuid, String>,
}

fn load_snapshot(conn: &mut PgConnection, now: DateTime<Utc>) -> QueryResult<ExpirySnapshot> {
    let horizon = now + Duration::days(EXPIRING_SOON_DAYS);
    let rows: Vec<PantryItemRow> = pantry_items::table
        .filter(pantry_items::deleted_at.is_null())
        .filter(pantry_items::expiry_date.ge(now))
        .filter(pantry_items::expiry_date.le(horizon))
        .select(PantryItemRow::as_select())
        .load(conn)?;
    let items: Vec<PantryItem> = rows.into_iter().map(PantryItemRow::into_domain).collect();

    let longest_window = expiry_rules()
        .iter()
        .map(|rule| rule.dedupe_window)
        .max()
        .unwrap_or_else(|| Duration::hours(24));
    let expiry_types = [AlertType::ExpiryWarning.as_str(), AlertType::ExpiryUrgent.as_str()];

    let recent_rows: Vec<(Option<Uuid>, String, DateTime<Utc>)> = alerts::table
        .filter(alerts::alert_type.eq_any(expiry_types))
        .filter(alerts::created_at.ge(now - longest_window))
        .filter(alerts::item_id.is_not_null())
        .select((alerts::item_id, alerts::alert_type, alerts::created_at))
        .load(conn)?;
    let recent = recent_rows
        .into_iter()
        .filter_map(|(item_id, alert_type, created_at)| {
            Some(ExistingAlert {
                item_id: item_id?,
                alert_type: AlertType::from_str(&alert_type)?,
                created_at,
            })
        })
        .collect();

    let user_ids: Vec<Uuid> = items.iter().map(|i| i.user_id).collect();
    let emails: HashMap<Uuid, String> = users::table
        .filter(users::id.eq_any(&user_ids))
        .filter(users::deleted_at.is_null())
        .select((users::id, users::email))
        .load::<(Uuid, Option<String>)>(conn)?
        .into_iter()
        .filter_map(|(id, email)| Some((id, email?)))
        .collect();

    Ok(ExpirySnapshot {
        items,
        recent,
        emails,
    })
}

fn store_alerts(conn: &mut PgConnection, scan: &ExpiryScan) -> QueryResult<usize> {
    let new_alerts: Vec<NewAlert> = scan.alerts.iter().map(NewAlert::from_draft).collect();
    diesel::insert_into(alerts::table)
        .values(&new_alerts)
        .execute(conn)
}

#[utoipa::path(
    get,
    path = "/api/cron/expiry-check",
    tag = "cron",
    responses(
        (status = 200, description = "Expiry alerts processed", body = ExpiryCheckResponse),
        (status = 401, description = "Missing or wrong cron secret", body = ErrorResponse),
        (status = 500, description = "Processing failed", body = CronErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn expiry_check(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    if !state.config.cron_secret_matches(presented) {
        tracing::warn!("Rejected cron call with missing or wrong secret");
        return crate::api::error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let now = Utc::now();

    // Release the connection before any notification is awaited.
    let (snapshot, scan) = {
        let mut conn = match state.pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Failed to get database connection: {}", e);
                return cron_error(StatusCode::INTERNAL_SERVER_ERROR, "Database connection failed");
            }
        };

        let snapshot = match load_snapshot(&mut conn, now) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Failed to load items for expiry check: {}", e);
                return cron_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process alerts");
            }
        };

        let scan = plan_expiry_alerts(&snapshot.items, &snapshot.recent, now);
        if let Err(e) = store_alerts(&mut conn, &scan) {
            tracing::error!("Failed to store expiry alerts: {}", e);
            return cron_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process alerts");
        }
        (snapshot, scan)
    };

    let items_by_id: HashMap<Uuid, &PantryItem> =
        snapshot.items.iter().map(|item| (item.id, item)).collect();

    let mut notifications_sent = 0;
    for draft in &scan.alerts {
        let (Some(item), Some(email)) = (
            items_by_id.get(&draft.item_id),
            snapshot.emails.get(&draft.user_id),
        ) else {
            continue;
        };
        if let Some(message) = expiry_alert_email(email, item, now) {
            if send_best_effort(state.notifier.as_ref(), &message).await {
                notifications_sent += 1;
            }
        }
    }

    tracing::info!(
        processed = scan.processed,
        alerts_created = scan.alerts.len(),
        notifications_sent,
        "Expiry check finished"
    );

    (
        StatusCode::OK,
        Json(ExpiryCheckResponse {
            success: true,
            processed: scan.processed,
            alerts_created: scan.alerts.len(),
            notifications_sent,
            timestamp: now,
        }),
    )
        .into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(expiry_check),
    components(schemas(ExpiryCheckResponse, CronErrorResponse))
)]
pub struct ApiDoc;
