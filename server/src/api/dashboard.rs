use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::store::DbStore;
use crate::AppState;
use axum::routing::get;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json, Router};
use chrono::Utc;
use pantry_core::dashboard::{RECENT_ITEMS, TIMELINE_LENGTH};
use pantry_core::{
    expiry_timeline, find_matching_recipes, pantry_items_or_empty, recent_items, DashboardStats,
    PantryItem, RecipeMatch, TimelineEntry,
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

const TOP_MATCHES: usize = 3;

/// Returns the router for /api/dashboard (mounted at /api/dashboard)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    /// Items with an expiry date, soonest first
    pub expiring: Vec<TimelineEntry>,
    /// Last items added, newest first
    pub recent: Vec<PantryItem>,
    /// Best recipe matches for the current pantry
    pub suggestions: Vec<RecipeMatch>,
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Inventory summary and suggestions", body = DashboardResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let store = DbStore::new(state.pool.clone());

    // One pantry read feeds stats, timeline and matching.
    let items = pantry_items_or_empty(&store, user.id, None).await;
    let mut suggestions = find_matching_recipes(&store, user.id, &items, &state.matching).await;
    suggestions.truncate(TOP_MATCHES);

    let now = Utc::now();
    let response = DashboardResponse {
        stats: DashboardStats::compute(&items, now),
        expiring: expiry_timeline(&items, now, TIMELINE_LENGTH),
        recent: recent_items(&items, RECENT_ITEMS),
        suggestions,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(get_dashboard),
    components(schemas(DashboardResponse, DashboardStats, TimelineEntry))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{offline_state, test_user};

    #[tokio::test]
    async fn test_dashboard_survives_unreachable_database() {
        let response = get_dashboard(AuthUser(test_user()), State(offline_state(None)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["stats"]["total_items"], 0);
        assert_eq!(json["stats"]["total_value"], 0.0);
        assert_eq!(json["suggestions"], serde_json::json!([]));
        assert_eq!(json["recent"], serde_json::json!([]));
    }
}
