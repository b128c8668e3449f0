use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::store::DbStore;
use crate::AppState;
use axum::routing::post;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json, Router};
use chrono::Utc;
use pantry_core::meal_plan::MAX_PLAN_DAYS;
use pantry_core::{generate_meal_plan, MealPlanRequest, MealPlanSuggestion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Returns the router for /api/meal-plans endpoints (mounted at /api/meal-plans)
pub fn router() -> Router<AppState> {
    Router::new().route("/suggestions", post(suggest_meal_plan))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealPlanResponse {
    pub suggestions: Vec<MealPlanSuggestion>,
}

#[utoipa::path(
    post,
    path = "/api/meal-plans/suggestions",
    tag = "meal_plans",
    request_body(content = MealPlanRequest, example = json!({"days": 3, "preferences": ["italian"]})),
    responses(
        (status = 200, description = "Suggested meals, by day then slot", body = MealPlanResponse),
        (status = 400, description = "Invalid number of days", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn suggest_meal_plan(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<MealPlanRequest>,
) -> impl IntoResponse {
    if request.days == 0 || request.days > MAX_PLAN_DAYS {
        return error_response(StatusCode::BAD_REQUEST, "Days must be between 1 and 14");
    }

    let store = DbStore::new(state.pool.clone());
    let mut rng = StdRng::from_os_rng();
    let today = Utc::now().date_naive();

    let suggestions =
        generate_meal_plan(&store, user.id, &request, today, &state.matching, &mut rng).await;

    (StatusCode::OK, Json(MealPlanResponse { suggestions })).into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(suggest_meal_plan),
    components(schemas(MealPlanRequest, MealPlanResponse, MealPlanSuggestion))
)]
pub struct ApiDoc;
