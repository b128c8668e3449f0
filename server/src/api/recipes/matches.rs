use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::store::DbStore;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pantry_core::{match_pantry, RecipeMatch};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MatchesParams {
    /// Match against one pantry only
    pub pantry_id: Option<Uuid>,
    /// Number of matches to return (default: 10)
    pub limit: Option<usize>,
    /// Drop matches below this percentage
    pub min_match: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchesResponse {
    pub matches: Vec<RecipeMatch>,
}

/// Apply the optional floor and cap to an already ranked list.
pub fn select_matches(
    mut matches: Vec<RecipeMatch>,
    min_match: Option<f64>,
    limit: usize,
) -> Vec<RecipeMatch> {
    if let Some(floor) = min_match {
        matches.retain(|m| m.match_percentage >= floor);
    }
    matches.truncate(limit);
    matches
}

#[utoipa::path(
    get,
    path = "/api/recipes/matches",
    tag = "recipes",
    params(MatchesParams),
    responses(
        (status = 200, description = "Recipes ranked by pantry coverage", body = MatchesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_matches(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MatchesParams>,
) -> impl IntoResponse {
    let store = DbStore::new(state.pool.clone());

    let matches = match_pantry(&store, user.id, params.pantry_id, &state.matching).await;
    let matches = select_matches(
        matches,
        params.min_match,
        params.limit.unwrap_or(DEFAULT_LIMIT),
    );

    (StatusCode::OK, Json(MatchesResponse { matches })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::{rank_recipes, MatchingConfig, PantryItem, Recipe};

    fn ranked() -> Vec<RecipeMatch> {
        let items: Vec<PantryItem> = serde_json::from_value(serde_json::json!([
            {"name": "egg", "category": "DAIRY", "quantity": 6.0},
            {"name": "flour", "category": "BAKING", "quantity": 1.0}
        ]))
        .unwrap();
        let recipes: Vec<Recipe> = serde_json::from_value(serde_json::json!([
            {"name": "Omelette", "category": "BREAKFAST", "ingredients": [{"name": "egg"}]},
            {"name": "Pancakes", "category": "BREAKFAST",
             "ingredients": [{"name": "egg"}, {"name": "flour"}, {"name": "milk"}, {"name": "sugar"}]},
            {"name": "Salad", "category": "SALAD", "ingredients": [{"name": "lettuce"}]}
        ]))
        .unwrap();
        rank_recipes(&items, &recipes, &MatchingConfig::default())
    }

    #[test]
    fn test_select_matches_floor_and_limit() {
        let names = |ms: &[RecipeMatch]| ms.iter().map(|m| m.recipe.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(&select_matches(ranked(), None, 10)), ["Omelette", "Pancakes", "Salad"]);
        assert_eq!(names(&select_matches(ranked(), Some(50.0), 10)), ["Omelette", "Pancakes"]);
        assert_eq!(names(&select_matches(ranked(), None, 1)), ["Omelette"]);
    }

    #[tokio::test]
    async fn test_matches_survive_unreachable_database() {
        use crate::test_support::{offline_state, test_user};

        let response = list_matches(
            AuthUser(test_user()),
            State(offline_state(None)),
            Query(MatchesParams::default()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["matches"], serde_json::json!([]));
    }
}
