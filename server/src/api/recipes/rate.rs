use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewRecipeRating;
use crate::schema::{recipe_ratings, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::find_visible_recipe;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RateRecipeRequest {
    /// 1 to 5
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RateRecipeResponse {
    pub rating: f64,
    pub total_ratings: i32,
}

/// Mean of all ratings, or 0 when there are none.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    sum as f64 / ratings.len() as f64
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/rate",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RateRecipeRequest,
    responses(
        (status = 200, description = "Rating stored", body = RateRecipeResponse),
        (status = 400, description = "Rating out of range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn rate_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<RateRecipeRequest>,
) -> impl IntoResponse {
    if !(1..=5).contains(&request.rating) {
        return error_response(StatusCode::BAD_REQUEST, "Rating must be between 1 and 5");
    }

    let mut conn = get_conn!(pool);

    match find_visible_recipe(&mut conn, user.id, id) {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to rate recipe");
        }
    }

    let result: QueryResult<RateRecipeResponse> = conn.transaction(|conn| {
        let now = Utc::now();
        diesel::insert_into(recipe_ratings::table)
            .values(&NewRecipeRating {
                recipe_id: id,
                user_id: user.id,
                rating: request.rating,
                review: request.review.as_deref(),
            })
            .on_conflict((recipe_ratings::recipe_id, recipe_ratings::user_id))
            .do_update()
            .set((
                recipe_ratings::rating.eq(request.rating),
                recipe_ratings::review.eq(request.review.as_deref()),
                recipe_ratings::updated_at.eq(now),
            ))
            .execute(conn)?;

        let ratings: Vec<i32> = recipe_ratings::table
            .filter(recipe_ratings::recipe_id.eq(id))
            .select(recipe_ratings::rating)
            .load(conn)?;

        let summary = RateRecipeResponse {
            rating: average_rating(&ratings),
            total_ratings: ratings.len() as i32,
        };

        diesel::update(recipes::table.filter(recipes::id.eq(id)))
            .set((
                recipes::rating.eq(summary.rating),
                recipes::total_ratings.eq(summary.total_ratings),
                recipes::updated_at.eq(now),
            ))
            .execute(conn)?;

        Ok(summary)
    });

    match result {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            tracing::error!("Failed to rate recipe: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to rate recipe")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[5]), 5.0);
        assert_eq!(average_rating(&[4, 5]), 4.5);
        assert_eq!(average_rating(&[1, 2, 2]), 5.0 / 3.0);
    }
}
