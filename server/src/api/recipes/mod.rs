pub mod create;
pub mod get;
pub mod list;
pub mod matches;
pub mod rate;

use crate::models::RecipeRow;
use crate::schema::recipes;
use crate::store::attach_ingredients;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use diesel::prelude::*;
use pantry_core::Recipe;
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/matches", get(matches::list_matches))
        .route("/{id}", get(get::get_recipe))
        .route("/{id}/rate", post(rate::rate_recipe))
}

/// A live recipe the user may see, with its ingredients.
pub(crate) fn find_visible_recipe(
    conn: &mut PgConnection,
    user_id: Uuid,
    id: Uuid,
) -> QueryResult<Option<Recipe>> {
    let row: Option<RecipeRow> = recipes::table
        .filter(recipes::id.eq(id))
        .filter(recipes::deleted_at.is_null())
        .filter(recipes::is_public.eq(true).or(recipes::user_id.eq(user_id)))
        .select(RecipeRow::as_select())
        .first(conn)
        .optional()?;

    match row {
        Some(row) => Ok(attach_ingredients(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        get::get_recipe,
        rate::rate_recipe,
        matches::list_matches,
    ),
    components(schemas(
        list::ListRecipesResponse,
        create::CreateRecipeRequest,
        create::CreateIngredientRequest,
        rate::RateRecipeRequest,
        rate::RateRecipeResponse,
        matches::MatchesResponse,
    ))
)]
pub struct ApiDoc;
