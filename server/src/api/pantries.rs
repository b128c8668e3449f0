use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewPantry, NewPantryMember, Pantry};
use crate::schema::{pantries, pantry_members};
use crate::AppState;
use axum::routing::get;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json, Router};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pantry_core::PantryRole;
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

pub const DEFAULT_PANTRY_NAME: &str = "My Pantry";

/// Returns the router for /api/pantries endpoints (mounted at /api/pantries)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_pantries))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PantryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub role: PantryRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListPantriesResponse {
    pub pantries: Vec<PantryResponse>,
}

fn member_pantries(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> QueryResult<Vec<(Pantry, String)>> {
    pantries::table
        .inner_join(pantry_members::table)
        .filter(pantry_members::user_id.eq(user_id))
        .order(pantries::created_at.asc())
        .select((Pantry::as_select(), pantry_members::role))
        .load(conn)
}

/// The user's pantries, creating "My Pantry" (owned by them) on first use.
pub fn ensure_pantries(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> QueryResult<Vec<(Pantry, String)>> {
    let existing = member_pantries(conn, user_id)?;
    if !existing.is_empty() {
        return Ok(existing);
    }

    conn.transaction(|conn| {
        let pantry: Pantry = diesel::insert_into(pantries::table)
            .values(&NewPantry {
                name: DEFAULT_PANTRY_NAME,
                description: None,
            })
            .returning(Pantry::as_returning())
            .get_result(conn)?;

        diesel::insert_into(pantry_members::table)
            .values(&NewPantryMember {
                pantry_id: pantry.id,
                user_id,
                role: PantryRole::Owner.as_str(),
            })
            .execute(conn)?;

        tracing::info!(user_id = %user_id, pantry_id = %pantry.id, "Created default pantry");
        Ok(vec![(pantry, PantryRole::Owner.as_str().to_string())])
    })
}

/// Whether `user_id` belongs to `pantry_id`.
pub fn is_member(conn: &mut PgConnection, user_id: Uuid, pantry_id: Uuid) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        pantry_members::table
            .filter(pantry_members::pantry_id.eq(pantry_id))
            .filter(pantry_members::user_id.eq(user_id)),
    ))
    .get_result(conn)
}

#[utoipa::path(
    get,
    path = "/api/pantries",
    tag = "pantries",
    responses(
        (status = 200, description = "Pantries the user belongs to", body = ListPantriesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_pantries(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows = match ensure_pantries(&mut conn, user.id) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list pantries: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list pantries");
        }
    };

    let pantries = rows
        .into_iter()
        .map(|(pantry, role)| PantryResponse {
            id: pantry.id,
            name: pantry.name,
            description: pantry.description,
            role: PantryRole::from_str(&role).unwrap_or(PantryRole::Member),
            created_at: pantry.created_at,
        })
        .collect();

    (StatusCode::OK, Json(ListPantriesResponse { pantries })).into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(list_pantries),
    components(schemas(PantryResponse, ListPantriesResponse, PantryRole))
)]
pub struct ApiDoc;
