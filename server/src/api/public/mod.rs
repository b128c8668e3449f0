pub mod auth;
pub mod ping;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/test/unauthed-ping", get(ping::unauthed_ping))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
}

#[derive(OpenApi)]
#[openapi(
    paths(auth::login, auth::signup, ping::unauthed_ping),
    components(schemas(
        auth::LoginRequest,
        auth::LoginResponse,
        auth::SignupRequest,
        auth::SignupResponse,
        ping::UnauthedPingResponse,
    ))
)]
pub struct ApiDoc;
