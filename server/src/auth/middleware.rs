use crate::db::DbPool;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::db::user_for_token;
use super::extractor::{bearer_token, AuthError};

/// Rejects requests without a valid session token before any handler runs.
pub async fn require_auth(
    State(pool): State<Arc<DbPool>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user = match bearer_token(request.headers()) {
        Ok(token) => user_for_token(&pool, token).await,
        Err(e) => return e.into_response(),
    };

    let Some(user) = user else {
        return AuthError::InvalidToken.into_response();
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}
