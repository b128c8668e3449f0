use crate::api::{error_response, ErrorResponse};
use crate::auth::AuthUser;
use crate::AppState;
use axum::routing::get;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json, Router,
};
use pantry_core::{lookup_barcode, BarcodeError, BarcodeProduct};
use utoipa::OpenApi;

/// Returns the router for /api/barcode endpoints (mounted at /api/barcode)
pub fn router() -> Router<AppState> {
    Router::new().route("/{code}", get(lookup))
}

#[utoipa::path(
    get,
    path = "/api/barcode/{code}",
    tag = "barcode",
    params(
        ("code" = String, Path, description = "EAN/UPC barcode digits")
    ),
    responses(
        (status = 200, description = "Product found", body = BarcodeProduct),
        (status = 400, description = "Malformed barcode", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 502, description = "Product database unavailable", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn lookup(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    match lookup_barcode(
        state.barcode_client.as_ref(),
        &state.config.openfoodfacts_url,
        &code,
    )
    .await
    {
        Ok(Some(product)) => (StatusCode::OK, Json(product)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Product not found"),
        Err(BarcodeError::InvalidBarcode(_)) => {
            error_response(StatusCode::BAD_REQUEST, "Invalid barcode")
        }
        Err(e) => {
            tracing::error!("Failed to look up barcode {}: {}", code, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to look up barcode")
        }
    }
}

#[derive(OpenApi)]
#[openapi(paths(lookup), components(schemas(BarcodeProduct)))]
pub struct ApiDoc;
