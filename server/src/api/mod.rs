pub mod alerts;
pub mod barcode;
pub mod cron;
pub mod dashboard;
pub mod meal_plans;
pub mod pantries;
pub mod pantry_items;
pub mod public;
pub mod recipes;
pub mod shopping_list;
pub mod testing;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// `(status, {"error": message})` as a response.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Check out a pooled connection or return a 500 from the enclosing handler.
#[macro_export]
macro_rules! get_conn {
    ($pool:expr) => {
        match $pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("Failed to get database connection: {}", e);
                return $crate::api::error_response(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Database connection failed",
                );
            }
        }
    };
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Pantry API", description = "Food inventory and recipe suggestions"),
        components(schemas(
            ErrorResponse,
            pantry_core::PantryItem,
            pantry_core::Recipe,
            pantry_core::RecipeIngredient,
            pantry_core::RecipeMatch,
            pantry_core::FoodCategory,
            pantry_core::StorageLocation,
            pantry_core::RecipeCategory,
            pantry_core::Difficulty,
            pantry_core::MealType,
            pantry_core::AlertType,
            pantry_core::AlertPriority,
        ))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        testing::ApiDoc::openapi(),
        pantries::ApiDoc::openapi(),
        pantry_items::ApiDoc::openapi(),
        barcode::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        meal_plans::ApiDoc::openapi(),
        dashboard::ApiDoc::openapi(),
        shopping_list::ApiDoc::openapi(),
        alerts::ApiDoc::openapi(),
        cron::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_includes_every_module() {
        let spec = openapi();
        for path in [
            "/api/auth/signup",
            "/api/pantry-items",
            "/api/recipes/matches",
            "/api/meal-plans/suggestions",
            "/api/dashboard",
            "/api/shopping-list/generate",
            "/api/shopping-list/remind",
            "/api/alerts/low-stock",
            "/api/cron/expiry-check",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = spec.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}
