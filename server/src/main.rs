mod api;
mod auth;
mod config;
mod db;
mod models;
mod schema;
mod store;

use axum::extract::{FromRef, MatchedPath};
use axum::http::Request;
use axum::middleware;
use axum::Router;
use pantry_core::{HttpClient, LogNotifier, MatchingConfig, Notifier, ReqwestClient};
use std::env;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub config: Arc<config::ServerConfig>,
    pub matching: Arc<MatchingConfig>,
    pub barcode_client: Arc<dyn HttpClient>,
    pub notifier: Arc<dyn Notifier>,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_router(state: AppState) -> Router {
    // Protected routes (auth required)
    let protected_router = Router::new()
        .nest("/api/test", api::testing::router())
        .nest("/api/pantries", api::pantries::router())
        .nest("/api/pantry-items", api::pantry_items::router())
        .nest("/api/barcode", api::barcode::router())
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/meal-plans", api::meal_plans::router())
        .nest("/api/dashboard", api::dashboard::router())
        .nest("/api/shopping-list", api::shopping_list::router())
        .nest("/api/alerts", api::alerts::router())
        .layer(middleware::from_fn_with_state(
            state.pool.clone(),
            auth::require_auth,
        ));

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::public::router())
        .merge(api::cron::router())
        .merge(protected_router)
        .merge(swagger_ui)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Don't create a span at all for noisy endpoints
                    if matched_path == "/api/test/unauthed-ping" {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        // Skip logging for noisy endpoints (trace-level spans)
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI spec");
        println!("{}", spec);
        return;
    }

    init_telemetry();

    let server_config = config::ServerConfig::from_env().expect("Invalid server configuration");
    let matching = MatchingConfig::from_env().expect("Invalid matching configuration");

    if server_config.cron_secret.is_none() {
        tracing::warn!("CRON_SECRET not set, the expiry check endpoint will reject every call");
    }

    let pool = db::create_pool(&server_config.database_url).expect("Failed to set up database");

    let barcode_client = ReqwestClient::builder()
        .user_agent(format!("pantry-server/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client");

    let bind_addr = server_config.bind_addr.clone();
    let state = AppState {
        pool: Arc::new(pool),
        config: Arc::new(server_config),
        matching: Arc::new(matching),
        barcode_client: Arc::new(barcode_client),
        notifier: Arc::new(LogNotifier),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Server listening on {}", bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod test_support {
    use super::*;
    use chrono::Utc;
    use diesel::r2d2::{ConnectionManager, Pool};
    use pantry_core::barcode::DEFAULT_OPENFOODFACTS_URL;
    use pantry_core::MockClient;
    use std::time::Duration;

    const UNREACHABLE_DB: &str = "postgres://localhost:1/unreachable";

    /// State whose pool never connects; checkouts give up after 100ms.
    pub fn offline_state(cron_secret: Option<&str>) -> AppState {
        let manager = ConnectionManager::new(UNREACHABLE_DB);
        let pool = Pool::builder()
            .connection_timeout(Duration::from_millis(100))
            .build_unchecked(manager);
        AppState {
            pool: Arc::new(pool),
            config: Arc::new(config::ServerConfig {
                database_url: UNREACHABLE_DB.to_string(),
                cron_secret: cron_secret.map(str::to_string),
                bind_addr: config::DEFAULT_BIND_ADDR.to_string(),
                openfoodfacts_url: DEFAULT_OPENFOODFACTS_URL.to_string(),
            }),
            matching: Arc::new(MatchingConfig::default()),
            barcode_client: Arc::new(MockClient::new()),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn test_user() -> models::User {
        let now = Utc::now();
        models::User {
            id: uuid::Uuid::new_v4(),
            username: "cook".to_string(),
            email: Some("cook@example.test".to_string()),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use crate::test_support::offline_state;
    use tower::ServiceExt;

    async fn status_of(state: AppState, request: Request<Body>) -> StatusCode {
        build_router(state)
            .oneshot(request)
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_unauthed_ping() {
        let request = Request::get("/api/test/unauthed-ping")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(offline_state(None), request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer_token() {
        for uri in [
            "/api/recipes/matches",
            "/api/pantry-items",
            "/api/dashboard",
            "/api/alerts",
        ] {
            let request = Request::get(uri).body(Body::empty()).unwrap();
            assert_eq!(
                status_of(offline_state(None), request).await,
                StatusCode::UNAUTHORIZED,
                "{}",
                uri
            );
        }

        let request = Request::post("/api/meal-plans/suggestions")
            .header("Authorization", "Basic abc")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"days": 2}"#))
            .unwrap();
        assert_eq!(
            status_of(offline_state(None), request).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_cron_rejects_wrong_or_missing_secret() {
        let request = Request::get("/api/cron/expiry-check")
            .header("Authorization", "Bearer nope")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(offline_state(Some("s3cret")), request).await,
            StatusCode::UNAUTHORIZED
        );

        let request = Request::get("/api/cron/expiry-check")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(offline_state(Some("s3cret")), request).await,
            StatusCode::UNAUTHORIZED
        );

        // No secret configured: even an empty bearer value is refused.
        let request = Request::get("/api/cron/expiry-check")
            .header("Authorization", "Bearer ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(offline_state(None), request).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
