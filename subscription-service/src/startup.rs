//! Application startup and lifecycle management.

use crate::config::SubscriptionConfig;
use crate::dtos;
use crate::handlers::{self, subscriptions};
use crate::services::{init_metrics, Database, PgSubscriptionRepository};
use crate::usecases::SubscriptionUseCases;
use axum::{body::Body, middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::tracing::{make_request_span, request_id_middleware};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        subscriptions::create_subscription,
        subscriptions::get_subscription,
        subscriptions::update_subscription,
        subscriptions::delete_subscription,
        subscriptions::list_subscriptions,
        subscriptions::get_total_sum,
    ),
    components(
        schemas(
            dtos::CreateSubscriptionRequest,
            dtos::CreateSubscriptionResponse,
            dtos::SubscriptionResponse,
            dtos::UpdateSubscriptionRequest,
            dtos::UpdateSubscriptionResponse,
            dtos::DeleteSubscriptionResponse,
            dtos::SubscriptionListResponse,
            dtos::TotalSumResponse,
            dtos::ErrorResponse,
        )
    ),
    tags(
        (name = "Subscriptions", description = "Recurring subscriptions and spend totals"),
    )
)]
pub struct ApiDoc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: SubscriptionConfig,
    pub db: Arc<Database>,
    pub usecases: SubscriptionUseCases,
}

/// Build the HTTP router. `/subscriptions/total` is registered ahead of
/// `/subscriptions/:id` so it is never read as an id.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route(
            "/subscriptions",
            get(subscriptions::list_subscriptions).post(subscriptions::create_subscription),
        )
        .route("/subscriptions/total", get(subscriptions::get_total_sum))
        .route(
            "/subscriptions/:id",
            get(subscriptions::get_subscription)
                .put(subscriptions::update_subscription)
                .delete(subscriptions::delete_subscription),
        );

    if state.config.swagger_enabled {
        app = app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    }

    app.with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span::<Body>)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connect the pool, apply migrations and bind the listener.
    pub async fn build(config: SubscriptionConfig) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::connect(&config.database).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        let repository = Arc::new(PgSubscriptionRepository::new(db.clone()));
        let state = AppState {
            config: config.clone(),
            db: Arc::new(db),
            usecases: SubscriptionUseCases::new(repository),
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Subscription service listener bound");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves, then give in-flight requests the
    /// configured grace period and close the pool.
    pub async fn run_until_stopped<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let grace = self.state.config.common.shutdown_timeout();
        let db = self.state.db.clone();
        let app = router(self.state);

        tracing::info!(
            service = "subscription-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        let (stopping_tx, stopping_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(self.listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received, draining connections");
                let _ = stopping_tx.send(());
            })
            .into_future();

        tokio::pin!(server);
        let result = tokio::select! {
            result = &mut server => result,
            _ = async {
                if stopping_rx.await.is_ok() {
                    tokio::time::sleep(grace).await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Graceful shutdown timed out, dropping open connections"
                );
                Ok(())
            }
        };

        db.close().await;

        if let Err(e) = &result {
            tracing::error!(error = %e, "HTTP server error");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::usecases::testing::InMemoryRepository;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use service_core::config::Config as CoreConfig;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const USER_ID: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";

    fn state(repository: InMemoryRepository) -> AppState {
        let config = SubscriptionConfig {
            common: CoreConfig::default(),
            service_name: "subscription-service-test".to_string(),
            service_version: "0.1.0".to_string(),
            log_level: "warn".to_string(),
            otlp_endpoint: None,
            database: DatabaseConfig {
                url: "postgres://localhost/unused".to_string(),
                max_connections: 1,
                min_connections: 0,
                acquire_timeout_secs: 1,
            },
            swagger_enabled: true,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();

        AppState {
            config,
            db: Arc::new(Database::from_pool(pool)),
            usecases: SubscriptionUseCases::new(Arc::new(repository)),
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let app = router(state(InMemoryRepository::new()));

        let (status, body) = send(
            &app,
            "POST",
            "/subscriptions",
            Some(json!({
                "service_name": "Netflix",
                "price": 2000,
                "user_id": USER_ID,
                "start_date": "01-01-2025"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);

        let (status, body) = send(&app, "GET", "/subscriptions/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service_name"], "Netflix");
        assert_eq!(body["start_date"], "01-01-2025");
        assert!(body["end_date"].is_null());
    }

    #[tokio::test]
    async fn test_malformed_requests_are_bad_request() {
        let app = router(state(InMemoryRepository::new()));

        let (status, body) = send(&app, "GET", "/subscriptions/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "id must be positive integer");

        let request = Request::builder()
            .method("POST")
            .uri("/subscriptions")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "invalid json");

        let (status, body) = send(&app, "GET", "/subscriptions?limit=many", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid query");
    }

    #[tokio::test]
    async fn test_use_case_errors_map_to_status() {
        let app = router(state(InMemoryRepository::new()));

        let (status, body) = send(&app, "GET", "/subscriptions?limit=-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "limit must be positive or 0");

        let (status, body) = send(&app, "DELETE", "/subscriptions/0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "id must be positive");

        let (status, body) = send(&app, "GET", "/subscriptions/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "subscription not found");
    }

    #[tokio::test]
    async fn test_storage_failure_hides_cause() {
        let app = router(state(InMemoryRepository::broken()));

        let (status, body) = send(&app, "GET", "/subscriptions", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "failed to get subscription list" }));
    }

    #[tokio::test]
    async fn test_total_route_is_not_an_id() {
        let app = router(state(InMemoryRepository::new()));

        let (status, body) = send(&app, "GET", "/subscriptions/total", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_sum"], 0);
    }

    #[tokio::test]
    async fn test_patch_clears_end_date() {
        let app = router(state(InMemoryRepository::new()));
        send(
            &app,
            "POST",
            "/subscriptions",
            Some(json!({
                "service_name": "Spotify",
                "price": 975,
                "user_id": USER_ID,
                "start_date": "01-03-2025",
                "end_date": "01-09-2025"
            })),
        )
        .await;

        let (status, body) = send(
            &app,
            "PUT",
            "/subscriptions/1",
            Some(json!({ "end_date": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"], true);

        let (_, body) = send(&app, "GET", "/subscriptions/1", None).await;
        assert!(body["end_date"].is_null());
        assert_eq!(body["price"], 975);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = router(state(InMemoryRepository::new()));

        let (status, body) = send(&app, "GET", "/.well-known/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/subscriptions/total"].is_object());
    }
}
