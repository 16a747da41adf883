//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use guardiq_verification::VerificationPipeline;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ServiceConfig;
use crate::error::RpcError;
use crate::handlers;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<VerificationPipeline>,
}

/// Build the `/api` router with CORS restricted to `cors_origins`.
pub fn router(
    pipeline: Arc<VerificationPipeline>,
    cors_origins: &[String],
) -> Result<Router, RpcError> {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/verify-vip", post(handlers::verify_vip))
        .route("/vip-stats", get(handlers::vip_stats))
        .route("/security-status", get(handlers::security_status))
        .route("/user-activity/:email", get(handlers::user_activity));

    Ok(Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(cors_layer(cors_origins)?)
        .with_state(AppState { pipeline }))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, RpcError> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|e| RpcError::Config(format!("invalid CORS origin '{o}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

pub struct RpcServer {
    config: ServiceConfig,
    pipeline: Arc<VerificationPipeline>,
}

impl RpcServer {
    pub fn new(config: ServiceConfig, pipeline: Arc<VerificationPipeline>) -> Self {
        Self { config, pipeline }
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn start<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.pipeline, &self.config.cors_origins)?;
        let addr = self.config.bind_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, "HTTP API listening");
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RpcError::Server(e.to_string()))?;

        tracing::info!("HTTP API stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Request, StatusCode};
    use guardiq_nullables::{NullClock, NullStore};
    use guardiq_store::AggregateStatistics;
    use guardiq_types::AttemptStatus;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const NOW: u64 = 1_700_000_000;

    fn setup() -> (Arc<NullStore>, Router) {
        let clock = Arc::new(NullClock::new(NOW));
        let store = Arc::new(NullStore::with_clock(clock.clone()));
        let pipeline = Arc::new(VerificationPipeline::from_backend(store.clone(), clock));
        let app = router(pipeline, &["http://localhost:3000".to_string()]).unwrap();
        (store, app)
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_verify(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/verify-vip")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn attempt(followers: u64) -> Value {
        json!({
            "fullName": "Ada Stream",
            "email": "ada@example.com",
            "role": "celebrity",
            "platform": "twitch",
            "followers": followers
        })
    }

    #[tokio::test]
    async fn health_reports_service_and_counters() {
        let (_, app) = setup();
        let resp = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "GuardIQ VIP API");
        assert_eq!(body["counters"]["verified"], 0);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn verified_attempt_returns_user() {
        let (store, app) = setup();
        let resp = app.oneshot(post_verify(attempt(150_000))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Verified as VIP");
        assert_eq!(body["user"]["fullName"], "Ada Stream");
        assert_eq!(body["user"]["role"], "Celebrity");
        assert_eq!(body["user"]["platform"], "Twitch");
        assert_eq!(body["user"]["followers"], 150_000);
        assert_eq!(body["user"]["verificationStatus"], "VIP Verified");
        assert!(body.get("blocked").is_none());
        assert_eq!(store.entries().len(), 1);
    }

    #[tokio::test]
    async fn below_threshold_is_unauthorized() {
        let (store, app) = setup();
        let resp = app.oneshot(post_verify(attempt(50_000))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "You're not a VIP. Insufficient followers for your role category."
        );
        assert!(body.get("user").is_none());
        assert_eq!(store.entries()[0].status, AttemptStatus::Failed);
    }

    #[tokio::test]
    async fn flagged_email_is_too_many_requests() {
        let (store, app) = setup();
        store.flag("ada@example.com");
        let resp = app.oneshot(post_verify(attempt(150_000))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["blocked"], true);
        assert_eq!(
            body["message"],
            "Account temporarily locked due to suspicious activity. Please contact security."
        );
    }

    #[tokio::test]
    async fn empty_body_is_bad_request() {
        let (store, app) = setup();
        let req = Request::builder()
            .method("POST")
            .uri("/api/verify-vip")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "No data provided");
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn invalid_fields_are_bad_request() {
        let (store, app) = setup();
        let mut bad = attempt(150_000);
        bad["role"] = json!("wizard");
        let resp = app.oneshot(post_verify(bad)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid role selected");
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn caller_address_and_agent_are_logged() {
        let (store, app) = setup();
        let mut req = post_verify(attempt(150_000));
        req.headers_mut()
            .insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 7], 40_000))));

        app.oneshot(req).await.unwrap();

        let entry = &store.entries()[0];
        assert_eq!(entry.caller_address.as_deref(), Some("198.51.100.7"));
        assert_eq!(entry.caller_agent, "curl/8.0");
    }

    #[tokio::test]
    async fn vip_stats_returns_aggregates() {
        let (store, app) = setup();
        app.clone().oneshot(post_verify(attempt(150_000))).await.unwrap();
        app.clone().oneshot(post_verify(attempt(10))).await.unwrap();

        let resp = app.oneshot(get("/api/vip-stats")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["active_vips"], 1);
        assert_eq!(body["total_attempts"], 2);
        assert_eq!(store.entries().len(), 2);
    }

    #[tokio::test]
    async fn security_status_uses_camel_case() {
        let (store, app) = setup();
        store.set_statistics(AggregateStatistics {
            active_vips: 12,
            recent_verifications: 8,
            failed_attempts_today: 2,
            high_risk_events: 6,
            total_attempts: 16,
        });

        let resp = app.oneshot(get("/api/security-status")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["securityLevel"], "critical");
        assert_eq!(body["successRate"], 80.0);
        assert_eq!(body["totalVips"], 12);
        assert_eq!(body["recentActivity"], 8);
        assert_eq!(body["threatLevel"], 6);
        assert_eq!(body["lastUpdated"], "2023-11-14T22:13:20+00:00");
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let (store, app) = setup();
        store.fail_statistics(true);
        let resp = app.oneshot(get("/api/security-status")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "Internal server error");
    }

    #[tokio::test]
    async fn user_activity_lookup() {
        let (store, app) = setup();
        store.flag("ada@example.com");

        let resp = app
            .clone()
            .oneshot(get("/api/user-activity/ada@example.com"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["is_suspicious"], true);
        assert_eq!(body["reason"], "flagged");

        let resp = app.oneshot(get("/api/user-activity/nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid email format");
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (_, app) = setup();
        let resp = app.oneshot(get("/api/does-not-exist")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Endpoint not found");
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let (_, app) = setup();
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/verify-vip")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }

    #[test]
    fn invalid_cors_origin_is_a_config_error() {
        let clock = Arc::new(NullClock::new(NOW));
        let store = Arc::new(NullStore::with_clock(clock.clone()));
        let pipeline = Arc::new(VerificationPipeline::from_backend(store, clock));
        let result = router(pipeline, &["bad\norigin".to_string()]);
        assert!(matches!(result, Err(RpcError::Config(_))));
    }
}
