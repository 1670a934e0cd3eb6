mod followers;

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use followpulse_scraper::Resolver;
use followpulse_store::Recorder;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub recorder: Recorder,
}

/// Error body shared by handlers and middleware: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::new(message),
        }
    }

    /// Details stay in the logs; clients only see a generic message.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody::new("Internal server error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
    sources: Vec<&'static str>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "request handler panicked");
    ApiError::internal().into_response()
}

fn tracking_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/followers",
            get(followers::get_followers).post(followers::post_followers),
        )
        .route("/followers/history", get(followers::get_history))
        .route_layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(tracking_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        store: state.recorder.store().backend(),
        sources: state.resolver.source_names(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use followpulse_core::{DemoProfile, DemoProfiles, Handle, ProfileRecord, SourceKind};
    use followpulse_scraper::{DemoSource, ProfileSource, Resolver, SourceError};
    use followpulse_store::{HistoryStore, MemoryStore, Recorder};
    use tower::ServiceExt;

    use super::{build_app, AppState};
    use crate::middleware::RateLimitState;

    /// Live source that only knows `bob` (1000 followers) and panics for
    /// `boom`.
    pub struct BobSource;

    #[async_trait]
    impl ProfileSource for BobSource {
        fn name(&self) -> &'static str {
            "rapidapi"
        }

        async fn attempt(&self, handle: &Handle) -> Result<ProfileRecord, SourceError> {
            match handle.as_str() {
                "bob" => {
                    let mut profile = ProfileRecord::new(handle.clone(), SourceKind::Live, "rapidapi");
                    profile.follower_count = 1000;
                    Ok(profile)
                }
                "boom" => panic!("source exploded"),
                _ => Err(SourceError::no_data("rapidapi", handle)),
            }
        }
    }

    pub fn demo_table() -> DemoProfiles {
        let mut table = DemoProfiles::empty();
        table.insert(DemoProfile {
            username: Handle::parse("alice").unwrap(),
            followers: 325,
            following: 26,
            full_name: "Alice".to_string(),
            biography: String::new(),
            profile_pic_url: String::new(),
        });
        table
    }

    pub fn test_app_with(store: Arc<dyn HistoryStore>, max_requests: usize) -> Router {
        let resolver = Resolver::new(vec![
            Box::new(BobSource),
            Box::new(DemoSource::new(demo_table())),
        ]);
        build_app(
            AppState {
                resolver: Arc::new(resolver),
                recorder: Recorder::new(store),
            },
            RateLimitState::new(max_requests, std::time::Duration::from_secs(60)),
        )
    }

    pub fn test_app() -> Router {
        test_app_with(Arc::new(MemoryStore::new()), 1_000)
    }

    pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).expect("json parse")
        };
        (status, json)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{get, send, test_app};
    use super::*;

    #[test]
    fn api_error_bad_request_maps_to_400() {
        let response = ApiError::bad_request("Username is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_internal_maps_to_500() {
        let response = ApiError::internal().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_store_and_chain() {
        let (status, json) = send(&test_app(), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"], "memory");
        assert_eq!(json["sources"], serde_json::json!(["rapidapi", "demo"]));
    }

    #[tokio::test]
    async fn handler_panic_becomes_generic_500() {
        let (status, json) = send(&test_app(), get("/followers?username=boom")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let request = axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/followers")
            .header(header::ORIGIN, "https://dashboard.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .expect("request");
        let response = tower::ServiceExt::oneshot(test_app(), request)
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
