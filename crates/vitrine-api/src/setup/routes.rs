//! Route configuration and setup

use crate::constants::{API_PREFIX, UPLOADS_PREFIX};
use crate::error::HttpAppError;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use vitrine_core::{AppError, Config};
use vitrine_infra::{request_id_middleware, security_headers_middleware, SecurityHeadersConfig};

const CORS_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
];

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let security_headers_config = SecurityHeadersConfig::for_environment(config.is_production());

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        request_timeout_secs = config.request_timeout_secs(),
        "HTTP limits enabled"
    );

    let app = upload_routes(config)
        .merge(public_routes().layer(DefaultBodyLimit::max(config.json_body_limit_bytes())))
        .fallback(not_found)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs()),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let allow_origin = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        // Credentials rule out a literal `*`; echo the caller's origin instead
        AllowOrigin::mirror_request()
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(CORS_METHODS)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
        ])
        .expose_headers([
            header::CONTENT_RANGE,
            HeaderName::from_static("x-content-range"),
        ]))
}

/// Upload routes. The single-file route has no body cap: the limiter stops reading
/// as soon as the part outgrows its quota. The multi-file route is capped at the
/// largest batch the quotas allow; the cap surfaces through the multipart reader,
/// so it still ends in a limiter error rather than a bare 413.
fn upload_routes(config: &Config) -> Router<Arc<AppState>> {
    let multi_body_limit = config.upload_limits().max_request_bytes();

    Router::new()
        .route(
            &format!("{}/single", UPLOADS_PREFIX),
            post(handlers::upload::upload_single).layer(DefaultBodyLimit::disable()),
        )
        .route(
            &format!("{}/multiple", UPLOADS_PREFIX),
            post(handlers::upload::upload_multiple).layer(DefaultBodyLimit::max(multi_body_limit)),
        )
}

/// Public routes
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::health::banner))
        .route(
            &format!("{}/health", API_PREFIX),
            get(handlers::health::health_check),
        )
        .route(&format!("{}/test", API_PREFIX), get(handlers::health::ping))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("Route not found".to_string()))
}
