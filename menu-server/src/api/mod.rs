//! API routes for menu-server

pub mod access;
pub mod admin;
pub mod auth;
pub mod health;
pub mod menu;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue, Method, header};
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::rate_limit::{access_code_rate_limit, sign_in_rate_limit};
use crate::auth::require_admin;
use crate::state::AppState;
use crate::storage::MAX_FILE_SIZE;
use crate::storage::local::MEDIA_ROUTE;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Decode a JSON body, reporting failures in the error envelope
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Invalid JSON body: {e}"))
    })
}

/// Record id taken from the path; anything non-numeric is a bad request
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Invalid id: {raw}"))
            .with_detail("field", "id")
    })
}

/// Item form body: the image plus room for the text fields
const MAX_ITEM_FORM_SIZE: usize = MAX_FILE_SIZE + 256 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build a router with all routes registered (no global middleware)
pub fn build_router(state: &AppState) -> Router<AppState> {
    // Admin CRUD (session required)
    let admin = Router::new()
        .route("/api/admin/menu", get(admin::get_menu))
        .route("/api/admin/sections", post(admin::create_section))
        .route("/api/admin/sections/{id}", delete(admin::delete_section))
        .route(
            "/api/admin/menu-items",
            post(admin::create_menu_item).layer(DefaultBodyLimit::max(MAX_ITEM_FORM_SIZE)),
        )
        .route("/api/admin/menu-items/{id}", delete(admin::delete_menu_item))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Sign-in routes (rate limited per IP)
    let sign_in = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(state.clone(), sign_in_rate_limit));
    let access_code = Router::new()
        .route("/api/admin/login", post(access::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            access_code_rate_limit,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/menu", get(menu::public_menu))
        .route("/api/admin/session", get(access::session))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/logout", post(auth::logout))
        .merge(sign_in)
        .merge(access_code)
        .merge(admin)
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let Some(origin) = allow_origin else {
        return CorsLayer::permissive();
    };
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(origin = %origin, "Invalid CORS_ALLOW_ORIGIN, falling back to permissive CORS");
            CorsLayer::permissive()
        }
    }
}

/// Build the fully configured application
pub fn build_app(state: AppState) -> Router {
    let mut router = build_router(&state);
    if let Some(dir) = &state.media_dir {
        router = router.nest_service(MEDIA_ROUTE, ServeDir::new(dir));
    }

    router
        .layer(cors_layer(state.cors_allow_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        // Copy the request id onto the response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Outermost: assign the id before anything else sees the request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
