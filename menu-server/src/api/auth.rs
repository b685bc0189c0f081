//! Admin session endpoints: sign-in, sign-out, session check

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, header};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::parse_json;
use crate::auth::{AdminGate, AuthError, GateView, SESSION_COOKIE, http_only_cookie, session_token};
use crate::error::ServiceError;
use crate::state::AppState;

/// POST /api/auth/login
///
/// Missing or null fields are blank credentials and fail sign-in like any
/// other wrong pair.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub gate: GateView,
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: LoginRequest = parse_json(&body)?;
    let result = state
        .auth
        .sign_in_with_password(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await;

    let mut gate = AdminGate::new();
    let view = gate.on_sign_in(result.as_ref());

    match result {
        Ok(session) => {
            let max_age = ((session.expires_at - shared::util::now_millis()) / 1000).max(0);
            let cookie = http_only_cookie(
                SESSION_COOKIE,
                &session.token,
                max_age,
                state.secure_cookies,
            );
            let body = LoginResponse {
                gate: view,
                token: session.token,
            };
            Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
        }
        Err(AuthError::InvalidCredentials) => Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            view.error.unwrap_or_default(),
        )),
        Err(AuthError::Unavailable(e)) => Err(ServiceError::auth_provider(e).into()),
    }
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers) {
        state
            .auth
            .sign_out(token)
            .await
            .map_err(ServiceError::auth_provider)?;
    }

    let view = AdminGate::new().on_sign_out();
    let cookie = http_only_cookie(SESSION_COOKIE, "", 0, state.secure_cookies);
    Ok(([(header::SET_COOKIE, cookie)], Json(view)).into_response())
}

/// GET /api/auth/session
pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GateView>, AppError> {
    let session = match session_token(&headers) {
        Some(token) => state
            .auth
            .get_session(token)
            .await
            .map_err(ServiceError::auth_provider)?,
        None => None,
    };
    Ok(Json(AdminGate::new().on_mount(session.as_ref())))
}
