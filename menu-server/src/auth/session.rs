//! Session middleware for admin routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::AppError;

use super::{Route, session_token};
use crate::error::ServiceError;
use crate::state::AppState;

/// Rejection for admin routes: 401 plus where to send the visitor
pub fn login_required() -> AppError {
    AppError::not_authenticated().with_detail("redirect", Route::Login.path())
}

/// Require a valid admin session (Bearer token or session cookie).
/// The resolved [`super::Session`] is inserted into request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = session_token(request.headers())
        .map(str::to_owned)
        .ok_or_else(|| login_required().into_response())?;

    let session = state
        .auth
        .get_session(&token)
        .await
        .map_err(|e| ServiceError::auth_provider(e).into_response())?
        .ok_or_else(|| {
            tracing::debug!("Admin request with invalid or expired session");
            login_required().into_response()
        })?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
