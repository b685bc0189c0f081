//! Access-code gate endpoints

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, header};
use serde::Deserialize;
use shared::error::AppError;

use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessCodeRequest {
    access_code: Option<String>,
}

/// POST /api/admin/login `{ "accessCode": "..." }`
///
/// The body is parsed by hand: an unparsable body is the same as a wrong code.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let submitted = serde_json::from_slice::<AccessCodeRequest>(&body)
        .ok()
        .and_then(|req| req.access_code);

    let cookie = state.access.login(submitted.as_deref())?;
    tracing::info!("Access code accepted");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response())
}

/// GET /api/admin/session
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": state.access.is_granted(&headers) }))
}
