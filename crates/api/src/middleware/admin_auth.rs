use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use site_core::auth::constant_time_eq;
use site_core::config::AdminCredentials;
use tracing::warn;

use crate::{error::AppError, state::AppState};

/// Guards the admin API with HTTP Basic credentials from the environment.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.settings.admin.as_ref() else {
        warn!("admin request rejected: credentials not configured");
        return Err(AppError::Unauthorized);
    };

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?;

    let (username, password) = parse_basic(header_value).ok_or(AppError::Unauthorized)?;
    if !credentials_match(expected, &username, &password) {
        warn!(path = %req.uri().path(), "admin request rejected: bad credentials");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}

fn parse_basic(value: &HeaderValue) -> Option<(String, String)> {
    let value = value.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn credentials_match(expected: &AdminCredentials, username: &str, password: &str) -> bool {
    // Both comparisons run so timing does not reveal which half was wrong.
    let user_ok = constant_time_eq(expected.username.as_bytes(), username.as_bytes());
    let pass_ok = constant_time_eq(expected.password.as_bytes(), password.as_bytes());
    user_ok & pass_ok
}
