//! Middleware: session extraction and security headers.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::Serialize;
use snapsync_common::error::SnapError;
use std::sync::Arc;

use crate::{auth, AppState};

/// The authenticated admin, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub username: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Reject requests without a valid session.
///
/// The token is read from `Authorization: Bearer <token>` first, then from the session cookie.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, SnapError> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned);

    let token = bearer
        .or_else(|| jar.get(auth::SESSION_COOKIE).map(|c| c.value().to_owned()))
        .ok_or(SnapError::Unauthorized)?;

    let claims = auth::validate_session_token(&token, &state.config.auth.jwt_secret)
        .map_err(|_| SnapError::Unauthorized)?;

    // A token minted for a since-renamed admin account is stale.
    if claims.sub != state.config.auth.admin_username {
        return Err(SnapError::Unauthorized);
    }

    request.extensions_mut().insert(AdminSession {
        expires_at: claims.expires_at(),
        username: claims.sub,
    });

    Ok(next.run(request).await)
}

// ── Security headers ──────────────────────────────────────────────────────────

/// Add security headers to every HTTP response.
///
/// Headers applied:
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Content-Security-Policy`: API responses are data, never documents
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let h = response.headers_mut();

    h.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    h.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );
    h.insert(
        header::REFERRER_POLICY,
        header::HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    h.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );

    response
}
