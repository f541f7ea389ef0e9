//! Auth routes: dashboard login, logout, and session lookup.

use axum::{
    extract::{Extension, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use snapsync_common::{
    error::{SnapError, SnapResult},
    models::SuccessResponse,
};
use std::sync::Arc;

use crate::{
    auth::{self, SessionToken, SESSION_COOKIE},
    extract::ApiJson,
    middleware::AdminSession,
    AppState,
};

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let session = Router::new()
        .route("/auth/session", get(get_session))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::require_session,
        ));

    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .merge(session)
}

/// POST /api/auth/login: Exchange the admin credentials for a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginRequest>,
) -> SnapResult<(CookieJar, Json<SessionToken>)> {
    let auth_config = &state.config.auth;
    if !auth::check_credentials(auth_config, &body.username, &body.password) {
        tracing::warn!(username = %body.username, "Rejected dashboard login");
        return Err(SnapError::InvalidCredentials);
    }

    let session = auth::issue_session_token(
        &auth_config.admin_username,
        &auth_config.jwt_secret,
        auth_config.session_ttl_secs,
    )
    .map_err(|e| SnapError::Internal(e.into()))?;

    let cookie = Cookie::build((SESSION_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();

    tracing::info!(username = %auth_config.admin_username, "Dashboard login");
    Ok((jar.add(cookie), Json(session)))
}

/// POST /api/auth/logout: Drop the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, Json(SuccessResponse::OK))
}

/// GET /api/auth/session: Who is logged in, and until when.
async fn get_session(Extension(session): Extension<AdminSession>) -> Json<AdminSession> {
    Json(session)
}
