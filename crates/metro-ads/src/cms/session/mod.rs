//! Cookie-presence gate for the CMS plus the login/logout endpoints. This is
//! a capability check, not an authorization model: one configured account,
//! no roles, no server-side session state.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;

use crate::config::SessionConfig;

pub const SESSION_COOKIE: &str = "cms_session";
pub const LOGIN_PATH: &str = "/cms/login";
pub const CMS_HOME_PATH: &str = "/cms";

const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Router builder for session establishment and teardown.
pub fn session_router(settings: Arc<SessionConfig>) -> Router {
    Router::new()
        .route("/api/v1/session", post(login).delete(logout))
        .with_state(settings)
}

async fn login(
    State(settings): State<Arc<SessionConfig>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Response {
    if request.username != settings.username || request.password != settings.password {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid credentials" })),
        )
            .into_response();
    }

    let cookie = Cookie::build((SESSION_COOKIE, settings.username.clone()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build();

    (
        StatusCode::OK,
        jar.add(cookie),
        Json(json!({ "success": true })),
    )
        .into_response()
}

async fn logout(jar: CookieJar) -> Response {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        StatusCode::OK,
        jar.remove(removal),
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Gate for CMS page routes: no cookie, no entry.
pub async fn require_session(jar: CookieJar, request: Request, next: Next) -> Response {
    if jar.get(SESSION_COOKIE).is_some() {
        next.run(request).await
    } else {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

/// The login page is the one CMS path that flips the check: an operator who
/// already holds the cookie is sent back to the CMS.
pub fn holds_session(jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE).is_some()
}
