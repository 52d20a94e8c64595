//! The cookie-presence gate: login issues the cookie, CMS paths bounce
//! cookie-less requests to the login page, and the login page bounces
//! cookie holders back.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::middleware;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tower::ServiceExt;

use common::request_json;
use metro_ads::cms::session::{
    holds_session, require_session, session_router, CMS_HOME_PATH, LOGIN_PATH, SESSION_COOKIE,
};
use metro_ads::config::SessionConfig;

fn settings() -> Arc<SessionConfig> {
    Arc::new(SessionConfig {
        username: "admin".to_string(),
        password: "s3cret".to_string(),
    })
}

async fn login_page(jar: CookieJar) -> Response {
    if holds_session(&jar) {
        Redirect::to(CMS_HOME_PATH).into_response()
    } else {
        Html("login").into_response()
    }
}

fn app() -> Router {
    let gated = Router::new()
        .route(CMS_HOME_PATH, get(|| async { Html("cms") }))
        .route("/cms/stations", get(|| async { Html("cms") }))
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .merge(gated)
        .route(LOGIN_PATH, get(login_page))
        .merge(session_router(settings()))
}

async fn get_with_cookie(router: Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = cookie {
        builder = builder.header(header::COOKIE, value);
    }
    router
        .oneshot(builder.body(Body::empty()).expect("request"))
        .await
        .expect("dispatch")
}

#[tokio::test]
async fn cms_paths_redirect_to_login_without_the_cookie() {
    for uri in [CMS_HOME_PATH, "/cms/stations"] {
        let response = get_with_cookie(app(), uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some(LOGIN_PATH),
        );
    }
}

#[tokio::test]
async fn cms_paths_pass_with_the_cookie_present() {
    let response =
        get_with_cookie(app(), CMS_HOME_PATH, Some("cms_session=admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_page_redirects_cookie_holders_back_to_the_cms() {
    let response = get_with_cookie(app(), LOGIN_PATH, Some("cms_session=admin")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some(CMS_HOME_PATH),
    );

    let response = get_with_cookie(app(), LOGIN_PATH, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn successful_login_sets_the_http_only_session_cookie() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/session")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({ "username": "admin", "password": "s3cret" }))
                .expect("body"),
        ))
        .expect("request");
    let response = app().oneshot(request).await.expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie set");
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=admin")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized_and_set_no_cookie() {
    let (status, payload) = request_json(
        app(),
        "POST",
        "/api/v1/session",
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(payload, json!({ "error": "invalid credentials" }));
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/v1/session")
        .header(header::COOKIE, "cms_session=admin")
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("removal cookie set");
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(cookie.contains("Max-Age=0"));
}
