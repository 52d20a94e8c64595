use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::infra::AppState;
use metro_ads::cms::leads::{
    contact_router, lead_router, ContactRepository, ContactService, LeadIntakeService,
    LeadRepository,
};
use metro_ads::cms::masters::{
    master_router, CatalogRepository, MasterDataService, ProductRepository, StationRepository,
};
use metro_ads::cms::session::{self, require_session, session_router};
use metro_ads::cms::transfer::{transfer_router, StationTransfer};
use metro_ads::config::SessionConfig;

/// Assemble the full application router from the already-wired services.
pub(crate) fn build<S, P, C, L, T>(
    state: AppState,
    masters: Arc<MasterDataService<S, P, C>>,
    transfer: Arc<StationTransfer<S, C>>,
    intake: Arc<LeadIntakeService<L, S, P>>,
    contacts: Arc<ContactService<T>>,
    session_config: Arc<SessionConfig>,
) -> Router
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
    L: LeadRepository + 'static,
    T: ContactRepository + 'static,
{
    master_router(masters)
        .merge(transfer_router(transfer))
        .merge(lead_router(intake))
        .merge(contact_router(contacts))
        .merge(session_router(session_config))
        .merge(cms_pages())
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(state))
}

/// CMS page shells. Everything under `/cms` is gated on the session cookie
/// except the login page, which redirects cookie holders back in.
fn cms_pages() -> Router {
    let gated = Router::new()
        .route(session::CMS_HOME_PATH, get(cms_home))
        .route("/cms/*section", get(cms_home))
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .merge(gated)
        .route(session::LOGIN_PATH, get(login_page))
}

const CMS_SHELL: &str = "<!doctype html>\
<html><head><title>Metro Ads CMS</title></head>\
<body><div id=\"cms-root\" data-app=\"metro-ads-cms\"></div></body></html>";

const LOGIN_SHELL: &str = "<!doctype html>\
<html><head><title>Metro Ads CMS - Sign in</title></head>\
<body><div id=\"cms-login\" data-app=\"metro-ads-cms\"></div></body></html>";

async fn cms_home() -> Html<&'static str> {
    Html(CMS_SHELL)
}

async fn login_page(jar: CookieJar) -> Response {
    if session::holds_session(&jar) {
        Redirect::to(session::CMS_HOME_PATH).into_response()
    } else {
        Html(LOGIN_SHELL).into_response()
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
