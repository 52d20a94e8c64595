use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::{ContactSubmission, LeadSubmission};
use super::repository::{ContactRepository, LeadRepository};
use super::service::{ContactService, LeadIntakeService, LeadServiceError};
use crate::cms::masters::{ProductRepository, RepositoryError, StationRepository};

/// Router builder exposing the public submission endpoint plus the CMS-side
/// list/detail/delete operations.
pub fn lead_router<L, S, P>(service: Arc<LeadIntakeService<L, S, P>>) -> Router
where
    L: LeadRepository + 'static,
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/leads",
            get(list_leads::<L, S, P>).post(submit_lead::<L, S, P>),
        )
        .route(
            "/api/v1/leads/:id",
            get(lead_detail::<L, S, P>).delete(delete_lead::<L, S, P>),
        )
        .with_state(service)
}

async fn submit_lead<L, S, P>(
    State(service): State<Arc<LeadIntakeService<L, S, P>>>,
    Json(submission): Json<LeadSubmission>,
) -> Response
where
    L: LeadRepository + 'static,
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
{
    match service.submit(submission) {
        Ok(outcome) => {
            let id = outcome.record.id;
            // The response is already determined; everything from here on is
            // best effort.
            service.notify_detached(outcome);
            (
                StatusCode::CREATED,
                Json(json!({ "success": true, "id": id })),
            )
                .into_response()
        }
        Err(err) => lead_error(err),
    }
}

async fn list_leads<L, S, P>(State(service): State<Arc<LeadIntakeService<L, S, P>>>) -> Response
where
    L: LeadRepository + 'static,
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
{
    match service.leads() {
        Ok(leads) => (StatusCode::OK, Json(leads)).into_response(),
        Err(err) => lead_error(err),
    }
}

async fn lead_detail<L, S, P>(
    State(service): State<Arc<LeadIntakeService<L, S, P>>>,
    Path(id): Path<u64>,
) -> Response
where
    L: LeadRepository + 'static,
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
{
    match service.lead(id) {
        Ok(lead) => (StatusCode::OK, Json(lead)).into_response(),
        Err(err) => lead_error(err),
    }
}

async fn delete_lead<L, S, P>(
    State(service): State<Arc<LeadIntakeService<L, S, P>>>,
    Path(id): Path<u64>,
) -> Response
where
    L: LeadRepository + 'static,
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
{
    match service.delete_lead(id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => lead_error(err),
    }
}

fn lead_error(err: LeadServiceError) -> Response {
    match err {
        LeadServiceError::Validation(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": message })),
        )
            .into_response(),
        LeadServiceError::StationNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("station {id} not found") })),
        )
            .into_response(),
        LeadServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "record not found" })),
        )
            .into_response(),
        LeadServiceError::Repository(err) => {
            tracing::error!(error = %err, "lead store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "inquiry could not be recorded" })),
            )
                .into_response()
        }
    }
}

/// Router builder for plain contact-form messages.
pub fn contact_router<C>(service: Arc<ContactService<C>>) -> Router
where
    C: ContactRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/contacts",
            get(list_contacts::<C>).post(submit_contact::<C>),
        )
        .route("/api/v1/contacts/:id", axum::routing::delete(delete_contact::<C>))
        .with_state(service)
}

async fn submit_contact<C>(
    State(service): State<Arc<ContactService<C>>>,
    Json(submission): Json<ContactSubmission>,
) -> Response
where
    C: ContactRepository + 'static,
{
    match service.submit(submission) {
        Ok(record) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "id": record.id })),
        )
            .into_response(),
        Err(err) => lead_error(err),
    }
}

async fn list_contacts<C>(State(service): State<Arc<ContactService<C>>>) -> Response
where
    C: ContactRepository + 'static,
{
    match service.list() {
        Ok(contacts) => (StatusCode::OK, Json(contacts)).into_response(),
        Err(err) => lead_error(err),
    }
}

async fn delete_contact<C>(
    State(service): State<Arc<ContactService<C>>>,
    Path(id): Path<u64>,
) -> Response
where
    C: ContactRepository + 'static,
{
    match service.delete(id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => lead_error(err),
    }
}
