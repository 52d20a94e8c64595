use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::{StationTransfer, TransferError};
use crate::cms::masters::{CatalogRepository, StationRepository};

/// Router builder for the spreadsheet endpoints.
pub fn transfer_router<S, C>(transfer: Arc<StationTransfer<S, C>>) -> Router
where
    S: StationRepository + 'static,
    C: CatalogRepository + 'static,
{
    Router::new()
        .route("/api/v1/stations/export", get(export_handler::<S, C>))
        .route("/api/v1/stations/import", post(import_handler::<S, C>))
        .route("/api/v1/stations/template", get(template_handler::<S, C>))
        .with_state(transfer)
}

async fn export_handler<S, C>(State(transfer): State<Arc<StationTransfer<S, C>>>) -> Response
where
    S: StationRepository + 'static,
    C: CatalogRepository + 'static,
{
    match transfer.export_csv() {
        Ok(bytes) => csv_download("stations.csv", bytes),
        Err(err) => transfer_error(err),
    }
}

async fn template_handler<S, C>(State(transfer): State<Arc<StationTransfer<S, C>>>) -> Response
where
    S: StationRepository + 'static,
    C: CatalogRepository + 'static,
{
    match transfer.template_csv() {
        Ok(bytes) => csv_download("stations-template.csv", bytes),
        Err(err) => transfer_error(err),
    }
}

async fn import_handler<S, C>(
    State(transfer): State<Arc<StationTransfer<S, C>>>,
    mut multipart: Multipart,
) -> Response
where
    S: StationRepository + 'static,
    C: CatalogRepository + 'static,
{
    let upload = loop {
        match multipart.next_field().await {
            Ok(Some(field)) => match field.bytes().await {
                Ok(bytes) => break Some(bytes),
                Err(err) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": format!("unreadable upload: {err}") })),
                    )
                        .into_response();
                }
            },
            Ok(None) => break None,
            Err(err) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("malformed multipart body: {err}") })),
                )
                    .into_response();
            }
        }
    };

    let Some(bytes) = upload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing file upload" })),
        )
            .into_response();
    };

    match transfer.import_csv(Cursor::new(bytes)) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => transfer_error(err),
    }
}

fn csv_download(filename: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn transfer_error(err: TransferError) -> Response {
    tracing::error!(error = %err, "spreadsheet operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "spreadsheet operation failed" })),
    )
        .into_response()
}
