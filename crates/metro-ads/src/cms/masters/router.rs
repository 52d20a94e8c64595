use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    CatalogKind, ProductChange, ProductDraft, StationChange, StationDraft,
};
use super::repository::{CatalogRepository, ProductRepository, RepositoryError, StationRepository};
use super::service::{MasterDataService, MasterServiceError};

type Service<S, P, C> = Arc<MasterDataService<S, P, C>>;

/// Router builder exposing the master-data CRUD endpoints.
pub fn master_router<S, P, C>(service: Service<S, P, C>) -> Router
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/stations",
            get(list_stations::<S, P, C>).post(create_station::<S, P, C>),
        )
        .route(
            "/api/v1/stations/:id",
            get(station_detail::<S, P, C>)
                .put(update_station::<S, P, C>)
                .delete(delete_station::<S, P, C>),
        )
        .route(
            "/api/v1/products",
            get(list_products::<S, P, C>).post(create_product::<S, P, C>),
        )
        .route(
            "/api/v1/products/:id",
            get(product_detail::<S, P, C>)
                .put(update_product::<S, P, C>)
                .delete(delete_product::<S, P, C>),
        )
        .route(
            "/api/v1/lines",
            get(list_lines::<S, P, C>).post(create_line::<S, P, C>),
        )
        .route(
            "/api/v1/lines/:id",
            get(line_detail::<S, P, C>)
                .put(rename_line::<S, P, C>)
                .delete(delete_line::<S, P, C>),
        )
        .route(
            "/api/v1/audiences",
            get(list_audiences::<S, P, C>).post(create_audience::<S, P, C>),
        )
        .route(
            "/api/v1/audiences/:id",
            get(audience_detail::<S, P, C>)
                .put(rename_audience::<S, P, C>)
                .delete(delete_audience::<S, P, C>),
        )
        .route(
            "/api/v1/types",
            get(list_types::<S, P, C>).post(create_type::<S, P, C>),
        )
        .route(
            "/api/v1/types/:id",
            get(type_detail::<S, P, C>)
                .put(rename_type::<S, P, C>)
                .delete(delete_type::<S, P, C>),
        )
        .with_state(service)
}

/// Single conversion point from service errors to the endpoint taxonomy.
pub(crate) fn master_error(err: MasterServiceError) -> Response {
    match err {
        MasterServiceError::Validation(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": message })),
        )
            .into_response(),
        MasterServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "name already exists" })),
        )
            .into_response(),
        MasterServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "record not found" })),
        )
            .into_response(),
        MasterServiceError::Repository(RepositoryError::Unavailable(detail)) => {
            tracing::error!(%detail, "master data store unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "storage unavailable" })),
            )
                .into_response()
        }
    }
}

fn deleted() -> Response {
    (StatusCode::OK, Json(json!({ "success": true }))).into_response()
}

async fn list_stations<S, P, C>(State(service): State<Service<S, P, C>>) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.stations() {
        Ok(stations) => (StatusCode::OK, Json(stations)).into_response(),
        Err(err) => master_error(err),
    }
}

async fn create_station<S, P, C>(
    State(service): State<Service<S, P, C>>,
    Json(draft): Json<StationDraft>,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.create_station(draft) {
        Ok(station) => (StatusCode::CREATED, Json(station)).into_response(),
        Err(err) => master_error(err),
    }
}

async fn station_detail<S, P, C>(
    State(service): State<Service<S, P, C>>,
    Path(id): Path<u64>,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.station(id) {
        Ok(station) => (StatusCode::OK, Json(station)).into_response(),
        Err(err) => master_error(err),
    }
}

async fn update_station<S, P, C>(
    State(service): State<Service<S, P, C>>,
    Path(id): Path<u64>,
    Json(change): Json<StationChange>,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.update_station(id, change) {
        Ok(station) => (StatusCode::OK, Json(station)).into_response(),
        Err(err) => master_error(err),
    }
}

async fn delete_station<S, P, C>(
    State(service): State<Service<S, P, C>>,
    Path(id): Path<u64>,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.delete_station(id) {
        Ok(()) => deleted(),
        Err(err) => master_error(err),
    }
}

async fn list_products<S, P, C>(State(service): State<Service<S, P, C>>) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.products() {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(err) => master_error(err),
    }
}

async fn create_product<S, P, C>(
    State(service): State<Service<S, P, C>>,
    Json(draft): Json<ProductDraft>,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.create_product(draft) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(err) => master_error(err),
    }
}

async fn product_detail<S, P, C>(
    State(service): State<Service<S, P, C>>,
    Path(id): Path<u64>,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.product(id) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(err) => master_error(err),
    }
}

async fn update_product<S, P, C>(
    State(service): State<Service<S, P, C>>,
    Path(id): Path<u64>,
    Json(change): Json<ProductChange>,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.update_product(id, change) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(err) => master_error(err),
    }
}

async fn delete_product<S, P, C>(
    State(service): State<Service<S, P, C>>,
    Path(id): Path<u64>,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.delete_product(id) {
        Ok(()) => deleted(),
        Err(err) => master_error(err),
    }
}

#[derive(Debug, Deserialize)]
struct CatalogNameRequest {
    #[serde(default)]
    name: String,
}

fn catalog_list<S, P, C>(service: &MasterDataService<S, P, C>, kind: CatalogKind) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.entries(kind) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => master_error(err),
    }
}

fn catalog_create<S, P, C>(
    service: &MasterDataService<S, P, C>,
    kind: CatalogKind,
    name: &str,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.create_entry(kind, name) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => master_error(err),
    }
}

fn catalog_detail<S, P, C>(
    service: &MasterDataService<S, P, C>,
    kind: CatalogKind,
    id: u64,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.entry(kind, id) {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(err) => master_error(err),
    }
}

fn catalog_rename<S, P, C>(
    service: &MasterDataService<S, P, C>,
    kind: CatalogKind,
    id: u64,
    name: &str,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.rename_entry(kind, id, name) {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(err) => master_error(err),
    }
}

fn catalog_delete<S, P, C>(
    service: &MasterDataService<S, P, C>,
    kind: CatalogKind,
    id: u64,
) -> Response
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    match service.delete_entry(kind, id) {
        Ok(()) => deleted(),
        Err(err) => master_error(err),
    }
}

macro_rules! catalog_handlers {
    ($kind:expr, $list:ident, $create:ident, $detail:ident, $rename:ident, $delete:ident) => {
        async fn $list<S, P, C>(State(service): State<Service<S, P, C>>) -> Response
        where
            S: StationRepository + 'static,
            P: ProductRepository + 'static,
            C: CatalogRepository + 'static,
        {
            catalog_list(&service, $kind)
        }

        async fn $create<S, P, C>(
            State(service): State<Service<S, P, C>>,
            Json(request): Json<CatalogNameRequest>,
        ) -> Response
        where
            S: StationRepository + 'static,
            P: ProductRepository + 'static,
            C: CatalogRepository + 'static,
        {
            catalog_create(&service, $kind, &request.name)
        }

        async fn $detail<S, P, C>(
            State(service): State<Service<S, P, C>>,
            Path(id): Path<u64>,
        ) -> Response
        where
            S: StationRepository + 'static,
            P: ProductRepository + 'static,
            C: CatalogRepository + 'static,
        {
            catalog_detail(&service, $kind, id)
        }

        async fn $rename<S, P, C>(
            State(service): State<Service<S, P, C>>,
            Path(id): Path<u64>,
            Json(request): Json<CatalogNameRequest>,
        ) -> Response
        where
            S: StationRepository + 'static,
            P: ProductRepository + 'static,
            C: CatalogRepository + 'static,
        {
            catalog_rename(&service, $kind, id, &request.name)
        }

        async fn $delete<S, P, C>(
            State(service): State<Service<S, P, C>>,
            Path(id): Path<u64>,
        ) -> Response
        where
            S: StationRepository + 'static,
            P: ProductRepository + 'static,
            C: CatalogRepository + 'static,
        {
            catalog_delete(&service, $kind, id)
        }
    };
}

catalog_handlers!(
    CatalogKind::Line,
    list_lines,
    create_line,
    line_detail,
    rename_line,
    delete_line
);
catalog_handlers!(
    CatalogKind::Audience,
    list_audiences,
    create_audience,
    audience_detail,
    rename_audience,
    delete_audience
);
catalog_handlers!(
    CatalogKind::StationType,
    list_types,
    create_type,
    type_detail,
    rename_type,
    delete_type
);
