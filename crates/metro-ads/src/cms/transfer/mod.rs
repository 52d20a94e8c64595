//! Spreadsheet surface for station master data: CSV export, capped
//! row-by-row import, and the import template.

pub mod export;
pub mod import;
pub mod router;
pub mod rows;

pub use import::{ImportOutcome, RowFailure, IMPORT_ROW_CAP};
pub use router::transfer_router;
pub use rows::{NAME_SEPARATOR, SHEET_HEADERS};

use std::sync::Arc;

use crate::cms::masters::{CatalogRepository, RepositoryError, StationRepository};

/// Error raised while reading or writing station spreadsheets.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("station name missing")]
    MissingName,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("spreadsheet buffer error: {0}")]
    Buffer(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Orchestrates the spreadsheet endpoints over the station and catalog
/// stores.
pub struct StationTransfer<S, C> {
    pub(crate) stations: Arc<S>,
    pub(crate) catalogs: Arc<C>,
}

impl<S, C> StationTransfer<S, C>
where
    S: StationRepository + 'static,
    C: CatalogRepository + 'static,
{
    pub fn new(stations: Arc<S>, catalogs: Arc<C>) -> Self {
        Self { stations, catalogs }
    }
}
