//! Master data edited through the CMS: stations plus the line, audience,
//! station-type, and ad-product tables they join against.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    CatalogEntry, CatalogKind, ProductChange, ProductDraft, ProductRecord, RateCard,
    StationChange, StationDraft, StationRecord,
};
pub use repository::{
    CatalogRepository, ProductRepository, RepositoryError, StationRepository,
};
pub use router::master_router;
pub use service::{MasterDataService, MasterServiceError};
