use super::domain::{
    CatalogEntry, CatalogKind, ProductChange, ProductDraft, ProductRecord, StationChange,
    StationDraft, StationRecord,
};

/// Error enumeration for storage failures, shared by every repository trait
/// in the CMS.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for stations. Implementations assign ids, stamp
/// creation times, and enforce name uniqueness; `update` must apply the
/// whole change under one guard so a relation replace is all-or-nothing.
pub trait StationRepository: Send + Sync {
    fn insert(&self, draft: StationDraft) -> Result<StationRecord, RepositoryError>;
    fn update(&self, id: u64, change: StationChange) -> Result<StationRecord, RepositoryError>;
    fn fetch(&self, id: u64) -> Result<Option<StationRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<StationRecord>, RepositoryError>;
    fn remove(&self, id: u64) -> Result<(), RepositoryError>;
    /// Drop a deleted product from every station's join list.
    fn unlink_product(&self, product_id: u64) -> Result<(), RepositoryError>;
    /// Drop a deleted catalog row from every station's join list.
    fn unlink_catalog(&self, kind: CatalogKind, entry_id: u64) -> Result<(), RepositoryError>;
}

/// Storage abstraction for ad products.
pub trait ProductRepository: Send + Sync {
    fn insert(&self, draft: ProductDraft) -> Result<ProductRecord, RepositoryError>;
    fn update(&self, id: u64, change: ProductChange) -> Result<ProductRecord, RepositoryError>;
    fn fetch(&self, id: u64) -> Result<Option<ProductRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ProductRecord>, RepositoryError>;
    fn remove(&self, id: u64) -> Result<(), RepositoryError>;
}

/// Storage abstraction for the name-only master tables (lines, audiences,
/// station types), keyed by [`CatalogKind`]. Name uniqueness is per table.
pub trait CatalogRepository: Send + Sync {
    fn insert(&self, kind: CatalogKind, name: &str) -> Result<CatalogEntry, RepositoryError>;
    fn rename(&self, kind: CatalogKind, id: u64, name: &str)
        -> Result<CatalogEntry, RepositoryError>;
    fn fetch(&self, kind: CatalogKind, id: u64) -> Result<Option<CatalogEntry>, RepositoryError>;
    fn find_by_name(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> Result<Option<CatalogEntry>, RepositoryError>;
    fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, RepositoryError>;
    fn remove(&self, kind: CatalogKind, id: u64) -> Result<(), RepositoryError>;
}
