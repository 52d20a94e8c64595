use std::sync::Arc;

use super::domain::{
    CatalogEntry, CatalogKind, ProductChange, ProductDraft, ProductRecord, StationChange,
    StationDraft, StationRecord,
};
use super::repository::{
    CatalogRepository, ProductRepository, RepositoryError, StationRepository,
};

/// CRUD facade over the master tables. Validation lives here; uniqueness is
/// enforced by the repositories the way a database constraint would be.
pub struct MasterDataService<S, P, C> {
    stations: Arc<S>,
    products: Arc<P>,
    catalogs: Arc<C>,
}

impl<S, P, C> MasterDataService<S, P, C>
where
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
    C: CatalogRepository + 'static,
{
    pub fn new(stations: Arc<S>, products: Arc<P>, catalogs: Arc<C>) -> Self {
        Self {
            stations,
            products,
            catalogs,
        }
    }

    pub fn create_station(
        &self,
        mut draft: StationDraft,
    ) -> Result<StationRecord, MasterServiceError> {
        draft.name = required_name(&draft.name, "station")?;
        Ok(self.stations.insert(draft)?)
    }

    pub fn update_station(
        &self,
        id: u64,
        mut change: StationChange,
    ) -> Result<StationRecord, MasterServiceError> {
        if let Some(name) = change.name.take() {
            change.name = Some(required_name(&name, "station")?);
        }
        Ok(self.stations.update(id, change)?)
    }

    pub fn station(&self, id: u64) -> Result<StationRecord, MasterServiceError> {
        Ok(self.stations.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    pub fn stations(&self) -> Result<Vec<StationRecord>, MasterServiceError> {
        Ok(self.stations.list()?)
    }

    pub fn delete_station(&self, id: u64) -> Result<(), MasterServiceError> {
        Ok(self.stations.remove(id)?)
    }

    pub fn create_product(
        &self,
        mut draft: ProductDraft,
    ) -> Result<ProductRecord, MasterServiceError> {
        draft.name = required_name(&draft.name, "product")?;
        Ok(self.products.insert(draft)?)
    }

    pub fn update_product(
        &self,
        id: u64,
        mut change: ProductChange,
    ) -> Result<ProductRecord, MasterServiceError> {
        if let Some(name) = change.name.take() {
            change.name = Some(required_name(&name, "product")?);
        }
        Ok(self.products.update(id, change)?)
    }

    pub fn product(&self, id: u64) -> Result<ProductRecord, MasterServiceError> {
        Ok(self.products.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    pub fn products(&self) -> Result<Vec<ProductRecord>, MasterServiceError> {
        Ok(self.products.list()?)
    }

    /// Deleting a product also prunes it from station join lists. Lead
    /// snapshots keep the copied name they were written with.
    pub fn delete_product(&self, id: u64) -> Result<(), MasterServiceError> {
        self.products.remove(id)?;
        self.stations.unlink_product(id)?;
        Ok(())
    }

    pub fn create_entry(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> Result<CatalogEntry, MasterServiceError> {
        let name = required_name(name, kind.label())?;
        Ok(self.catalogs.insert(kind, &name)?)
    }

    pub fn rename_entry(
        &self,
        kind: CatalogKind,
        id: u64,
        name: &str,
    ) -> Result<CatalogEntry, MasterServiceError> {
        let name = required_name(name, kind.label())?;
        Ok(self.catalogs.rename(kind, id, &name)?)
    }

    pub fn entry(&self, kind: CatalogKind, id: u64) -> Result<CatalogEntry, MasterServiceError> {
        Ok(self
            .catalogs
            .fetch(kind, id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    pub fn entries(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, MasterServiceError> {
        Ok(self.catalogs.list(kind)?)
    }

    pub fn delete_entry(&self, kind: CatalogKind, id: u64) -> Result<(), MasterServiceError> {
        self.catalogs.remove(kind, id)?;
        self.stations.unlink_catalog(kind, id)?;
        Ok(())
    }
}

fn required_name(raw: &str, table: &str) -> Result<String, MasterServiceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MasterServiceError::Validation(format!(
            "{table} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Error raised by the master-data service.
#[derive(Debug, thiserror::Error)]
pub enum MasterServiceError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
