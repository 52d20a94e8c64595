use super::rows::{join_names, SHEET_HEADERS};
use super::{StationTransfer, TransferError};
use crate::cms::masters::{CatalogKind, CatalogRepository, StationRepository};

impl<S, C> StationTransfer<S, C>
where
    S: StationRepository + 'static,
    C: CatalogRepository + 'static,
{
    /// Serialize every station with its joined line/audience/type names.
    pub fn export_csv(&self) -> Result<Vec<u8>, TransferError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(SHEET_HEADERS)?;

        for station in self.stations.list()? {
            let lines = join_names(&self.resolve_names(CatalogKind::Line, &station.line_ids)?);
            let audiences =
                join_names(&self.resolve_names(CatalogKind::Audience, &station.audience_ids)?);
            let types =
                join_names(&self.resolve_names(CatalogKind::StationType, &station.type_ids)?);
            writer.write_record([
                station.name.as_str(),
                station.address.as_deref().unwrap_or(""),
                lines.as_str(),
                audiences.as_str(),
                types.as_str(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|err| TransferError::Buffer(err.to_string()))
    }

    /// Template whose header matches the importer and whose guidance row
    /// references the catalog names currently on file, so an operator sees
    /// exactly which values the import will accept.
    pub fn template_csv(&self) -> Result<Vec<u8>, TransferError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(SHEET_HEADERS)?;

        writer.write_record([
            "Example Station".to_string(),
            "1 Example Road".to_string(),
            self.catalog_guidance(CatalogKind::Line, "Red Line")?,
            self.catalog_guidance(CatalogKind::Audience, "Commuters")?,
            self.catalog_guidance(CatalogKind::StationType, "Interchange")?,
        ])?;

        writer
            .into_inner()
            .map_err(|err| TransferError::Buffer(err.to_string()))
    }

    fn resolve_names(
        &self,
        kind: CatalogKind,
        ids: &[u64],
    ) -> Result<Vec<String>, TransferError> {
        let mut names = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entry) = self.catalogs.fetch(kind, *id)? {
                names.push(entry.name);
            }
        }
        Ok(names)
    }

    fn catalog_guidance(
        &self,
        kind: CatalogKind,
        placeholder: &str,
    ) -> Result<String, TransferError> {
        let names: Vec<String> = self
            .catalogs
            .list(kind)?
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        if names.is_empty() {
            return Ok(placeholder.to_string());
        }
        Ok(join_names(&names))
    }
}
