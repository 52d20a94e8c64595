use std::io::Read;

use serde::Serialize;

use super::rows::{split_names, StationRow};
use super::{StationTransfer, TransferError};
use crate::cms::masters::{
    CatalogKind, CatalogRepository, StationDraft, StationRepository,
};

/// Upper bound on rows read from one upload.
pub const IMPORT_ROW_CAP: usize = 500;

/// Tally of one import run. Rows are attempted independently, so a failure
/// never aborts the batch.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ImportOutcome {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<RowFailure>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based spreadsheet row number (the header is row 1).
    pub row: usize,
    pub reason: String,
}

impl<S, C> StationTransfer<S, C>
where
    S: StationRepository + 'static,
    C: CatalogRepository + 'static,
{
    pub fn import_csv<R: Read>(&self, reader: R) -> Result<ImportOutcome, TransferError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (index, parsed) in csv_reader.deserialize::<StationRow>().enumerate() {
            if rows.len() == IMPORT_ROW_CAP {
                skipped += 1;
                continue;
            }
            rows.push((index + 2, parsed));
        }
        if skipped > 0 {
            tracing::warn!(cap = IMPORT_ROW_CAP, skipped, "import cap reached, trailing rows ignored");
        }

        let outcome = rows
            .into_iter()
            .fold(ImportOutcome::default(), |mut outcome, (row, parsed)| {
                let attempt = parsed
                    .map_err(TransferError::from)
                    .and_then(|record| self.import_row(record));
                match attempt {
                    Ok(()) => outcome.success += 1,
                    Err(err) => {
                        outcome.failed += 1;
                        outcome.errors.push(RowFailure {
                            row,
                            reason: err.to_string(),
                        });
                    }
                }
                outcome
            });

        Ok(outcome)
    }

    fn import_row(&self, row: StationRow) -> Result<(), TransferError> {
        if row.name.is_empty() {
            return Err(TransferError::MissingName);
        }

        let line_ids = self.link_names(CatalogKind::Line, &row.lines)?;
        let audience_ids = self.link_names(CatalogKind::Audience, &row.audiences)?;
        let type_ids = self.link_names(CatalogKind::StationType, &row.station_types)?;

        self.stations.insert(StationDraft {
            name: row.name,
            address: row.address,
            images: Vec::new(),
            line_ids,
            audience_ids,
            type_ids,
            product_ids: Vec::new(),
        })?;

        Ok(())
    }

    /// Find-or-create keeps each row self-contained: a row referencing a new
    /// line name succeeds on its own, and re-importing the same sheet links
    /// against the rows created the first time around.
    fn link_names(&self, kind: CatalogKind, cell: &str) -> Result<Vec<u64>, TransferError> {
        split_names(cell)
            .into_iter()
            .map(|name| match self.catalogs.find_by_name(kind, name)? {
                Some(entry) => Ok(entry.id),
                None => Ok(self.catalogs.insert(kind, name)?.id),
            })
            .collect()
    }
}
