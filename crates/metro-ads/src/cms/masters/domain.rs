use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The name-only master tables, handled uniformly through one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Line,
    Audience,
    StationType,
}

impl CatalogKind {
    pub const fn label(self) -> &'static str {
        match self {
            CatalogKind::Line => "line",
            CatalogKind::Audience => "audience",
            CatalogKind::StationType => "station type",
        }
    }
}

/// A row in one of the name-only master tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
}

/// Published price for an ad product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCard {
    pub amount: u32,
    /// Billing unit the amount applies to, e.g. "per panel per month".
    pub unit: String,
}

/// An advertising product offered at stations (panel, wrap, digital screen).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub name: String,
    pub format: Option<String>,
    pub rate: Option<RateCard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub rate: Option<RateCard>,
}

/// Partial product update. An omitted field is left unchanged; an explicitly
/// empty `format` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductChange {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub rate: Option<RateCard>,
}

impl ProductChange {
    pub fn apply(self, record: &mut ProductRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(format) = self.format {
            record.format = if format.trim().is_empty() {
                None
            } else {
                Some(format)
            };
        }
        if let Some(rate) = self.rate {
            record.rate = Some(rate);
        }
    }
}

/// A metro station carrying its join-table links as plain id lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: u64,
    pub name: String,
    pub address: Option<String>,
    pub images: Vec<String>,
    pub line_ids: Vec<u64>,
    pub audience_ids: Vec<u64>,
    pub type_ids: Vec<u64>,
    pub product_ids: Vec<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub line_ids: Vec<u64>,
    #[serde(default)]
    pub audience_ids: Vec<u64>,
    #[serde(default)]
    pub type_ids: Vec<u64>,
    #[serde(default)]
    pub product_ids: Vec<u64>,
}

/// Partial station update. An omitted field is left unchanged, an explicitly
/// empty `address` clears it, and a present list replaces the stored list
/// wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationChange {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub line_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub audience_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub type_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub product_ids: Option<Vec<u64>>,
}

impl StationChange {
    pub fn apply(self, record: &mut StationRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(address) = self.address {
            record.address = if address.trim().is_empty() {
                None
            } else {
                Some(address)
            };
        }
        if let Some(images) = self.images {
            record.images = images;
        }
        if let Some(line_ids) = self.line_ids {
            record.line_ids = line_ids;
        }
        if let Some(audience_ids) = self.audience_ids {
            record.audience_ids = audience_ids;
        }
        if let Some(type_ids) = self.type_ids {
            record.type_ids = type_ids;
        }
        if let Some(product_ids) = self.product_ids {
            record.product_ids = product_ids;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> StationRecord {
        StationRecord {
            id: 7,
            name: "Central Plaza".to_string(),
            address: Some("12 Transit Way".to_string()),
            images: vec!["a.jpg".to_string()],
            line_ids: vec![1, 2],
            audience_ids: vec![3],
            type_ids: vec![4],
            product_ids: vec![5],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn omitted_fields_are_untouched() {
        let mut record = station();
        StationChange::default().apply(&mut record);
        assert_eq!(record, station_with_same_timestamp(&record));
    }

    fn station_with_same_timestamp(actual: &StationRecord) -> StationRecord {
        let mut expected = station();
        expected.created_at = actual.created_at;
        expected
    }

    #[test]
    fn empty_address_clears_it() {
        let mut record = station();
        StationChange {
            address: Some(String::new()),
            ..StationChange::default()
        }
        .apply(&mut record);
        assert!(record.address.is_none());
    }

    #[test]
    fn present_lists_replace_wholesale() {
        let mut record = station();
        StationChange {
            line_ids: Some(vec![9]),
            images: Some(Vec::new()),
            ..StationChange::default()
        }
        .apply(&mut record);
        assert_eq!(record.line_ids, vec![9]);
        assert!(record.images.is_empty());
        assert_eq!(record.audience_ids, vec![3]);
    }
}
