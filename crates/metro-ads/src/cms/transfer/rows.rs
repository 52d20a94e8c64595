use serde::{Deserialize, Deserializer};

/// Column order shared by the exporter, the importer, and the template.
pub const SHEET_HEADERS: [&str; 5] = ["Name", "Address", "Lines", "Audiences", "Station Types"];

/// Separator for multi-valued cells, chosen because station and catalog
/// names routinely contain commas.
pub const NAME_SEPARATOR: char = '|';

#[derive(Debug, Deserialize)]
pub(crate) struct StationRow {
    #[serde(rename = "Name", default)]
    pub(crate) name: String,
    #[serde(rename = "Address", default, deserialize_with = "empty_string_as_none")]
    pub(crate) address: Option<String>,
    #[serde(rename = "Lines", default)]
    pub(crate) lines: String,
    #[serde(rename = "Audiences", default)]
    pub(crate) audiences: String,
    #[serde(rename = "Station Types", default)]
    pub(crate) station_types: String,
}

pub(crate) fn join_names(names: &[String]) -> String {
    names.join(&NAME_SEPARATOR.to_string())
}

pub(crate) fn split_names(cell: &str) -> Vec<&str> {
    cell.split(NAME_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
