// src/marker/mod.rs
use serde::{Deserialize, Serialize};

/// Prefix joined with the trimmed atlas number to form `MarkerRecord::id`.
pub const ID_PREFIX: &str = "tx-thc-";
pub const STATE: &str = "TX";
pub const MARKER_TYPE: &str = "state marker (TX)";
pub const CONFIDENCE: f64 = 0.9;
pub const SOURCE_NAME: &str = "Texas Historical Commission";
pub const SOURCE_URL: &str = "https://atlas.thc.texas.gov/Data/DataDownload";

/// One normalized historical marker.
///
/// Field order here is the field order in the JSON output; serde keeps
/// struct declaration order, so reordering fields changes the output bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Year the marker was erected, exactly as it appeared in the extract.
    pub date_installed: String,
    pub coordinates: Coordinates,
    pub address: Address,
    pub images: Vec<String>,
    pub source: Vec<SourceRef>,
    #[serde(rename = "type")]
    pub marker_type: String,
    pub tags: Vec<String>,
    pub confidence: f64,
}

/// `None` serializes as `null`; the keys are always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub county: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    pub url: String,
    /// Raw atlas number, untrimmed.
    pub source_id: String,
}

/// Raw column values of one CSV row, before normalization.
#[derive(Debug, Default, Clone)]
pub struct MarkerRow<'a> {
    pub atlas_number: &'a str,
    pub title: &'a str,
    pub text: &'a str,
    pub year_erected: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: &'a str,
    pub county: &'a str,
}

impl MarkerRecord {
    /// Build the output record for one row. Only the atlas number, title and
    /// text are trimmed; everything else passes through as read.
    pub fn from_row(row: &MarkerRow<'_>) -> Self {
        Self {
            id: format!("{}{}", ID_PREFIX, row.atlas_number.trim()),
            title: row.title.trim().to_string(),
            description: row.text.trim().to_string(),
            date_installed: row.year_erected.to_string(),
            coordinates: Coordinates {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            address: Address {
                city: row.city.to_string(),
                county: row.county.to_string(),
                state: STATE.to_string(),
            },
            images: Vec::new(),
            source: vec![SourceRef {
                name: SOURCE_NAME.to_string(),
                url: SOURCE_URL.to_string(),
                source_id: row.atlas_number.to_string(),
            }],
            marker_type: MARKER_TYPE.to_string(),
            tags: Vec::new(),
            confidence: CONFIDENCE,
        }
    }
}
