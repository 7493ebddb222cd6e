use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::{output, process};

pub const INPUT_FILE: &str = "Historical Marker_20251112_113626_6777607.csv";
pub const JSON_FILE: &str = "tx_historical_markers.json";
pub const GZIP_FILE: &str = "tx_historical_markers.json.gz";

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertPaths {
    pub input: PathBuf,
    pub json: PathBuf,
    pub gzip: PathBuf,
}

impl Default for ConvertPaths {
    /// The fixed file names, relative to the working directory.
    fn default() -> Self {
        Self {
            input: PathBuf::from(INPUT_FILE),
            json: PathBuf::from(JSON_FILE),
            gzip: PathBuf::from(GZIP_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSummary {
    pub json: PathBuf,
    pub gzip: PathBuf,
    pub count: usize,
}

impl std::fmt::Display for ConvertSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wrote {} markers to {} and {}",
            self.count,
            self.json.display(),
            self.gzip.display()
        )
    }
}

/// Read every row, then write both outputs. Nothing is written unless the
/// whole input mapped cleanly.
#[tracing::instrument(level = "info", skip_all, fields(input = %paths.input.display()))]
pub fn convert(paths: &ConvertPaths) -> Result<ConvertSummary> {
    let markers = process::load_markers(&paths.input)?;
    info!(count = markers.len(), "loaded markers");

    output::write_json(&paths.json, &markers)?;
    output::write_gzip_json(&paths.gzip, &markers)?;

    Ok(ConvertSummary {
        json: paths.json.clone(),
        gzip: paths.gzip.clone(),
        count: markers.len(),
    })
}

/// Record counts seen by [`verify`], one per artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyReport {
    pub csv_rows: usize,
    pub json_records: usize,
    pub gzip_records: usize,
    /// Plain and decompressed outputs decode to the same records.
    pub identical: bool,
}

impl VerifyReport {
    pub fn is_consistent(&self) -> bool {
        self.identical && self.csv_rows == self.json_records
    }
}

/// Re-read the input and both outputs and compare them.
#[tracing::instrument(level = "info", skip_all, fields(json = %paths.json.display()))]
pub fn verify(paths: &ConvertPaths) -> Result<VerifyReport> {
    let expected = process::load_markers(&paths.input)?;
    let plain = output::read_json(&paths.json)?;
    let gzip = output::read_gzip_json(&paths.gzip)?;

    Ok(VerifyReport {
        csv_rows: expected.len(),
        json_records: plain.len(),
        gzip_records: gzip.len(),
        identical: plain == gzip && plain == expected,
    })
}
