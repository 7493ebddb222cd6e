// src/process/mod.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, trace};

use crate::marker::{MarkerRecord, MarkerRow};

pub mod fields;

use fields::{field, parse_coordinate};

pub const COL_ATLAS_NUMBER: &str = "AtlasNumber";
pub const COL_TITLE: &str = "MarkerTitle";
pub const COL_TEXT: &str = "MarkerText";
pub const COL_YEAR_ERECTED: &str = "YearMarkerErected";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_CITY: &str = "City";
pub const COL_COUNTY: &str = "County";

/// Positions of the known columns in the header row. A column missing from
/// the header stays `None` and reads as empty for every row.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Columns {
    pub atlas_number: Option<usize>,
    pub title: Option<usize>,
    pub text: Option<usize>,
    pub year_erected: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    pub city: Option<usize>,
    pub county: Option<usize>,
}

impl Columns {
    /// Header names match exactly. When a name repeats, the last one wins.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut cols = Columns::default();
        for (i, name) in headers.iter().enumerate() {
            let slot = match name {
                COL_ATLAS_NUMBER => &mut cols.atlas_number,
                COL_TITLE => &mut cols.title,
                COL_TEXT => &mut cols.text,
                COL_YEAR_ERECTED => &mut cols.year_erected,
                COL_LATITUDE => &mut cols.latitude,
                COL_LONGITUDE => &mut cols.longitude,
                COL_CITY => &mut cols.city,
                COL_COUNTY => &mut cols.county,
                other => {
                    trace!(column = other, "ignoring column");
                    continue;
                }
            };
            *slot = Some(i);
        }
        cols
    }

    pub fn row<'r>(&self, record: &'r StringRecord) -> Result<MarkerRow<'r>> {
        let latitude = parse_coordinate(field(record, self.latitude))
            .with_context(|| format!("bad {}", COL_LATITUDE))?;
        let longitude = parse_coordinate(field(record, self.longitude))
            .with_context(|| format!("bad {}", COL_LONGITUDE))?;

        Ok(MarkerRow {
            atlas_number: field(record, self.atlas_number),
            title: field(record, self.title),
            text: field(record, self.text),
            year_erected: field(record, self.year_erected),
            latitude,
            longitude,
            city: field(record, self.city),
            county: field(record, self.county),
        })
    }
}

/// Open the CSV extract at `path` and map every data row to a `MarkerRecord`.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_markers<P: AsRef<Path>>(path: P) -> Result<Vec<MarkerRecord>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;
    read_markers(BufReader::new(file))
        .with_context(|| format!("Failed to load markers from {:?}", path.as_ref()))
}

/// Map rows in file order. The first bad row aborts the whole read.
pub fn read_markers<R: Read>(reader: R) -> Result<Vec<MarkerRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short rows read as empty fields
        .from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV header row")?.clone();
    let cols = Columns::from_headers(&headers);
    debug!(?cols, "resolved header columns");

    let mut markers = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        // 1-based, header excluded
        let n = idx + 1;
        let record = result.with_context(|| format!("CSV parse error at record {}", n))?;
        let row = cols
            .row(&record)
            .with_context(|| format!("Invalid marker at record {}", n))?;
        markers.push(MarkerRecord::from_row(&row));
    }

    debug!(count = markers.len(), "mapped markers");
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    const HEADER: &str =
        "AtlasNumber,MarkerTitle,MarkerText,YearMarkerErected,Latitude,Longitude,City,County";

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,txmarkers::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn read(body: &str) -> Result<Vec<MarkerRecord>> {
        read_markers(Cursor::new(format!("{}\n{}", HEADER, body)))
    }

    #[test]
    fn alamo_row() -> Result<()> {
        init_test_logging();
        let markers = read(
            "5535, Alamo ,Remember the Alamo.,1936,29.4260,-98.4861,San Antonio,Bexar\n",
        )?;

        assert_eq!(markers.len(), 1);
        let m = &markers[0];
        assert_eq!(m.id, "tx-thc-5535");
        assert_eq!(m.title, "Alamo");
        assert_eq!(m.description, "Remember the Alamo.");
        assert_eq!(m.date_installed, "1936");
        assert_eq!(m.coordinates.latitude, Some(29.426));
        assert_eq!(m.coordinates.longitude, Some(-98.4861));
        assert_eq!(m.address.city, "San Antonio");
        assert_eq!(m.address.county, "Bexar");
        assert_eq!(m.address.state, "TX");
        assert_eq!(m.marker_type, "state marker (TX)");
        assert_eq!(m.confidence, 0.9);
        Ok(())
    }

    #[test]
    fn keeps_row_order_and_count() -> Result<()> {
        let markers = read("3,C,,,,,,\n1,A,,,,,,\n2,B,,,,,,\n")?;
        let ids: Vec<&str> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["tx-thc-3", "tx-thc-1", "tx-thc-2"]);
        Ok(())
    }

    #[test]
    fn empty_coordinates_are_null() -> Result<()> {
        let markers = read("9,Fort,,1970,,-97.1,Austin,Travis\n")?;
        assert_eq!(markers[0].coordinates.latitude, None);
        assert_eq!(markers[0].coordinates.longitude, Some(-97.1));
        Ok(())
    }

    #[test]
    fn short_rows_and_missing_columns_default() -> Result<()> {
        let markers = read_markers(Cursor::new("AtlasNumber,MarkerTitle,Extra\n 42 \n"))?;
        assert_eq!(markers.len(), 1);
        let m = &markers[0];
        assert_eq!(m.id, "tx-thc-42");
        assert_eq!(m.source[0].source_id, " 42 ");
        assert_eq!(m.title, "");
        assert_eq!(m.description, "");
        assert_eq!(m.date_installed, "");
        assert_eq!(m.coordinates.latitude, None);
        assert_eq!(m.address.city, "");
        Ok(())
    }

    #[test]
    fn quoted_fields_and_unicode() -> Result<()> {
        let markers = read(
            "7,\"Misión San José\",\"Line one,\nline two\",1936,29.36,-98.48,San Antonio,Bexar\n",
        )?;
        assert_eq!(markers[0].title, "Misión San José");
        assert_eq!(markers[0].description, "Line one,\nline two");
        Ok(())
    }

    #[test]
    fn duplicate_header_last_wins() {
        let cols = Columns::from_headers(&StringRecord::from(vec![
            "City", "AtlasNumber", "City",
        ]));
        assert_eq!(cols.city, Some(2));
        assert_eq!(cols.atlas_number, Some(1));
        assert_eq!(cols.county, None);
    }

    #[test]
    fn bad_latitude_aborts() {
        let err = read("1,Ok,,,29.1,-98.1,,\n2,Bad,,,N/A,-98.2,,\n").unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("record 2"), "{}", chain);
        assert!(chain.contains("Latitude"), "{}", chain);
    }

    #[test]
    fn leading_bom_is_ignored() -> Result<()> {
        let markers = read_markers(Cursor::new(format!("\u{feff}{}\n5,X,,,,,,\n", HEADER)))?;
        assert_eq!(markers[0].id, "tx-thc-5");
        Ok(())
    }

    #[test]
    fn header_only_gives_no_markers() -> Result<()> {
        assert!(read_markers(Cursor::new(HEADER))?.is_empty());
        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "{}", HEADER)?;
        writeln!(tmp, "10,A,,,,,,")?;
        writeln!(tmp, "11,B,,,,,,")?;
        assert_eq!(load_markers(tmp.path())?.len(), 2);
        Ok(())
    }

    #[test]
    fn missing_file_fails() {
        assert!(load_markers("/nonexistent/markers.csv").is_err());
    }
}
