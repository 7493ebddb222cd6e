use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

/// Value at `idx`, or `""` when the column is unknown or the row is short.
pub fn field(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}

/// Empty → `None`. Anything else must be a finite number; surrounding
/// whitespace is tolerated, whitespace alone is not.
///
/// `nan`, `inf` and overflowing values are rejected, so `null` in the output
/// only ever means a missing coordinate.
pub fn parse_coordinate(raw: &str) -> Result<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("not a number: {:?}", raw))?;
    if !value.is_finite() {
        return Err(anyhow!("not a finite number: {:?}", raw));
    }
    Ok(Some(value))
}
