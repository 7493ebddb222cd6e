// src/output/mod.rs
use anyhow::{Context, Result};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use tempfile::Builder;
use tracing::info;

use crate::marker::MarkerRecord;

/// Write `markers` as pretty-printed JSON (2-space indent, non-ASCII kept as is).
/// Returns the number of bytes on disk.
#[tracing::instrument(level = "info", skip(path, markers), fields(path = %path.as_ref().display()))]
pub fn write_json<P: AsRef<Path>>(path: P, markers: &[MarkerRecord]) -> Result<u64> {
    let bytes = write_atomic(path.as_ref(), |w| {
        serde_json::to_writer_pretty(&mut *w, markers).context("Failed to serialize markers")
    })?;
    info!(count = markers.len(), bytes, "wrote json");
    Ok(bytes)
}

/// Write `markers` as compact JSON through a gzip encoder.
/// Returns the compressed size on disk.
#[tracing::instrument(level = "info", skip(path, markers), fields(path = %path.as_ref().display()))]
pub fn write_gzip_json<P: AsRef<Path>>(path: P, markers: &[MarkerRecord]) -> Result<u64> {
    let bytes = write_atomic(path.as_ref(), |w| {
        let mut enc = GzEncoder::new(&mut *w, Compression::default());
        // Tightest compact form with literal UTF-8. Byte layout is free to
        // differ from the plain file; only the decoded records must match.
        serde_json::to_writer(&mut enc, markers).context("Failed to serialize markers")?;
        enc.finish().context("Failed to finish gzip stream")?;
        Ok(())
    })?;
    info!(count = markers.len(), bytes, "wrote gzip json");
    Ok(bytes)
}

pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Vec<MarkerRecord>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to decode markers from {:?}", path.as_ref()))
}

pub fn read_gzip_json<P: AsRef<Path>>(path: P) -> Result<Vec<MarkerRecord>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open gzip file: {:?}", path.as_ref()))?;
    serde_json::from_reader(BufReader::new(GzDecoder::new(file)))
        .with_context(|| format!("Failed to decode markers from {:?}", path.as_ref()))
}

/// Fill a temp file next to `path`, then rename it over `path`. A failure
/// before the rename leaves whatever was at `path` untouched.
///
/// The result gets the permissions a plain create would: the existing
/// target's mode when overwriting, otherwise 0666 under the umask.
fn write_atomic<F>(path: &Path, fill: F) -> Result<u64>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;

    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        fill(&mut w)?;
        w.flush()
            .with_context(|| format!("Failed to flush output for {:?}", path))?;
    }

    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("Failed to copy permissions of {:?}", path))?;
    }

    let file = tmp
        .persist(path)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(file.metadata()?.len())
}
