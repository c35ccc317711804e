//! Dataset File Reader

use crate::record::{CleanedRecord, RawRecord};
use crate::DatasetError;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load and clean every row of a semicolon-separated, headerless bar file.
///
/// Rows that fail to parse (non-numeric price/volume fields, malformed
/// date or time) are dropped and counted, not fatal. Rows are returned in
/// file order: the source is expected to be ascending by timestamp, and the
/// moving-average semantics downstream depend on that order, so no sorting
/// or reordering happens here.
pub fn load_records(path: &Path) -> Result<Vec<CleanedRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::SourceMissing(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_reader(file);

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (line, result) in reader.deserialize::<RawRecord>().enumerate() {
        match result {
            Ok(raw) => match raw.clean() {
                Some(cleaned) => records.push(cleaned),
                None => {
                    debug!("Dropping row {}: unparsable date/time", line + 1);
                    dropped += 1;
                }
            },
            Err(e) => {
                debug!("Dropping row {}: {}", line + 1, e);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!("Dropped {} unparsable rows from {}", dropped, path.display());
    }

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }

    info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}
