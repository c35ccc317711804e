//! Demo Sample Extraction

use feature_engine::EngineeredRecord;

/// The most recent `count` engineered rows, in original order. Purely a
/// demo aid for the browser client; the model never consumes this.
pub fn extract_sample(rows: &[EngineeredRecord], count: usize) -> &[EngineeredRecord] {
    let start = rows.len().saturating_sub(count);
    &rows[start..]
}
