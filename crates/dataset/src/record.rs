//! Raw and Cleaned Row Types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the source file, as written: `date;time;open;high;low;close;volume`
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Calendar date, `DD/MM/YYYY`
    pub date: String,
    /// Time of day, `HH:MM:SS`
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A row with date and time merged into its ordering key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawRecord {
    /// Merge date and time into a timestamp. Returns `None` when the
    /// date/time fields do not match the source format.
    pub fn clean(&self) -> Option<CleanedRecord> {
        let timestamp = NaiveDateTime::parse_from_str(
            &format!("{} {}", self.date, self.time),
            "%d/%m/%Y %H:%M:%S",
        )
        .ok()?;

        Some(CleanedRecord {
            timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}
