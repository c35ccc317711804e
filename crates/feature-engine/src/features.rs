//! Feature Vector Assembly

use crate::rolling::rolling_mean;
use chrono::NaiveDateTime;
use dataset::CleanedRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 5;

/// Model input columns, in wire order.
///
/// This ordering is consumed verbatim by the scaler export and by the
/// browser runtime when it assembles inputs; [`EngineeredRecord::features`]
/// must stay in lockstep with it.
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] =
    ["close", "volume", "hl_range", "close_ma", "vol_ma"];

/// A cleaned row augmented with its derived columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredRecord {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Bar range as a fraction of the low: `(high - low) / low`
    pub hl_range: f64,
    /// Trailing simple moving average of `close`
    pub close_ma: f64,
    /// Trailing simple moving average of `volume`
    pub vol_ma: f64,
}

impl EngineeredRecord {
    /// Feature vector in [`FEATURE_NAMES`] order
    pub fn features(&self) -> [f64; FEATURE_DIMENSION] {
        [
            self.close,
            self.volume,
            self.hl_range,
            self.close_ma,
            self.vol_ma,
        ]
    }
}

/// An engineered row paired with its prediction target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub record: EngineeredRecord,
    /// Close price `horizon` rows ahead
    pub future_price: f64,
}

/// Derive the engineered columns from cleaned rows.
///
/// `hl_range` is computed pointwise; the two moving averages run over the
/// entire input with window `window`. Rows where any derived value is not
/// finite (moving-average warmup, `low == 0`) are then excluded. The
/// averages are computed before the exclusion, so an excluded row still
/// contributes its close and volume to later windows. Input order is
/// preserved and must be time-ascending.
pub fn engineer(records: &[CleanedRecord], window: usize) -> Vec<EngineeredRecord> {
    let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
    let volumes: Vec<f64> = records.iter().map(|r| r.volume).collect();

    let close_ma = rolling_mean(&closes, window);
    let vol_ma = rolling_mean(&volumes, window);

    let mut engineered = Vec::with_capacity(records.len().saturating_sub(window.saturating_sub(1)));
    for (i, r) in records.iter().enumerate() {
        let hl_range = if r.low == 0.0 {
            f64::NAN
        } else {
            (r.high - r.low) / r.low
        };

        if !hl_range.is_finite() || !close_ma[i].is_finite() || !vol_ma[i].is_finite() {
            continue;
        }

        engineered.push(EngineeredRecord {
            timestamp: r.timestamp,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
            hl_range,
            close_ma: close_ma[i],
            vol_ma: vol_ma[i],
        });
    }

    debug!(
        "Engineered {} rows from {} cleaned rows (window={})",
        engineered.len(),
        records.len(),
        window
    );

    engineered
}

/// Attach the shifted prediction target.
///
/// `future_price` for row `i` is the close of row `i + horizon` within the
/// already-filtered engineered sequence; the trailing `horizon` rows have no
/// target and are dropped.
pub fn label(engineered: &[EngineeredRecord], horizon: usize) -> Vec<LabeledRecord> {
    if engineered.len() <= horizon {
        return Vec::new();
    }

    engineered[..engineered.len() - horizon]
        .iter()
        .enumerate()
        .map(|(i, r)| LabeledRecord {
            record: r.clone(),
            future_price: engineered[i + horizon].close,
        })
        .collect()
}

/// Full feature derivation: clean rows in, labeled engineered rows out.
pub fn engineer_labeled(
    records: &[CleanedRecord],
    window: usize,
    horizon: usize,
) -> Vec<LabeledRecord> {
    label(&engineer(records, window), horizon)
}
