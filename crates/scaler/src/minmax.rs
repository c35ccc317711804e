//! Column-Wise Min-Max Fitting

use crate::ScalerError;
use feature_engine::FEATURE_DIMENSION;
use tracing::debug;

/// A fitted min-max scaler mapping each column's observed [min, max] to [0, 1].
///
/// Parameters are immutable once fit. `scale` is `1 / (max - min)` per
/// column; a column with zero range gets `scale = 1.0` so transforming it is
/// a pure shift, matching the training library's handling of constant
/// columns. The forward transform is `scaled = raw * scale + min_offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    pub data_range: Vec<f64>,
    pub scale: Vec<f64>,
    pub min_offset: Vec<f64>,
}

impl MinMaxScaler {
    /// Fit column-wise over every row. Rows must all have the same width
    /// and contain no NaN (upstream engineering has already excluded them).
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, ScalerError> {
        let Some(first) = rows.first() else {
            return Err(ScalerError::InsufficientData);
        };
        let dims = first.len();

        let mut data_min = vec![f64::INFINITY; dims];
        let mut data_max = vec![f64::NEG_INFINITY; dims];
        for row in rows {
            for (d, &v) in row.iter().enumerate() {
                data_min[d] = data_min[d].min(v);
                data_max[d] = data_max[d].max(v);
            }
        }

        let data_range: Vec<f64> = data_min
            .iter()
            .zip(&data_max)
            .map(|(lo, hi)| hi - lo)
            .collect();
        let scale: Vec<f64> = data_range
            .iter()
            .map(|&r| if r == 0.0 { 1.0 } else { 1.0 / r })
            .collect();
        let min_offset: Vec<f64> = data_min
            .iter()
            .zip(&scale)
            .map(|(lo, s)| -lo * s)
            .collect();

        debug!("Fit min-max scaler over {} rows x {} dims", rows.len(), dims);

        Ok(Self {
            data_min,
            data_max,
            data_range,
            scale,
            min_offset,
        })
    }

    /// Number of scaled dimensions
    pub fn dims(&self) -> usize {
        self.scale.len()
    }

    /// `scaled = raw * scale + min_offset`, per dimension
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.scale.iter().zip(&self.min_offset))
            .map(|(&v, (s, m))| v * s + m)
            .collect()
    }

    /// `raw = (scaled - min_offset) / scale`, per dimension
    pub fn inverse_transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.scale.iter().zip(&self.min_offset))
            .map(|(&v, (s, m))| (v - m) / s)
            .collect()
    }
}

/// Fit the two export scalers: one over the feature columns, one over the
/// prediction target. Both are fit on the entire labeled dataset so the
/// parameters match the training-time fit exactly.
pub fn fit_scalers(
    features: &[[f64; FEATURE_DIMENSION]],
    prices: &[f64],
) -> Result<(MinMaxScaler, MinMaxScaler), ScalerError> {
    let feature_rows: Vec<Vec<f64>> = features.iter().map(|f| f.to_vec()).collect();
    let price_rows: Vec<Vec<f64>> = prices.iter().map(|&p| vec![p]).collect();

    let feature_scaler = MinMaxScaler::fit(&feature_rows)?;
    let price_scaler = MinMaxScaler::fit(&price_rows)?;
    Ok((feature_scaler, price_scaler))
}
