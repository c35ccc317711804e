//! Trailing Window Computations

/// Trailing simple moving average.
///
/// Position `i` averages `values[i + 1 - window ..= i]`; the first
/// `window - 1` positions have no full window and are NaN. Each window is
/// summed fresh, not maintained as a running total.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || window > n {
        return result;
    }

    for i in (window - 1)..n {
        let start = i + 1 - window;
        let sum: f64 = values[start..=i].iter().sum();
        result[i] = sum / window as f64;
    }

    result
}
