//! Differencing and integration for ARIMA models.

/// Difference a series `d` times. Each pass drops one leading value.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `d` rounds of differencing on a forecast, anchored on the original
/// series' trailing values.
pub fn integrate(forecast_diff: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || forecast_diff.is_empty() {
        return forecast_diff.to_vec();
    }

    let mut result = forecast_diff.to_vec();
    for level in (0..d).rev() {
        let anchor = if level == 0 {
            original.last().copied().unwrap_or(0.0)
        } else {
            difference(original, level).last().copied().unwrap_or(0.0)
        };

        let mut cumsum = anchor;
        for value in &mut result {
            cumsum += *value;
            *value = cumsum;
        }
    }
    result
}
