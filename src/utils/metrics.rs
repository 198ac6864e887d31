//! In-sample accuracy metrics used for fit logging.

use crate::error::{ForecastError, Result};

/// Accuracy of fitted values against the observed series.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute percentage error. None when the series contains zeros.
    pub mape: Option<f64>,
}

/// Calculate accuracy metrics between actual and fitted values.
///
/// Pairs where the fitted value is NaN (warm-up observations the model cannot
/// predict) are skipped.
pub fn calculate_metrics(actual: &[f64], fitted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || fitted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != fitted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: fitted.len(),
        });
    }

    let pairs: Vec<(f64, f64)> = actual
        .iter()
        .zip(fitted.iter())
        .filter(|(_, f)| !f.is_nan())
        .map(|(&a, &f)| (a, f))
        .collect();

    if pairs.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let n = pairs.len() as f64;
    let mae = pairs.iter().map(|(a, f)| (a - f).abs()).sum::<f64>() / n;
    let mse = pairs.iter().map(|(a, f)| (a - f).powi(2)).sum::<f64>() / n;

    let mape = if pairs.iter().any(|(a, _)| *a == 0.0) {
        None
    } else {
        Some(100.0 * pairs.iter().map(|(a, f)| ((a - f) / a).abs()).sum::<f64>() / n)
    };

    Ok(AccuracyMetrics {
        mae,
        rmse: mse.sqrt(),
        mape,
    })
}
