//! Autocorrelation and partial autocorrelation.
//!
//! Backs the ACF/PACF diagnostic charts used for choosing ARIMA orders.

use crate::utils::stats::mean;

/// Autocorrelation of `series` at `lag`.
///
/// NaN when the series is too short for the lag; 0 for series with
/// (numerically) no variance.
pub fn acf(series: &[f64], lag: usize) -> f64 {
    if series.len() <= lag {
        return f64::NAN;
    }

    let m = mean(series);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &x) in series.iter().enumerate() {
        denominator += (x - m).powi(2);
        if i >= lag {
            numerator += (x - m) * (series[i - lag] - m);
        }
    }

    if denominator < 1e-10 {
        return 0.0;
    }
    numerator / denominator
}

/// Partial autocorrelation of `series` at `lag`, via Durbin-Levinson.
pub fn pacf(series: &[f64], lag: usize) -> f64 {
    if lag == 0 {
        return 1.0;
    }
    if series.len() <= lag {
        return f64::NAN;
    }

    let correlations: Vec<f64> = (0..=lag).map(|k| acf(series, k)).collect();
    if correlations.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }

    let mut phi = vec![vec![0.0; lag + 1]; lag + 1];
    phi[1][1] = correlations[1];

    for k in 2..=lag {
        let mut numerator = correlations[k];
        let mut denominator = 1.0;
        for j in 1..k {
            numerator -= phi[k - 1][j] * correlations[k - j];
            denominator -= phi[k - 1][j] * correlations[j];
        }
        if denominator.abs() < 1e-10 {
            return f64::NAN;
        }
        phi[k][k] = numerator / denominator;
        for j in 1..k {
            phi[k][j] = phi[k - 1][j] - phi[k][k] * phi[k - 1][k - j];
        }
    }

    phi[lag][lag]
}

/// ACF values for lags `0..=max_lag`, in lag order.
pub fn acf_profile(series: &[f64], max_lag: usize) -> Vec<f64> {
    (0..=max_lag).map(|lag| acf(series, lag)).collect()
}

/// PACF values for lags `0..=max_lag`, in lag order.
pub fn pacf_profile(series: &[f64], max_lag: usize) -> Vec<f64> {
    (0..=max_lag).map(|lag| pacf(series, lag)).collect()
}
