//! Batch forecasting pipeline.
//!
//! Per product: aggregate, gate on length, test stationarity, difference
//! non-stationary series (the re-test is informational), fit the fixed-order
//! model on the undifferenced units, forecast, store.

mod store;

use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};

use crate::data::{group_by_product, ForecastRecord, SalesRecord};
use crate::error::{ForecastError, Result};
use crate::models::arima::{diff::difference, Arima, ArimaOrder};
use crate::models::Forecaster;
use crate::utils::metrics::calculate_metrics;
use crate::validation::stationarity::adf_test;

pub use store::{FitDiagnostics, ForecastStore, ProductForecast, SkipReason};

/// Batch pass configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Minimum observations a product needs to be modeled.
    pub min_observations: usize,
    /// Forecast horizon in months.
    pub horizon: usize,
    /// Fixed ARIMA order. Never adapted by the stationarity results.
    pub order: ArimaOrder,
    /// Significance level for the stationarity decision.
    pub significance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_observations: 12,
            horizon: 12,
            order: ArimaOrder::new(1, 0, 1),
            significance: 0.05,
        }
    }
}

/// Run the batch pass over raw sales records.
///
/// Products with too little history (before, or after the differencing trim)
/// are skipped with a logged reason and recorded in the store. Statistics
/// failures propagate and abort the pass.
pub fn run_batch(records: &[SalesRecord], config: &PipelineConfig) -> Result<ForecastStore> {
    let mut store = ForecastStore::new();
    let grouped = group_by_product(records)?;
    info!(
        "aggregated {} records into {} product series",
        records.len(),
        grouped.len()
    );

    for series in grouped {
        let product_id = series.product_id().to_string();
        info!("processing product {product_id}");

        if series.len() < config.min_observations {
            warn!(
                "skipping {product_id}: not enough data points ({} of {})",
                series.len(),
                config.min_observations
            );
            store.record_skip(
                product_id,
                SkipReason::TooFewObservations {
                    got: series.len(),
                    needed: config.min_observations,
                },
            );
            continue;
        }

        let report = adf_test(&series.finite_units(), None)?;
        let stationary = report.is_stationary(config.significance);
        debug!(
            "{product_id}: ADF statistic {:.4}, p-value {:.4}, lags {}",
            report.statistic, report.p_value, report.lags
        );

        // Differencing is computed for non-stationary series and its re-test
        // logged, but the model order stays fixed and the fit below always
        // runs on the undifferenced units. The pass still costs the working
        // series its first observation.
        let mut working = series;
        let mut differenced = false;
        let mut stationary_after = None;
        if !stationary {
            let diffed = difference(working.units(), 1);
            let finite: Vec<f64> = diffed.into_iter().filter(|v| v.is_finite()).collect();
            let recheck = adf_test(&finite, None)?;
            let verdict = recheck.is_stationary(config.significance);
            info!(
                "{product_id}: non-stationary (p={:.4}); first difference re-tests {} (p={:.4})",
                report.p_value,
                if verdict { "stationary" } else { "non-stationary" },
                recheck.p_value
            );
            stationary_after = Some(verdict);
            working = working.without_first();
            differenced = true;
        }

        if working.len() < config.min_observations {
            warn!(
                "skipping {product_id}: not enough data after differencing ({} of {})",
                working.len(),
                config.min_observations
            );
            store.record_skip(
                product_id,
                SkipReason::TooFewAfterDifferencing {
                    got: working.len(),
                    needed: config.min_observations,
                },
            );
            continue;
        }

        info!(
            "fitting ARIMA({},{},{}) for {product_id}",
            config.order.p, config.order.d, config.order.q
        );
        let mut model = Arima::with_order(config.order);
        model.fit(&working)?;

        let accuracy = model
            .fitted_values()
            .and_then(|fitted| calculate_metrics(working.units(), fitted).ok());
        if let Some(metrics) = &accuracy {
            debug!(
                "{product_id}: in-sample MAE {:.3}, RMSE {:.3}",
                metrics.mae, metrics.rmse
            );
        }

        let forecast = model.predict(config.horizon)?;
        let last_date = working.last_date().ok_or(ForecastError::EmptyData)?;
        let horizon_dates = month_ends_after(last_date, config.horizon)?;
        let forecast_records: Vec<ForecastRecord> = horizon_dates
            .into_iter()
            .zip(forecast.points().iter())
            .map(|(date, &forecast_units)| ForecastRecord {
                date,
                product_id: product_id.clone(),
                forecast_units,
            })
            .collect();

        store.insert(ProductForecast {
            diagnostics: FitDiagnostics {
                stationary,
                differenced,
                stationary_after_differencing: stationary_after,
                aic: model.aic(),
                bic: model.bic(),
                accuracy,
            },
            series: working,
            records: forecast_records,
        });
    }

    info!(
        "batch pass complete: {} forecasted, {} skipped",
        store.len(),
        store.skipped().len()
    );
    Ok(store)
}

/// The `count` successive month-end dates strictly after `anchor`.
pub fn month_ends_after(anchor: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    let mut year = anchor.year();
    let mut month = anchor.month();
    let mut dates = Vec::with_capacity(count);

    while dates.len() < count {
        let month_end = last_day_of_month(year, month)
            .ok_or_else(|| ForecastError::DateError("date arithmetic overflow".to_string()))?;
        if month_end > anchor {
            dates.push(month_end);
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    Ok(dates)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|first| first.pred_opt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_ends_from_mid_month_anchor() {
        let dates = month_ends_after(date(2024, 1, 15), 3).unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn month_ends_from_month_end_anchor() {
        let dates = month_ends_after(date(2024, 1, 31), 3).unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn month_ends_cross_year_boundary() {
        let dates = month_ends_after(date(2023, 11, 30), 3).unwrap();
        assert_eq!(
            dates,
            vec![date(2023, 12, 31), date(2024, 1, 31), date(2024, 2, 29)]
        );
    }

    #[test]
    fn month_ends_are_strictly_increasing() {
        let dates = month_ends_after(date(2024, 6, 3), 12).unwrap();
        assert_eq!(dates.len(), 12);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert!(dates.iter().all(|d| *d > date(2024, 6, 3)));
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(last_day_of_month(2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(last_day_of_month(2023, 2), Some(date(2023, 2, 28)));
        assert_eq!(last_day_of_month(2023, 12), Some(date(2023, 12, 31)));
    }

    #[test]
    fn default_config_matches_batch_job() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_observations, 12);
        assert_eq!(config.horizon, 12);
        assert_eq!(config.order, ArimaOrder::new(1, 0, 1));
        assert_eq!(config.significance, 0.05);
    }
}
