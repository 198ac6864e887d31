//! Forecaster trait defining the model interface.

use crate::core::{Forecast, ProductSeries};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// Object-safe, so models can be held as `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to a product's sales series.
    fn fit(&mut self, series: &ProductSeries) -> Result<()>;

    /// Point predictions for the next `horizon` periods.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Predictions with confidence intervals at the given level.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample fitted values, once fitted.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted), once fitted.
    fn residuals(&self) -> Option<&[f64]>;

    /// Model name for logging.
    fn name(&self) -> &str;

    /// Whether the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedForecaster = Box<dyn Forecaster>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::arima::Arima;
    use chrono::NaiveDate;

    fn make_series(n: usize) -> ProductSeries {
        let dates: Vec<NaiveDate> = (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(2020 + i as i32 / 12, 1 + (i as u32 % 12), 1).unwrap()
            })
            .collect();
        let units: Vec<f64> = (0..n).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        ProductSeries::new("P001", dates, units).unwrap()
    }

    #[test]
    fn boxed_forecaster_fit_and_predict() {
        let mut model: BoxedForecaster = Box::new(Arima::new(1, 0, 1));
        assert!(!model.is_fitted());

        model.fit(&make_series(24)).unwrap();
        assert!(model.is_fitted());
        assert_eq!(model.name(), "ARIMA");

        let forecast = model.predict(12).unwrap();
        assert_eq!(forecast.horizon(), 12);
    }

    #[test]
    fn trait_accessors_before_and_after_fit() {
        let mut model = Arima::new(1, 0, 1);
        assert!(model.fitted_values().is_none());
        assert!(model.residuals().is_none());

        model.fit(&make_series(24)).unwrap();
        assert!(model.fitted_values().is_some());
        assert!(model.residuals().is_some());
    }
}
