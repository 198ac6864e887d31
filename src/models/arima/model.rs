//! ARIMA (autoregressive integrated moving average) model.
//!
//! Parameters are estimated by conditional sum of squares, minimized with a
//! bounded Nelder-Mead search.

use log::warn;

use crate::core::{Forecast, ProductSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{difference, integrate};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::quantile_normal;

/// ARIMA order (p, d, q).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// Autoregressive order.
    pub p: usize,
    /// Differencing order.
    pub d: usize,
    /// Moving-average order.
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Estimated parameter count: AR + MA + intercept.
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1
    }

    /// Observations required to fit this order.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 1
    }
}

/// ARIMA forecasting model.
#[derive(Debug, Clone)]
pub struct Arima {
    order: ArimaOrder,
    ar: Vec<f64>,
    ma: Vec<f64>,
    intercept: f64,
    original: Option<Vec<f64>>,
    differenced: Option<Vec<f64>>,
    fitted_diff: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
}

impl Arima {
    /// Create an unfitted ARIMA(p, d, q) model.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            order: ArimaOrder::new(p, d, q),
            ar: vec![],
            ma: vec![],
            intercept: 0.0,
            original: None,
            differenced: None,
            fitted_diff: None,
            residuals: None,
            residual_variance: None,
            aic: None,
            bic: None,
        }
    }

    /// Create a model from an order value.
    pub fn with_order(order: ArimaOrder) -> Self {
        Self::new(order.p, order.d, order.q)
    }

    /// Model order.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Estimated AR coefficients.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    /// Estimated MA coefficients.
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Estimated intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Akaike information criterion of the fit.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Bayesian information criterion of the fit.
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Conditional sum of squared one-step errors for a candidate parameter
    /// vector, on the differenced scale.
    fn css(diff: &[f64], p: usize, q: usize, intercept: f64, ar: &[f64], ma: &[f64]) -> f64 {
        let n = diff.len();
        let warmup = p.max(q);
        if n <= warmup {
            return f64::MAX;
        }

        let mut residuals = vec![0.0; n];
        let mut total = 0.0;
        for t in warmup..n {
            let mut prediction = intercept;
            for (i, coefficient) in ar.iter().enumerate() {
                prediction += coefficient * (diff[t - 1 - i] - intercept);
            }
            for (i, coefficient) in ma.iter().enumerate() {
                prediction += coefficient * residuals[t - 1 - i];
            }
            let error = diff[t] - prediction;
            residuals[t] = error;
            total += error * error;
        }
        total
    }

    /// Estimate intercept and AR/MA coefficients on the differenced series.
    fn estimate(&mut self, diff: &[f64]) -> Result<()> {
        let p = self.order.p;
        let q = self.order.q;
        let mean = diff.iter().sum::<f64>() / diff.len() as f64;

        if p == 0 && q == 0 {
            self.intercept = mean;
            self.ar = vec![];
            self.ma = vec![];
            return Ok(());
        }

        // Parameter layout: [intercept, ar..., ma...]. AR/MA coefficients are
        // boxed into (-0.99, 0.99) to keep the process stationary/invertible.
        let mut initial = vec![0.0; 1 + p + q];
        initial[0] = mean;
        for i in 0..p {
            initial[1 + i] = 0.1 / (i + 1) as f64;
        }
        for i in 0..q {
            initial[1 + p + i] = 0.1 / (i + 1) as f64;
        }

        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + q));

        let config = NelderMeadConfig {
            max_iter: 1000,
            tolerance: 1e-8,
            ..Default::default()
        };
        let result = nelder_mead(
            |params| {
                Self::css(
                    diff,
                    p,
                    q,
                    params[0],
                    &params[1..1 + p],
                    &params[1 + p..],
                )
            },
            &initial,
            Some(&bounds),
            &config,
        );

        if !result.value.is_finite() {
            return Err(ForecastError::ComputationError(
                "ARIMA estimation produced a non-finite objective".to_string(),
            ));
        }
        if !result.converged {
            warn!(
                "ARIMA({},{},{}) estimation stopped at the iteration limit without converging",
                p, self.order.d, q
            );
        }

        self.intercept = result.point[0];
        self.ar = result.point[1..1 + p].to_vec();
        self.ma = result.point[1 + p..].to_vec();
        Ok(())
    }

    /// Fill fitted values, residuals, residual variance, and the information
    /// criteria from the estimated parameters.
    fn evaluate_fit(&mut self, diff: &[f64]) {
        let n = diff.len();
        let warmup = self.order.p.max(self.order.q);

        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];
        for t in warmup..n {
            let mut prediction = self.intercept;
            for (i, coefficient) in self.ar.iter().enumerate() {
                prediction += coefficient * (diff[t - 1 - i] - self.intercept);
            }
            for (i, coefficient) in self.ma.iter().enumerate() {
                prediction += coefficient * residuals[t - 1 - i];
            }
            fitted[t] = prediction;
            residuals[t] = diff[t] - prediction;
        }

        let effective = &residuals[warmup..];
        if !effective.is_empty() {
            let variance = effective.iter().map(|r| r * r).sum::<f64>() / effective.len() as f64;
            self.residual_variance = Some(variance);

            let n_eff = effective.len() as f64;
            let k = self.order.num_params() as f64;
            let log_likelihood =
                -0.5 * n_eff * (1.0 + variance.ln() + (2.0 * std::f64::consts::PI).ln());
            self.aic = Some(-2.0 * log_likelihood + 2.0 * k);
            self.bic = Some(-2.0 * log_likelihood + k * n_eff.ln());
        }

        self.fitted_diff = Some(fitted);
        self.residuals = Some(residuals);
    }
}

impl Default for Arima {
    fn default() -> Self {
        Self::new(1, 0, 1)
    }
}

impl Forecaster for Arima {
    fn fit(&mut self, series: &ProductSeries) -> Result<()> {
        let values = series.units();
        let needed = self.order.min_observations();
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        self.original = Some(values.to_vec());
        let diff = difference(values, self.order.d);
        self.estimate(&diff)?;
        self.evaluate_fit(&diff);
        self.differenced = Some(diff);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let original = self.original.as_ref().ok_or(ForecastError::FitRequired)?;
        let diff = self.differenced.as_ref().ok_or(ForecastError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        // Recurse forward on the differenced scale; future shocks are zero.
        let mut extended = diff.clone();
        let mut shocks = residuals.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let mut prediction = self.intercept;
            for (i, coefficient) in self.ar.iter().enumerate() {
                if t > i {
                    prediction += coefficient * (extended[t - 1 - i] - self.intercept);
                }
            }
            for (i, coefficient) in self.ma.iter().enumerate() {
                if t > i {
                    prediction += coefficient * shocks[t - 1 - i];
                }
            }
            extended.push(prediction);
            shocks.push(0.0);
        }

        let forecast_diff = &extended[diff.len()..];
        let points = if self.order.d > 0 {
            integrate(forecast_diff, original, self.order.d)
        } else {
            forecast_diff.to_vec()
        };

        Ok(Forecast::from_points(points))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }

        let variance = self.residual_variance.unwrap_or(0.0);
        let z = quantile_normal((1.0 + level) / 2.0);
        let points = forecast.points();

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (step, &point) in points.iter().enumerate() {
            // Forecast variance grows linearly with the horizon step.
            let se = (variance * (step + 1) as f64).sqrt();
            lower.push(point - z * se);
            upper.push(point + z * se);
        }

        Forecast::with_intervals(points.to_vec(), lower, upper)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted_diff.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_series(values: Vec<f64>) -> ProductSeries {
        let dates: Vec<NaiveDate> = (0..values.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2020 + i as i32 / 12, 1 + (i as u32 % 12), 1).unwrap()
            })
            .collect();
        ProductSeries::new("P001", dates, values).unwrap()
    }

    #[test]
    fn fit_and_predict_basic() {
        let values: Vec<f64> = (0..50)
            .map(|i| 10.0 + 0.5 * i as f64 + (i as f64 * 0.3).sin())
            .collect();
        let mut model = Arima::new(1, 0, 1);
        model.fit(&make_series(values)).unwrap();

        assert_eq!(model.ar_coefficients().len(), 1);
        assert_eq!(model.ma_coefficients().len(), 1);

        let forecast = model.predict(12).unwrap();
        assert_eq!(forecast.horizon(), 12);
        assert!(forecast.points().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn ar1_coefficient_is_recovered_roughly() {
        let mut values = vec![10.0];
        for i in 1..100 {
            values.push(0.7 * values[i - 1] + (i as f64 * 0.1).sin());
        }
        let mut model = Arima::new(1, 0, 0);
        model.fit(&make_series(values)).unwrap();
        assert!(model.ar_coefficients()[0] > 0.3);
    }

    #[test]
    fn differencing_order_continues_trend() {
        let values: Vec<f64> = (0..50).map(|i| 10.0 + 2.0 * i as f64).collect();
        let mut model = Arima::new(1, 1, 0);
        model.fit(&make_series(values.clone())).unwrap();

        let forecast = model.predict(5).unwrap();
        assert!(forecast.points()[0] > values.last().unwrap() - 5.0);
    }

    #[test]
    fn insufficient_data_is_rejected() {
        let mut model = Arima::new(1, 0, 1);
        // Needs p + d + q + 1 = 3 observations.
        let result = model.fit(&make_series(vec![1.0, 2.0]));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn predict_requires_fit() {
        let model = Arima::new(1, 0, 1);
        assert!(matches!(model.predict(5), Err(ForecastError::FitRequired)));
    }

    #[test]
    fn zero_horizon_is_empty() {
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let mut model = Arima::new(1, 0, 1);
        model.fit(&make_series(values)).unwrap();
        assert_eq!(model.predict(0).unwrap().horizon(), 0);
    }

    #[test]
    fn information_criteria_present_after_fit() {
        let values: Vec<f64> = (0..50).map(|i| 10.0 + (i as f64 * 0.3).sin()).collect();
        let mut model = Arima::new(1, 0, 1);
        model.fit(&make_series(values)).unwrap();
        assert!(model.aic().is_some());
        assert!(model.bic().is_some());
    }

    #[test]
    fn intervals_bracket_the_point_forecast() {
        let values: Vec<f64> = (0..50)
            .map(|i| 10.0 + 0.5 * i as f64 + (i as f64 * 0.3).sin())
            .collect();
        let mut model = Arima::new(1, 0, 1);
        model.fit(&make_series(values)).unwrap();

        let forecast = model.predict_with_intervals(5, 0.95).unwrap();
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();
        for i in 0..5 {
            assert!(lower[i] <= forecast.points()[i]);
            assert!(upper[i] >= forecast.points()[i]);
        }
    }

    #[test]
    fn fit_is_deterministic() {
        let values: Vec<f64> = (0..40)
            .map(|i| 100.0 + 10.0 * (i as f64 * 0.5).sin() + i as f64)
            .collect();

        let mut first = Arima::new(1, 0, 1);
        first.fit(&make_series(values.clone())).unwrap();
        let mut second = Arima::new(1, 0, 1);
        second.fit(&make_series(values)).unwrap();

        assert_eq!(
            first.predict(12).unwrap().points(),
            second.predict(12).unwrap().points()
        );
    }

    #[test]
    fn order_accessors() {
        let order = ArimaOrder::new(2, 1, 3);
        assert_eq!(order.num_params(), 6);
        assert_eq!(order.min_observations(), 7);

        let model = Arima::with_order(order);
        assert_eq!(model.order(), order);
        assert_eq!(model.name(), "ARIMA");
    }

    #[test]
    fn default_order_is_1_0_1() {
        let model = Arima::default();
        assert_eq!(model.order(), ArimaOrder::new(1, 0, 1));
    }
}
