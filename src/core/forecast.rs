//! Forecast result structure for holding predictions.

use crate::error::{ForecastError, Result};

/// A univariate forecast: point predictions and optional interval bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_points(point: Vec<f64>) -> Self {
        Self {
            point,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with prediction intervals.
    ///
    /// Fails if the bounds are not the same length as the point forecast.
    pub fn with_intervals(point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != point.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: point.len(),
                got: lower.len(),
            });
        }
        if upper.len() != point.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: point.len(),
                got: upper.len(),
            });
        }
        Ok(Self {
            point,
            lower: Some(lower),
            upper: Some(upper),
        })
    }

    /// Forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if the forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point predictions.
    pub fn points(&self) -> &[f64] {
        &self.point
    }

    /// Lower interval bounds, if present.
    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    /// Upper interval bounds, if present.
    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_forecast() {
        let forecast = Forecast::new();
        assert_eq!(forecast.horizon(), 0);
        assert!(forecast.is_empty());
        assert!(forecast.lower().is_none());
        assert!(forecast.upper().is_none());
    }

    #[test]
    fn point_forecast() {
        let forecast = Forecast::from_points(vec![1.0, 2.0, 3.0]);
        assert_eq!(forecast.horizon(), 3);
        assert_eq!(forecast.points(), &[1.0, 2.0, 3.0]);
        assert!(forecast.lower().is_none());
    }

    #[test]
    fn interval_forecast() {
        let forecast =
            Forecast::with_intervals(vec![2.0, 3.0], vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        assert_eq!(forecast.lower().unwrap(), &[1.0, 2.0]);
        assert_eq!(forecast.upper().unwrap(), &[3.0, 4.0]);
    }

    #[test]
    fn interval_length_mismatch_rejected() {
        let result = Forecast::with_intervals(vec![2.0, 3.0], vec![1.0], vec![3.0, 4.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }
}
