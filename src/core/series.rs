//! Per-product sales series.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// An aggregated, date-ordered sales series for a single product.
///
/// One `ProductSeries` exists per distinct product id in the input data.
/// Dates are strictly increasing (enforced at construction); units hold the
/// per-date aggregated sales volume.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSeries {
    product_id: String,
    dates: Vec<NaiveDate>,
    units: Vec<f64>,
}

impl ProductSeries {
    /// Create a new series. Fails if dates and units differ in length or if
    /// dates are not strictly increasing.
    pub fn new(
        product_id: impl Into<String>,
        dates: Vec<NaiveDate>,
        units: Vec<f64>,
    ) -> Result<Self> {
        if dates.len() != units.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: units.len(),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ForecastError::DateError(
                    "dates must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self {
            product_id: product_id.into(),
            dates,
            units,
        })
    }

    /// Product identifier this series belongs to.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Observation dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Aggregated units sold, aligned with [`dates`](Self::dates).
    pub fn units(&self) -> &[f64] {
        &self.units
    }

    /// Last historical date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Units with non-finite values removed. Hypothesis tests run on this.
    pub fn finite_units(&self) -> Vec<f64> {
        self.units.iter().copied().filter(|v| v.is_finite()).collect()
    }

    /// The series without its first observation.
    ///
    /// Differencing consumes one leading value; the working series a
    /// non-stationary product is fitted on is this tail.
    pub fn without_first(&self) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        Self {
            product_id: self.product_id.clone(),
            dates: self.dates[1..].to_vec(),
            units: self.units[1..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| date(2023 + i as i32 / 12, 1 + (i as u32 % 12), 1))
            .collect()
    }

    #[test]
    fn constructs_ordered_series() {
        let dates = monthly_dates(3);
        let series = ProductSeries::new("P001", dates.clone(), vec![10.0, 12.0, 9.0]).unwrap();

        assert_eq!(series.product_id(), "P001");
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
        assert_eq!(series.dates(), &dates[..]);
        assert_eq!(series.units(), &[10.0, 12.0, 9.0]);
        assert_eq!(series.last_date(), Some(date(2023, 3, 1)));
    }

    #[test]
    fn rejects_length_mismatch() {
        let result = ProductSeries::new("P001", monthly_dates(3), vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn rejects_unsorted_dates() {
        let dates = vec![date(2024, 3, 1), date(2024, 1, 1)];
        let result = ProductSeries::new("P001", dates, vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::DateError(_))));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let dates = vec![date(2024, 1, 1), date(2024, 1, 1)];
        let result = ProductSeries::new("P001", dates, vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::DateError(_))));
    }

    #[test]
    fn finite_units_drops_nan_and_inf() {
        let series = ProductSeries::new(
            "P001",
            monthly_dates(4),
            vec![1.0, f64::NAN, f64::INFINITY, 4.0],
        )
        .unwrap();
        assert_eq!(series.finite_units(), vec![1.0, 4.0]);
    }

    #[test]
    fn without_first_drops_leading_observation() {
        let series =
            ProductSeries::new("P001", monthly_dates(3), vec![10.0, 12.0, 9.0]).unwrap();
        let tail = series.without_first();

        assert_eq!(tail.len(), 2);
        assert_eq!(tail.units(), &[12.0, 9.0]);
        assert_eq!(tail.dates()[0], date(2023, 2, 1));
        assert_eq!(tail.product_id(), "P001");
        assert_eq!(tail.last_date(), series.last_date());
    }

    #[test]
    fn without_first_on_empty_is_empty() {
        let series = ProductSeries::new("P001", vec![], vec![]).unwrap();
        assert!(series.without_first().is_empty());
    }
}
