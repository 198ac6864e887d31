//! In-memory store of per-product batch results.

use std::collections::HashMap;
use std::fmt;

use crate::core::ProductSeries;
use crate::data::ForecastRecord;
use crate::utils::metrics::AccuracyMetrics;

/// Why a product produced no forecast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer aggregated observations than the eligibility minimum.
    TooFewObservations { got: usize, needed: usize },
    /// Dropped below the minimum after differencing consumed an observation.
    TooFewAfterDifferencing { got: usize, needed: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewObservations { got, needed } => {
                write!(f, "not enough data points ({got} of {needed})")
            }
            SkipReason::TooFewAfterDifferencing { got, needed } => {
                write!(f, "not enough data after differencing ({got} of {needed})")
            }
        }
    }
}

/// Diagnostics retained from fitting one product.
#[derive(Debug, Clone, PartialEq)]
pub struct FitDiagnostics {
    /// Whether the undifferenced series tested stationary.
    pub stationary: bool,
    /// Whether a differencing pass ran.
    pub differenced: bool,
    /// Stationarity verdict of the differenced series. Informational only;
    /// never feeds back into the model order.
    pub stationary_after_differencing: Option<bool>,
    /// Akaike information criterion of the fit.
    pub aic: Option<f64>,
    /// Bayesian information criterion of the fit.
    pub bic: Option<f64>,
    /// In-sample accuracy of the fitted values.
    pub accuracy: Option<AccuracyMetrics>,
}

/// One product's batch output: the history the model saw plus its forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForecast {
    /// Working historical series (tail-trimmed when differencing ran).
    pub series: ProductSeries,
    /// Forecast rows, one per horizon step.
    pub records: Vec<ForecastRecord>,
    /// Fit diagnostics.
    pub diagnostics: FitDiagnostics,
}

/// Results of a batch pass, in product first-appearance order.
///
/// Lives for the process lifetime: populated by the batch pass, read by the
/// exporter and the interactive visualizer.
#[derive(Debug, Clone, Default)]
pub struct ForecastStore {
    products: Vec<ProductForecast>,
    index: HashMap<String, usize>,
    skipped: Vec<(String, SkipReason)>,
}

impl ForecastStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of forecasted products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check whether any product was forecasted.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up one product's results by id.
    pub fn get(&self, product_id: &str) -> Option<&ProductForecast> {
        self.index.get(product_id).map(|&i| &self.products[i])
    }

    /// Forecasted products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = &ProductForecast> {
        self.products.iter()
    }

    /// Products skipped during the batch pass, with reasons, in encounter
    /// order.
    pub fn skipped(&self) -> &[(String, SkipReason)] {
        &self.skipped
    }

    /// All forecast rows concatenated across products, preserving per-product
    /// order and insertion order across products.
    pub fn all_records(&self) -> Vec<ForecastRecord> {
        self.products
            .iter()
            .flat_map(|p| p.records.iter().cloned())
            .collect()
    }

    pub(crate) fn insert(&mut self, product: ProductForecast) {
        let id = product.series.product_id().to_string();
        self.index.insert(id, self.products.len());
        self.products.push(product);
    }

    pub(crate) fn record_skip(&mut self, product_id: String, reason: SkipReason) {
        self.skipped.push((product_id, reason));
    }
}
