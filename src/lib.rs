//! # demandcast
//!
//! Per-product sales demand forecasting.
//!
//! Loads historical sales records from an Excel workbook, aggregates them per
//! product, tests each series for stationarity, fits a fixed-order ARIMA model
//! per eligible product, projects a 12-month horizon, exports all forecasts to
//! a single workbook, and renders ACF/PACF and forecast-overlay charts on
//! demand.

pub mod core;
pub mod data;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod utils;
pub mod validation;
pub mod vis;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, ProductSeries};
    pub use crate::data::SalesRecord;
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::Forecaster;
    pub use crate::pipeline::{run_batch, ForecastStore, PipelineConfig};
}
