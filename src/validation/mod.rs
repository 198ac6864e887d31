//! Statistical validation tests for time series.

pub mod stationarity;

pub use stationarity::{adf_test, CriticalValues, StationarityReport};
