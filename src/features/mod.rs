//! Diagnostic feature extraction for time series.

pub mod autocorrelation;

pub use autocorrelation::{acf, acf_profile, pacf, pacf_profile};
