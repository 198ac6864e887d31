//! Diagnostic visualization: chart rendering and the interactive loop.

pub mod charts;
pub mod console;

pub use charts::{render_acf_pacf, render_forecast_overlay, DIAG_LAG_WINDOW};
pub use console::{render_product_charts, run_loop};
