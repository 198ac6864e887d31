//! Interactive chart loop.
//!
//! Reads product ids from the console until the exit sentinel, rendering the
//! diagnostic charts for each valid id into the plot directory.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{ForecastError, Result};
use crate::pipeline::{ForecastStore, ProductForecast};
use crate::vis::charts;

/// Case-insensitive sentinel that terminates the loop.
const EXIT_SENTINEL: &str = "exit";

/// Run the interactive visualization loop.
///
/// Prompts on `output`, reads ids from `input`. Unknown ids report an error
/// and re-prompt; chart failures for one product are reported and the loop
/// continues; `exit` (any case) or end of input terminates cleanly.
pub fn run_loop<R: BufRead, W: Write>(
    store: &ForecastStore,
    plot_dir: &Path,
    input: R,
    output: &mut W,
) -> Result<()> {
    fs::create_dir_all(plot_dir)
        .map_err(|e| ForecastError::Io(format!("could not create plot directory: {e}")))?;

    let mut lines = input.lines();
    loop {
        write!(
            output,
            "\nEnter a Product ID to visualize ACF, PACF, and forecast (or 'exit' to quit): "
        )
        .map_err(|e| ForecastError::Io(e.to_string()))?;
        output.flush().map_err(|e| ForecastError::Io(e.to_string()))?;

        let line = match lines.next() {
            Some(line) => line.map_err(|e| ForecastError::Io(e.to_string()))?,
            None => break,
        };
        let product_id = line.trim();

        if product_id.eq_ignore_ascii_case(EXIT_SENTINEL) {
            break;
        }

        let Some(product) = store.get(product_id) else {
            writeln!(
                output,
                "Invalid Product ID or no forecast available. Please enter a valid one."
            )
            .map_err(|e| ForecastError::Io(e.to_string()))?;
            continue;
        };

        match render_product_charts(plot_dir, product) {
            Ok((diagnostics, overlay)) => {
                writeln!(
                    output,
                    "Wrote {} and {}",
                    diagnostics.display(),
                    overlay.display()
                )
                .map_err(|e| ForecastError::Io(e.to_string()))?;
            }
            Err(e) => {
                writeln!(output, "Could not render charts for {product_id}: {e}")
                    .map_err(|e| ForecastError::Io(e.to_string()))?;
            }
        }
    }

    Ok(())
}

/// Render both charts for one product; returns the written paths
/// (ACF/PACF panel, forecast overlay).
pub fn render_product_charts(
    plot_dir: &Path,
    product: &ProductForecast,
) -> Result<(PathBuf, PathBuf)> {
    let stem = filename_stem(product.series.product_id());
    let diagnostics_path = plot_dir.join(format!("{stem}_acf_pacf.png"));
    let overlay_path = plot_dir.join(format!("{stem}_forecast.png"));

    charts::render_acf_pacf(&diagnostics_path, &product.series)?;
    charts::render_forecast_overlay(&overlay_path, &product.series, &product.records)?;

    Ok((diagnostics_path, overlay_path))
}

/// Product ids may carry characters hostile to filenames.
fn filename_stem(product_id: &str) -> String {
    product_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
