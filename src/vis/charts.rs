//! Diagnostic chart rendering with plotters.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::ProductSeries;
use crate::data::ForecastRecord;
use crate::error::{ForecastError, Result};
use crate::features::{acf_profile, pacf_profile};

/// Lag window for the ACF/PACF panels.
pub const DIAG_LAG_WINDOW: usize = 10;

const ACF_CHART_SIZE: (u32, u32) = (900, 420);
const OVERLAY_CHART_SIZE: (u32, u32) = (1000, 500);

fn chart_err<E: std::fmt::Display>(e: E) -> ForecastError {
    ForecastError::ChartError(e.to_string())
}

/// Render the two-panel ACF/PACF chart for a product's historical units.
///
/// Both panels cover lags `0..=DIAG_LAG_WINDOW` and draw the ±1.96/√n
/// significance bounds.
pub fn render_acf_pacf(path: &Path, series: &ProductSeries) -> Result<()> {
    let units = series.units();
    if units.len() <= DIAG_LAG_WINDOW {
        return Err(ForecastError::InsufficientData {
            needed: DIAG_LAG_WINDOW + 1,
            got: units.len(),
        });
    }

    let acf = acf_profile(units, DIAG_LAG_WINDOW);
    let pacf = pacf_profile(units, DIAG_LAG_WINDOW);
    let bound = 1.96 / (units.len() as f64).sqrt();

    let root = BitMapBackend::new(path, ACF_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let panels = root.split_evenly((1, 2));
    draw_stem_panel(
        &panels[0],
        &format!("ACF for {}", series.product_id()),
        &acf,
        bound,
    )?;
    draw_stem_panel(
        &panels[1],
        &format!("PACF for {}", series.product_id()),
        &pacf,
        bound,
    )?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn draw_stem_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    values: &[f64],
    bound: f64,
) -> Result<()> {
    let max_lag = values.len().saturating_sub(1);
    let y_min = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(-bound, f64::min)
        .min(-0.2)
        - 0.1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(28)
        .y_label_area_size(40)
        .build_cartesian_2d(-0.5..(max_lag as f64 + 0.5), y_min..1.1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Lag")
        .draw()
        .map_err(chart_err)?;

    for level in [bound, -bound] {
        chart
            .draw_series(LineSeries::new(
                vec![(-0.5, level), (max_lag as f64 + 0.5, level)],
                BLUE.mix(0.4),
            ))
            .map_err(chart_err)?;
    }

    for (lag, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        chart
            .draw_series(LineSeries::new(
                vec![(lag as f64, 0.0), (lag as f64, value)],
                &BLACK,
            ))
            .map_err(chart_err)?;
    }
    chart
        .draw_series(
            values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(lag, &value)| Circle::new((lag as f64, value), 3, BLUE.filled())),
        )
        .map_err(chart_err)?;

    Ok(())
}

/// Render the historical-vs-forecast overlay line chart.
pub fn render_forecast_overlay(
    path: &Path,
    series: &ProductSeries,
    forecast: &[ForecastRecord],
) -> Result<()> {
    if series.is_empty() || forecast.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let history: Vec<(chrono::NaiveDate, f64)> = series
        .dates()
        .iter()
        .copied()
        .zip(series.units().iter().copied())
        .collect();
    let forecast_points: Vec<(chrono::NaiveDate, f64)> = forecast
        .iter()
        .map(|r| (r.date, r.forecast_units))
        .collect();

    let x_start = history[0].0;
    let x_end = forecast_points[forecast_points.len() - 1].0;

    let all_values = history
        .iter()
        .chain(forecast_points.iter())
        .map(|(_, v)| *v);
    let mut y_min = all_values.clone().fold(f64::INFINITY, f64::min);
    let mut y_max = all_values.fold(f64::NEG_INFINITY, f64::max);
    if y_min == y_max {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = (y_max - y_min) * 0.05;

    let root = BitMapBackend::new(path, OVERLAY_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("ARIMA forecast for product {}", series.product_id()),
            ("sans-serif", 20),
        )
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(52)
        .build_cartesian_2d(x_start..x_end, (y_min - pad)..(y_max + pad))
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Units Sold")
        .x_label_formatter(&|d| d.format("%Y-%m").to_string())
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(history.iter().copied(), &BLUE))
        .map_err(chart_err)?
        .label("Historical Sales")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(
            history
                .iter()
                .map(|&(date, value)| Circle::new((date, value), 3, BLUE.filled())),
        )
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(forecast_points.iter().copied(), &RED))
        .map_err(chart_err)?
        .label("Forecasted Sales")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .draw_series(
            forecast_points
                .iter()
                .map(|&(date, value)| Circle::new((date, value), 3, RED.filled())),
        )
        .map_err(chart_err)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
