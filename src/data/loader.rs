//! Historical sales data loading from Excel workbooks.

use std::path::Path;

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use chrono::NaiveDate;

use crate::data::SalesRecord;
use crate::error::{ForecastError, Result};

/// Default worksheet holding the raw history.
pub const HISTORY_SHEET: &str = "Historical Raw Data";

const DATE_COLUMN: &str = "Date";
const PRODUCT_COLUMN: &str = "Product ID";
const UNITS_COLUMN: &str = "Units Sold";

/// Load historical sales records from the named sheet of an `.xlsx` workbook.
///
/// The sheet must carry a header row naming the `Date`, `Product ID`, and
/// `Units Sold` columns (any order, extra columns ignored). Date cells may be
/// native Excel dates or `YYYY-MM-DD` strings. A missing file, missing sheet,
/// missing column, or unparseable cell is an error; rows that are entirely
/// empty are skipped.
pub fn load_history<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Vec<SalesRecord>> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())
        .map_err(|e| ForecastError::Io(format!("could not open workbook: {e}")))?;

    if !workbook.sheet_names().iter().any(|name| name.as_str() == sheet) {
        return Err(ForecastError::SheetNotFound(sheet.to_string()));
    }
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| ForecastError::Io(format!("could not read sheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(ForecastError::EmptyData)?;

    let date_col = find_column(header, DATE_COLUMN)?;
    let product_col = find_column(header, PRODUCT_COLUMN)?;
    let units_col = find_column(header, UNITS_COLUMN)?;

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        // 1-based sheet row number, counting the header.
        let row_number = index + 2;

        let date = parse_date(row.get(date_col), row_number)?;
        let product_id = parse_product_id(row.get(product_col), row_number)?;
        let units_sold = parse_units(row.get(units_col), row_number)?;

        records.push(SalesRecord {
            date,
            product_id,
            units_sold,
        });
    }

    Ok(records)
}

fn find_column(header: &[Data], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell.as_string().map(|s| s.trim() == name).unwrap_or(false))
        .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
}

fn parse_date(cell: Option<&Data>, row: usize) -> Result<NaiveDate> {
    let cell = cell.unwrap_or(&Data::Empty);
    if let Some(date) = cell.as_date() {
        return Ok(date);
    }
    if let Some(text) = cell.get_string() {
        if let Ok(date) = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
            return Ok(date);
        }
    }
    Err(ForecastError::InvalidCell {
        row,
        column: DATE_COLUMN,
        detail: format!("expected a date, got '{cell}'"),
    })
}

fn parse_product_id(cell: Option<&Data>, row: usize) -> Result<String> {
    let id = cell
        .and_then(|c| c.as_string())
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if id.is_empty() {
        return Err(ForecastError::InvalidCell {
            row,
            column: PRODUCT_COLUMN,
            detail: "expected a product identifier".to_string(),
        });
    }
    Ok(id)
}

fn parse_units(cell: Option<&Data>, row: usize) -> Result<f64> {
    cell.and_then(|c| c.as_f64())
        .ok_or_else(|| ForecastError::InvalidCell {
            row,
            column: UNITS_COLUMN,
            detail: format!(
                "expected a number, got '{}'",
                cell.unwrap_or(&Data::Empty)
            ),
        })
}
