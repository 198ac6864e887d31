//! Forecast export to a single Excel workbook.

use std::path::Path;

use simple_excel_writer::{row, Row, Workbook};

use crate::data::ForecastRecord;
use crate::error::{ForecastError, Result};

/// Worksheet name in the output workbook.
pub const FORECAST_SHEET: &str = "Forecasts";

/// Write all forecast records to one `.xlsx` sheet, overwriting any existing
/// file at `path`.
///
/// Columns: `Date, Product ID, Forecasted Units Sold`; one row per record, in
/// the order given.
pub fn write_forecasts<P: AsRef<Path>>(path: P, records: &[ForecastRecord]) -> Result<()> {
    let path = path
        .as_ref()
        .to_str()
        .ok_or_else(|| ForecastError::Io("output path is not valid UTF-8".to_string()))?;

    let mut workbook = Workbook::create(path);
    let mut sheet = workbook.create_sheet(FORECAST_SHEET);

    workbook
        .write_sheet(&mut sheet, |writer| {
            writer.append_row(row!["Date", "Product ID", "Forecasted Units Sold"])?;
            for record in records {
                writer.append_row(row![
                    record.date.format("%Y-%m-%d").to_string(),
                    record.product_id.as_str(),
                    record.forecast_units
                ])?;
            }
            Ok(())
        })
        .map_err(|e| ForecastError::Io(format!("could not write workbook: {e}")))?;

    workbook
        .close()
        .map_err(|e| ForecastError::Io(format!("could not save workbook: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn writes_a_workbook_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let records = vec![ForecastRecord {
            date: NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
            product_id: "P001".to_string(),
            forecast_units: 42.5,
        }];

        write_forecasts(&path, &records).unwrap();
        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn empty_record_set_still_produces_a_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        write_forecasts(&path, &[]).unwrap();
        assert!(path.exists());
    }
}
