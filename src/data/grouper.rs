//! Per-product aggregation of raw sales records.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::core::ProductSeries;
use crate::data::SalesRecord;
use crate::error::Result;

/// Partition records by product id, sum units per date, and sort by date.
///
/// Products come back in first-appearance order of their ids in `records`.
/// Pure function of the input; a product present in the input always yields a
/// (possibly short) series.
pub fn group_by_product(records: &[SalesRecord]) -> Result<Vec<ProductSeries>> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, BTreeMap<NaiveDate, f64>> = HashMap::new();

    for record in records {
        if !totals.contains_key(record.product_id.as_str()) {
            order.push(record.product_id.as_str());
        }
        let by_date = totals.entry(record.product_id.as_str()).or_default();
        *by_date.entry(record.date).or_insert(0.0) += record.units_sold;
    }

    order
        .into_iter()
        .map(|id| {
            let by_date = totals.remove(id).unwrap_or_default();
            let (dates, units) = by_date.into_iter().unzip();
            ProductSeries::new(id, dates, units)
        })
        .collect()
}
