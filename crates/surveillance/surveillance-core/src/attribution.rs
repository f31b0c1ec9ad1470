//! Attribution table construction and lookup.

use std::collections::BTreeSet;

use chrono::Datelike;
use surveillance_api::{AttributionConfig, Granularity};
use surveillance_spi::{AttributionTable, Period, RawTable, Result, SurveillanceError};
use tracing::debug;

use crate::periods::parse_date_with;

/// Build an attribution table from a dated request log.
///
/// Records whose date does not parse are dropped, as are records without a
/// service name. ISO week numbers carry no year, so requests from the same
/// week of different years share a period.
pub fn build_attribution(table: &RawTable, config: &AttributionConfig) -> Result<AttributionTable> {
    let table = table.with_trimmed_headers();
    let date_column = table
        .column_index(&config.date_column)
        .ok_or_else(|| SurveillanceError::schema(config.date_column.as_str()))?;
    let service_column = table
        .column_index(&config.service_column)
        .ok_or_else(|| SurveillanceError::schema(config.service_column.as_str()))?;

    let mut attribution = AttributionTable::new();
    let mut bad_dates = 0;
    let mut no_service = 0;

    for row in 0..table.row_count() {
        let Some(date) = table
            .cell(row, date_column)
            .and_then(|cell| parse_date_with(cell, config.date_order))
        else {
            bad_dates += 1;
            continue;
        };
        let service = table.cell(row, service_column).unwrap_or("");
        if service.is_empty() {
            no_service += 1;
            continue;
        }
        let period = match config.granularity {
            Granularity::IsoWeek => Period::Week(date.iso_week().week()),
            Granularity::Date => Period::Date(date),
        };
        attribution.insert(period, service);
    }

    debug!(
        "attribution built from {} records: {} periods, {} unparsable dates, {} without service",
        table.row_count(),
        attribution.len(),
        bad_dates,
        no_service
    );

    Ok(attribution)
}

/// Services active during `period`; empty when the period has no records.
pub fn attribute(attribution: &AttributionTable, period: &Period) -> BTreeSet<String> {
    attribution.services(period)
}
