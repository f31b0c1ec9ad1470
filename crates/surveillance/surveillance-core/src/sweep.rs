//! Cross-table alert sweep.

use std::collections::BTreeMap;

use surveillance_spi::{
    AttributionTable, Exceedance, ImplicatedPeriod, Period, RawTable, Result, SeriesAnalyzer,
    SeriesNormalizer, SurveillanceError, SweepReport,
};
use tracing::{info, warn};

/// A named metric table and the normalizer that reads it.
pub struct SweepSource<'a> {
    pub name: &'a str,
    pub table: &'a RawTable,
    pub normalizer: &'a dyn SeriesNormalizer,
}

impl<'a> SweepSource<'a> {
    pub fn new(name: &'a str, table: &'a RawTable, normalizer: &'a dyn SeriesNormalizer) -> Self {
        Self {
            name,
            table,
            normalizer,
        }
    }
}

/// Flag every period where any metric of any table exceeds the upper fence
/// of its whole series, then attach the services active in each period.
///
/// Metrics without a single value are skipped.
pub fn alert_sweep(
    sources: &[SweepSource<'_>],
    attribution: &AttributionTable,
    analyzer: &dyn SeriesAnalyzer,
) -> Result<SweepReport> {
    let mut flagged: BTreeMap<Period, Vec<Exceedance>> = BTreeMap::new();
    let mut metrics = 0;

    for source in sources {
        for series in source.normalizer.normalize_all(source.table)? {
            let (band, points) = match analyzer.exceedances(&series) {
                Ok(found) => found,
                Err(SurveillanceError::AllMissing { metric }) => {
                    warn!("sweep skipped {} in {}: no values", metric, source.name);
                    continue;
                }
                Err(e) => return Err(e),
            };
            metrics += 1;

            for point in points {
                let Some(value) = point.value else { continue };
                flagged.entry(point.period).or_default().push(Exceedance {
                    source: source.name.to_string(),
                    metric: series.metric().to_string(),
                    value,
                    upper: band.upper,
                });
            }
        }
    }

    let periods: Vec<ImplicatedPeriod> = flagged
        .into_iter()
        .map(|(period, exceedances)| ImplicatedPeriod {
            period,
            exceedances,
            services: attribution.services(&period).into_iter().collect(),
        })
        .collect();

    info!(
        "sweep over {} sources and {} metrics flagged {} periods",
        sources.len(),
        metrics,
        periods.len()
    );

    Ok(SweepReport { periods })
}
