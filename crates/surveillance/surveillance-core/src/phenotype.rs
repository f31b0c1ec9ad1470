//! Phenotype share derivation.

use surveillance_api::{NormalizerConfig, PhenotypeConfig};
use surveillance_spi::{PeriodKind, RawTable, Result, SurveillanceError};
use tracing::debug;

use crate::normalizer::PeriodNormalizer;
use crate::periods::{parse_date_with, parse_metric};

const TOTAL_COLUMN: &str = "Total";

/// Turn per-period phenotype counts into percentage shares.
///
/// The output holds the period column (ISO dates), the counts, a `Total`
/// column and one share column per phenotype. Rows whose date does not
/// parse are dropped. Missing counts add nothing to the total; a share is
/// missing when its count is missing or the total is zero.
pub fn derive_phenotype_shares(table: &RawTable, config: &PhenotypeConfig) -> Result<RawTable> {
    let table = table.with_trimmed_headers();
    let period_column = table
        .column_index(&config.period_column)
        .ok_or_else(|| SurveillanceError::schema(config.period_column.as_str()))?;

    let missing: Vec<&str> = config
        .phenotypes
        .iter()
        .filter(|p| table.column_index(p).is_none())
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(SurveillanceError::schema(format!(
            "phenotype columns [{}]",
            missing.join(", ")
        )));
    }
    let count_columns: Vec<usize> = config
        .phenotypes
        .iter()
        .filter_map(|p| table.column_index(p))
        .collect();

    let mut headers = vec![config.period_column.clone()];
    headers.extend(config.phenotypes.iter().cloned());
    headers.push(TOTAL_COLUMN.to_string());
    headers.extend(config.phenotypes.iter().map(|p| config.share_column(p)));

    let mut shares = RawTable::new(headers, Vec::new());
    for row in 0..table.row_count() {
        let Some(date) = table
            .cell(row, period_column)
            .and_then(|cell| parse_date_with(cell, config.date_order))
        else {
            continue;
        };
        let counts: Vec<Option<f64>> = count_columns
            .iter()
            .map(|&column| table.cell(row, column).and_then(parse_metric))
            .collect();
        let total: f64 = counts.iter().flatten().sum();

        let mut cells = vec![date.format("%Y-%m-%d").to_string()];
        cells.extend(counts.iter().map(|count| format_cell(*count)));
        cells.push(total.to_string());
        cells.extend(counts.iter().map(|count| {
            format_cell(count.filter(|_| total != 0.0).map(|count| count / total * 100.0))
        }));
        shares.push_row(cells);
    }

    debug!(
        "derived phenotype shares for {} of {} rows",
        shares.row_count(),
        table.row_count()
    );

    Ok(shares)
}

/// Normalizer reading the share columns produced by [`derive_phenotype_shares`].
pub fn phenotype_normalizer(config: &PhenotypeConfig) -> PeriodNormalizer {
    PeriodNormalizer::new(NormalizerConfig::new(
        &[config.period_column.as_str()],
        PeriodKind::Date,
        &config.share_prefix,
    ))
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveillance_spi::SeriesNormalizer;

    fn counts() -> RawTable {
        RawTable::from_columns(vec![
            ("week ", vec!["2024-01-01", "2024-01-08", "n/a", "2024-01-15"]),
            ("MRSA", vec!["2", "1", "5", "0"]),
            ("Other", vec!["1", "", "5", "0"]),
            ("VRSA", vec!["0", "0", "5", "0"]),
            ("Wild", vec!["5", "3", "5", "0"]),
        ])
    }

    #[test]
    fn test_shares_sum_counts() {
        let shares = derive_phenotype_shares(&counts(), &PhenotypeConfig::default()).unwrap();
        assert_eq!(shares.row_count(), 3);
        assert_eq!(shares.column("Total").unwrap(), vec!["8", "4", "0"]);
        assert_eq!(shares.column("% MRSA").unwrap()[0], "25");
        assert_eq!(shares.column("% Wild").unwrap()[1], "75");
    }

    #[test]
    fn test_missing_count_gives_missing_share() {
        let shares = derive_phenotype_shares(&counts(), &PhenotypeConfig::default()).unwrap();
        assert_eq!(shares.column("% Other").unwrap()[1], "");
    }

    #[test]
    fn test_zero_total_gives_missing_share() {
        let shares = derive_phenotype_shares(&counts(), &PhenotypeConfig::default()).unwrap();
        assert_eq!(shares.column("% MRSA").unwrap()[2], "");
    }

    #[test]
    fn test_missing_phenotype_column() {
        let table = RawTable::from_columns(vec![("week", vec!["2024-01-01"]), ("MRSA", vec!["1"])]);
        let result = derive_phenotype_shares(&table, &PhenotypeConfig::default());
        assert_eq!(
            result,
            Err(SurveillanceError::schema("phenotype columns [Other, VRSA, Wild]"))
        );
    }

    #[test]
    fn test_missing_period_column() {
        let table = RawTable::from_columns(vec![("date", vec!["2024-01-01"])]);
        let result = derive_phenotype_shares(&table, &PhenotypeConfig::default());
        assert_eq!(result, Err(SurveillanceError::schema("week")));
    }

    #[test]
    fn test_shares_feed_the_normalizer() {
        let config = PhenotypeConfig::default();
        let shares = derive_phenotype_shares(&counts(), &config).unwrap();
        let normalizer = phenotype_normalizer(&config);

        let metrics = normalizer.metric_columns(&shares).unwrap();
        assert_eq!(metrics, vec!["% MRSA", "% Other", "% VRSA", "% Wild"]);

        let series = normalizer.normalize(&shares, "% MRSA").unwrap();
        assert_eq!(series.kind(), PeriodKind::Date);
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), vec![25.0, 25.0]);
    }
}
