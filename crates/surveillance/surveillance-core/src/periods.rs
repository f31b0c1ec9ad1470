//! Cell coercion: period keys and metric values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use surveillance_api::DateOrder;
use surveillance_spi::{Period, PeriodKind};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const MONTH_FIRST_DATE_FORMATS: &[&str] =
    &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const MONTH_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// True when `raw` is a non-empty run of ASCII digits.
///
/// No trimming: `" 12"` is not a week token.
pub fn is_week_token(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Week number of a digit-only cell.
pub fn parse_week(raw: &str) -> Option<u32> {
    if !is_week_token(raw) {
        return None;
    }
    raw.parse().ok()
}

/// Calendar date of a cell, reading slashed dates day-first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_date_with(raw, DateOrder::DayFirst)
}

/// Calendar date of a cell. ISO layouts are tried before `order`'s ones;
/// a time of day is accepted and discarded.
pub fn parse_date_with(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let (date_formats, datetime_formats) = match order {
        DateOrder::DayFirst => (DATE_FORMATS, DATETIME_FORMATS),
        DateOrder::MonthFirst => (MONTH_FIRST_DATE_FORMATS, MONTH_FIRST_DATETIME_FORMATS),
    };
    for format in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Period of a cell under the given representation.
pub fn parse_period(kind: PeriodKind, raw: &str) -> Option<Period> {
    match kind {
        PeriodKind::Week => parse_week(raw).map(Period::Week),
        PeriodKind::Date => parse_date(raw).map(Period::Date),
    }
}

/// Numeric value of a metric cell; anything non-numeric or non-finite is missing.
pub fn parse_metric(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_tokens() {
        assert!(is_week_token("12"));
        assert!(is_week_token("007"));
        assert!(!is_week_token(""));
        assert!(!is_week_token("x"));
        assert!(!is_week_token("12.0"));
        assert!(!is_week_token(" 12"));
        assert!(!is_week_token("-1"));
    }

    #[test]
    fn test_parse_week() {
        assert_eq!(parse_week("7"), Some(7));
        assert_eq!(parse_week("007"), Some(7));
        assert_eq!(parse_week("S7"), None);
        assert_eq!(parse_week("99999999999"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-03-04"), Some(date(2024, 3, 4)));
        assert_eq!(parse_date(" 2024/03/04 "), Some(date(2024, 3, 4)));
        assert_eq!(parse_date("04/03/2024"), Some(date(2024, 3, 4)));
        assert_eq!(parse_date("2024-03-04 08:15:00"), Some(date(2024, 3, 4)));
        assert_eq!(parse_date("2024-03-04T08:15:00.250"), Some(date(2024, 3, 4)));
        assert_eq!(parse_date("2024-03-04T08:15:00+01:00"), Some(date(2024, 3, 4)));
    }

    #[test]
    fn test_parse_date_month_first() {
        assert_eq!(
            parse_date_with("03/01/2024", DateOrder::MonthFirst),
            Some(date(2024, 3, 1))
        );
        assert_eq!(
            parse_date_with("03/01/2024 08:15", DateOrder::MonthFirst),
            Some(date(2024, 3, 1))
        );
        assert_eq!(
            parse_date_with("2024-01-03", DateOrder::MonthFirst),
            Some(date(2024, 1, 3))
        );
        assert_eq!(parse_date_with("13/01/2024", DateOrder::MonthFirst), None);
        assert_eq!(parse_date("03/01/2024"), Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn test_parse_period_by_kind() {
        assert_eq!(parse_period(PeriodKind::Week, "3"), Some(Period::Week(3)));
        assert_eq!(parse_period(PeriodKind::Week, "2024-01-01"), None);
        assert_eq!(
            parse_period(PeriodKind::Date, "2024-01-01"),
            Some(Period::Date(date(2024, 1, 1)))
        );
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric("10"), Some(10.0));
        assert_eq!(parse_metric(" 12.5 "), Some(12.5));
        assert_eq!(parse_metric("abc"), None);
        assert_eq!(parse_metric(""), None);
        assert_eq!(parse_metric("NaN"), None);
        assert_eq!(parse_metric("inf"), None);
    }
}
