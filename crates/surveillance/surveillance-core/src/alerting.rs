//! Alerting for anomalous windows.

use surveillance_spi::{Alert, AlertSeverity, AnalysisResult, AttributionTable, VariabilityBand};

/// Severity of `value` against the severe fences `q1 - k·iqr` and `q3 + k·iqr`.
pub fn severity(value: f64, band: &VariabilityBand, severe_multiplier: f64) -> AlertSeverity {
    let severe_upper = band.q3 + severe_multiplier * band.iqr;
    let severe_lower = band.q1 - severe_multiplier * band.iqr;
    if value > severe_upper || value < severe_lower {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    }
}

/// Create an alert for a HIGH or LOW analysis; `None` when the latest value
/// is within the band.
pub fn create_alert(
    result: &AnalysisResult,
    attribution: Option<&AttributionTable>,
    severe_multiplier: f64,
) -> Option<Alert> {
    if !result.is_anomalous() {
        return None;
    }
    let mut builder = AlertBuilder::new(result).severe_multiplier(severe_multiplier);
    if let Some(attribution) = attribution {
        builder = builder.services(attribution.services(&result.latest_period));
    }
    Some(builder.build())
}

/// Alert builder for custom alert creation.
#[derive(Debug, Clone)]
pub struct AlertBuilder<'a> {
    result: &'a AnalysisResult,
    services: Vec<String>,
    severe_multiplier: f64,
    severity: Option<AlertSeverity>,
    message: Option<String>,
}

impl<'a> AlertBuilder<'a> {
    /// Create a new alert builder for the latest value of `result`.
    pub fn new(result: &'a AnalysisResult) -> Self {
        Self {
            result,
            services: Vec::new(),
            severe_multiplier: 3.0,
            severity: None,
            message: None,
        }
    }

    /// Services to report for the flagged period.
    pub fn services(mut self, services: impl IntoIterator<Item = String>) -> Self {
        self.services = services.into_iter().collect();
        self
    }

    pub fn severe_multiplier(mut self, severe_multiplier: f64) -> Self {
        self.severe_multiplier = severe_multiplier;
        self
    }

    /// Set custom severity.
    pub fn severity(mut self, severity: AlertSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Set custom message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Build the alert.
    pub fn build(self) -> Alert {
        let result = self.result;
        let severity = self.severity.unwrap_or_else(|| {
            severity(result.latest_value, &result.band, self.severe_multiplier)
        });

        let message = self.message.unwrap_or_else(|| {
            format!(
                "{} {} in period {}: value={:.2}, band=[{:.2}, {:.2}]",
                result.metric(),
                result.classification,
                result.latest_period,
                result.latest_value,
                result.band.lower,
                result.band.upper
            )
        });

        Alert {
            metric: result.metric().to_string(),
            period: result.latest_period,
            value: result.latest_value,
            classification: result.classification,
            severity,
            band: result.band,
            services: self.services,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RobustBandAnalyzer;
    use surveillance_spi::{Classification, NormalizedSeries, Period, SeriesAnalyzer};

    fn analyze(pairs: &[(u32, f64)]) -> AnalysisResult {
        let series = NormalizedSeries::from_weeks("% AMX", pairs);
        let window = series.period_range().unwrap();
        RobustBandAnalyzer::default().analyze(&series, &window).unwrap()
    }

    #[test]
    fn test_no_alert_for_normal() {
        let result = analyze(&[(1, 10.0), (2, 11.0), (3, 10.5), (4, 10.8)]);
        assert!(create_alert(&result, None, 3.0).is_none());
    }

    #[test]
    fn test_alert_carries_services() {
        let result = analyze(&[(1, 2.0), (2, 3.0), (3, 2.5), (4, 50.0)]);
        let attribution: AttributionTable = vec![(Period::Week(4), "Urgences")].into_iter().collect();

        let alert = create_alert(&result, Some(&attribution), 3.0).unwrap();
        assert_eq!(alert.period, Period::Week(4));
        assert_eq!(alert.classification, Classification::High);
        assert_eq!(alert.services, vec!["Urgences"]);
        assert!(alert.message.contains("HIGH"));
    }

    #[test]
    fn test_severity_fences() {
        // q1 = 10, q3 = 20, iqr = 10: mild above 35, severe above 50
        let result = analyze(&[(1, 10.0), (2, 10.0), (3, 20.0), (4, 20.0), (5, 15.0)]);
        assert_eq!(severity(40.0, &result.band, 3.0), AlertSeverity::Warning);
        assert_eq!(severity(51.0, &result.band, 3.0), AlertSeverity::Critical);
    }

    #[test]
    fn test_builder_overrides() {
        let result = analyze(&[(1, 2.0), (2, 3.0), (3, 2.5), (4, 50.0)]);
        let alert = AlertBuilder::new(&result)
            .severity(AlertSeverity::Critical)
            .message("custom")
            .build();
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.message, "custom");
        assert!(alert.services.is_empty());
    }
}
