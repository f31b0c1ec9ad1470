//! Basic example: analyze a resistance table and attribute the alerts
//!
//! Run with: cargo run --example basic -p surveillance

use surveillance::{
    build_attribution, AttributionConfig, Monitor, PeriodNormalizer, RawTable,
    RobustBandAnalyzer, SeriesAnalyzer, SeriesNormalizer, Window,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== surveillance Basic Example ===\n");

    let resistance = RawTable::from_columns(vec![
        ("Week", vec!["1", "2", "3", "4", "5", "6"]),
        ("% AMX", vec!["2", "3", "2.5", "2.8", "3.1", "50"]),
        ("% CIP", vec!["10", "11", "10.5", "0.5", "10.7", ""]),
    ]);
    let requests = RawTable::from_columns(vec![
        ("DATE_ENTREE", vec!["2024-02-05", "2024-02-07", "2024-01-22"]),
        ("LIBELLE_DEMANDEUR", vec!["Urgences", "Reanimation", "Cardiologie"]),
    ]);

    // 1. Per-metric analysis
    let normalizer = PeriodNormalizer::antibiotics();
    let analyzer = RobustBandAnalyzer::default();
    let window = Window::weeks(1, 6);

    println!("1. Robust band over {}", window);
    for metric in normalizer.metric_columns(&resistance)? {
        let series = normalizer.normalize(&resistance, &metric)?;
        let result = analyzer.analyze(&series, &window)?;
        println!(
            "   {:6} band=[{:.2}, {:.2}] latest week {} = {:.2} -> {}",
            metric,
            result.band.lower,
            result.band.upper,
            result.latest_period,
            result.latest_value,
            result.classification
        );
    }

    // 2. Alerts with the services active in the flagged week
    println!("\n2. Alerts");
    let attribution = build_attribution(&requests, &AttributionConfig::default())?;
    let monitor = Monitor::new(normalizer, analyzer);
    for alert in monitor.current_alerts(&resistance, &window, Some(&attribution))? {
        println!("   [{:?}] {}", alert.severity, alert.message);
        println!("   services: {:?}", alert.services);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
