//! End-to-end tests for surveillance
//!
//! Exercises complete workflows through the public API only: loading
//! tables, analyzing a window, attributing alerts and sweeping tables.

use surveillance::{
    alert_sweep, build_attribution, derive_phenotype_shares, phenotype_normalizer,
    AlertSeverity, AnalysisCache, AttributionConfig, BacteriaCatalog, CatalogConfig,
    Classification, Monitor, NaiveDate, Period, PeriodNormalizer, PhenotypeConfig, RawTable,
    RobustBandAnalyzer, SeriesAnalyzer, SeriesNormalizer, SurveillanceConfig, SweepSource,
    Window,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn antibiotic_table() -> RawTable {
    RawTable::from_columns(vec![
        ("Week", vec!["1", "2", "3", "4", "5", "6", "7", "8"]),
        ("% AMX", vec!["2", "3", "2.5", "2", "3", "2.5", "3", "50"]),
        ("% CIP", vec!["10", "11", "10.5", "10", "11", "10.5", "11", "10.8"]),
    ])
}

fn other_table() -> RawTable {
    RawTable::from_columns(vec![
        ("Semaine", vec!["1", "2", "3", "4", "5", "6", "7", "8"]),
        ("% Vanco", vec!["1", "1", "1", "1", "1", "1", "1", "1"]),
        ("% Oxa", vec!["", "", "", "", "", "", "", ""]),
    ])
}

fn requests_table() -> RawTable {
    RawTable::from_columns(vec![
        (
            "DATE_ENTREE",
            vec!["2024-02-19", "2024-02-21", "2024-01-03", "not a date", "2024-02-20"],
        ),
        (
            "LIBELLE_DEMANDEUR",
            vec!["Urgences", "Reanimation", "Cardiologie", "Urgences", ""],
        ),
    ])
}

#[test]
fn e2e_spike_workflow() {
    let table = RawTable::from_columns(vec![
        ("Week", vec!["1", "2", "3", "4"]),
        ("% AMX", vec!["2", "3", "2.5", "50"]),
    ]);
    let monitor = Monitor::from_config(Default::default(), Default::default());

    let columns = monitor.metric_columns(&table).unwrap();
    assert_eq!(columns, vec!["% AMX"]);

    let window = monitor.period_range(&table, "% AMX").unwrap().unwrap();
    assert_eq!(window, Window::weeks(1, 4));

    let result = monitor.analyze_metric(&table, "% AMX", &window).unwrap();
    assert_eq!(result.classification, Classification::High);
    assert_eq!(result.latest_period, Period::Week(4));
    assert_eq!(result.summary.peak_period, Period::Week(4));
    assert_eq!(result.band.lower, 0.0);
    assert!(result.latest_value > result.band.upper);
}

#[test]
fn e2e_drop_workflow() {
    let table = RawTable::from_columns(vec![
        ("Week", vec!["1", "2", "3", "4", "5"]),
        ("% CIP", vec!["10", "11", "10.5", "0.5", ""]),
    ]);
    let normalizer = PeriodNormalizer::antibiotics();
    let series = normalizer.normalize(&table, "% CIP").unwrap();
    let result = RobustBandAnalyzer::default()
        .analyze(&series, &Window::weeks(1, 5))
        .unwrap();

    assert_eq!(result.latest_period, Period::Week(4));
    assert_eq!(result.classification, Classification::Low);
    assert!((result.band.lower - 3.125).abs() < 1e-10);
}

#[test]
fn e2e_alerts_with_attribution() {
    let attribution = build_attribution(&requests_table(), &AttributionConfig::default()).unwrap();
    let monitor = Monitor::from_config(Default::default(), Default::default());

    let alerts = monitor
        .current_alerts(&antibiotic_table(), &Window::weeks(1, 8), Some(&attribution))
        .unwrap();

    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.metric, "% AMX");
    assert_eq!(alert.period, Period::Week(8));
    assert_eq!(alert.classification, Classification::High);
    assert_eq!(alert.severity, AlertSeverity::Critical);
    assert_eq!(alert.services, vec!["Reanimation", "Urgences"]);
}

#[test]
fn e2e_sweep_across_tables() {
    let attribution = build_attribution(&requests_table(), &AttributionConfig::default()).unwrap();
    let antibiotics = antibiotic_table();
    let others = other_table();
    let normalizer = PeriodNormalizer::antibiotics();
    let analyzer = RobustBandAnalyzer::default();

    let sources = [
        SweepSource::new("antibiotics", &antibiotics, &normalizer),
        SweepSource::new("others", &others, &normalizer),
    ];
    let report = alert_sweep(&sources, &attribution, &analyzer).unwrap();

    assert_eq!(report.flagged_periods(), vec![Period::Week(8)]);
    let implicated = &report.periods[0];
    assert_eq!(implicated.exceedances.len(), 1);
    assert_eq!(implicated.exceedances[0].source, "antibiotics");
    assert_eq!(implicated.exceedances[0].metric, "% AMX");
    assert_eq!(report.services(), vec!["Reanimation", "Urgences"]);
}

#[test]
fn e2e_sweep_without_exceedances() {
    let attribution = build_attribution(&requests_table(), &AttributionConfig::default()).unwrap();
    let others = other_table();
    let normalizer = PeriodNormalizer::antibiotics();

    let report = alert_sweep(
        &[SweepSource::new("others", &others, &normalizer)],
        &attribution,
        &RobustBandAnalyzer::default(),
    )
    .unwrap();

    assert!(report.is_empty());
    assert!(report.services().is_empty());
}

#[test]
fn e2e_phenotype_share_workflow() {
    let counts = RawTable::from_columns(vec![
        (
            "week",
            vec![
                "2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22", "2024-01-29", "2024-02-05",
            ],
        ),
        ("MRSA", vec!["1", "1", "1", "1", "1", "10"]),
        ("Other", vec!["9", "9", "9", "9", "9", "9"]),
        ("VRSA", vec!["0", "0", "0", "0", "0", "0"]),
        ("Wild", vec!["10", "10", "10", "10", "10", "10"]),
    ]);
    let config = PhenotypeConfig::default();

    let shares = derive_phenotype_shares(&counts, &config).unwrap();
    let normalizer = phenotype_normalizer(&config);
    let metrics = normalizer.metric_columns(&shares).unwrap();
    assert_eq!(metrics, vec!["% MRSA", "% Other", "% VRSA", "% Wild"]);

    let series = normalizer.normalize(&shares, "% MRSA").unwrap();
    let result = RobustBandAnalyzer::default()
        .analyze(&series, &Window::dates(date(2024, 1, 1), date(2024, 2, 5)))
        .unwrap();

    assert_eq!(result.latest_period, Period::Date(date(2024, 2, 5)));
    assert_eq!(result.classification, Classification::High);
    assert!((result.summary.peak_value - 1000.0 / 29.0).abs() < 1e-9);
}

#[test]
fn e2e_catalog_lookup() {
    let table = RawTable::from_columns(vec![
        ("Category", vec!["Escherichia coli", "Staphylococcus aureus", ""]),
        ("Key Antibiotics", vec!["AMX, CIP", "OXA, VAN", "GEN"]),
        ("Other Antibiotics", vec!["GEN", "", ""]),
        ("Phenotype", vec!["", "MRSA", ""]),
    ]);
    let catalog = BacteriaCatalog::from_table(&table, &CatalogConfig::default()).unwrap();

    assert_eq!(catalog.len(), 2);
    let hits = catalog.search("AUREUS");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].phenotype.as_deref(), Some("MRSA"));
    assert_eq!(hits[0].other_antibiotics, None);
}

#[test]
fn e2e_config_driven_monitor_with_cache() {
    let config = SurveillanceConfig::from_toml_str(
        r#"
        [band]
        multiplier = 3.0

        [antibiotics]
        period_aliases = ["Semaine"]
        "#,
    )
    .unwrap();
    let cache = AnalysisCache::new();
    let monitor = Monitor::from_config(config.antibiotics, config.band).with_cache(cache.clone());

    let window = Window::weeks(1, 8);
    let first = monitor.analyze_cached("others", &other_table(), "% Vanco", &window).unwrap();
    let again = monitor.analyze_cached("others", &other_table(), "% Vanco", &window).unwrap();

    assert_eq!(first.classification, Classification::Normal);
    assert_eq!(first, again);
    assert_eq!(cache.len(), 1);

    cache.invalidate_table("others");
    assert!(cache.is_empty());
}

#[test]
fn e2e_result_serializes_for_rendering() {
    let monitor = Monitor::from_config(Default::default(), Default::default());
    let result = monitor
        .analyze_metric(&antibiotic_table(), "% AMX", &Window::weeks(1, 8))
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["classification"], "HIGH");
    assert_eq!(json["latest_period"], 8);
    assert_eq!(json["series"]["points"].as_array().map(Vec::len), Some(8));
}
