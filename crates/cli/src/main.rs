//! # surveillance-cli
//!
//! Command-line interface for the laboratory surveillance engine.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use surveillance::periods::parse_period;
use surveillance::{
    alert_sweep, build_attribution, derive_phenotype_shares, AttributionTable, BacteriaCatalog,
    Granularity, Monitor, Period, PeriodKind, PeriodNormalizer, RawTable, RobustBandAnalyzer,
    SeriesNormalizer, SurveillanceConfig, SweepSource, Window,
};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "surveillance")]
#[command(about = "Laboratory surveillance outlier engine", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV field delimiter
    #[arg(long, global = true, default_value = ",")]
    delimiter: char,

    #[command(subcommand)]
    command: Commands,
}

/// Shape of a metric table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableKind {
    /// Week-numbered resistance percentages
    Antibiotics,
    /// Dated phenotype counts, converted to shares on load
    Phenotypes,
}

#[derive(Subcommand)]
enum Commands {
    /// List the metric columns of a table
    Columns {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Table kind
        #[arg(short, long, value_enum, default_value = "antibiotics")]
        kind: TableKind,
    },

    /// Classify the latest value of one metric, or alert on every metric
    Analyze {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Table kind
        #[arg(short, long, value_enum, default_value = "antibiotics")]
        kind: TableKind,

        /// Metric column; omit to report alerts for all metrics
        #[arg(short, long)]
        metric: Option<String>,

        /// First period of the window (default: first period of the table)
        #[arg(long)]
        start: Option<String>,

        /// Last period of the window (default: last period of the table)
        #[arg(long)]
        end: Option<String>,

        /// Request log used to attribute alerts to services
        #[arg(short, long)]
        requests: Option<PathBuf>,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Flag every period where any metric of any table exceeds its band
    Sweep {
        /// Week-numbered metric tables
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Request log used to attribute flagged periods
        #[arg(short, long)]
        requests: PathBuf,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the services of a period, or the periods with requests
    Services {
        /// Request log CSV file
        #[arg(short, long)]
        requests: PathBuf,

        /// Week number, or date when attribution is by date
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Derive phenotype shares from a count table
    Phenotypes {
        /// Phenotype count CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file (optional, default stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search the bacteria reference catalog
    Bacteria {
        /// Catalog CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Category substring, case-insensitive
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

/// Shared state for every subcommand
struct Context {
    config: SurveillanceConfig,
    delimiter: u8,
}

impl Context {
    fn new(config: Option<&Path>, delimiter: char) -> CliResult<Self> {
        let config = match config {
            Some(path) => SurveillanceConfig::from_file(path).map_err(|e| e.to_string())?,
            None => SurveillanceConfig::default(),
        };
        if !delimiter.is_ascii() {
            return Err(format!("Delimiter must be an ASCII character, got '{}'", delimiter));
        }
        Ok(Self {
            config,
            delimiter: delimiter as u8,
        })
    }

    fn monitor(&self, kind: TableKind) -> Monitor {
        let normalizer = match kind {
            TableKind::Antibiotics => self.config.antibiotics.clone(),
            TableKind::Phenotypes => self.config.phenotypes.clone(),
        };
        Monitor::from_config(normalizer, self.config.band)
    }

    /// Load a metric table; phenotype counts are turned into shares.
    fn load_metric_table(&self, path: &Path, kind: TableKind) -> CliResult<RawTable> {
        let table = load_csv_table(path, self.delimiter)?;
        match kind {
            TableKind::Antibiotics => Ok(table),
            TableKind::Phenotypes => derive_phenotype_shares(&table, &self.config.phenotype_shares)
                .map_err(|e| e.to_string()),
        }
    }

    fn load_attribution(&self, path: &Path) -> CliResult<AttributionTable> {
        let table = load_csv_table(path, self.delimiter)?;
        build_attribution(&table, &self.config.attribution).map_err(|e| e.to_string())
    }
}

/// Load a CSV file into a raw table of text cells
fn load_csv_table(path: &Path, delimiter: u8) -> CliResult<RawTable> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open file {}: {}", path.display(), e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("Failed to read headers: {}", e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("Failed to read record: {}", e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(RawTable::new(headers, rows))
}

/// Write results as JSON to a file or stdout
fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> CliResult<()> {
    if let Some(path) = output {
        let mut file = File::create(path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, value)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        info!("results written to {}", path.display());
    } else {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{}", json);
    }
    Ok(())
}

fn parse_bound(kind: PeriodKind, raw: &str) -> CliResult<Period> {
    parse_period(kind, raw).ok_or_else(|| format!("Invalid {} period: '{}'", kind, raw))
}

/// Resolve the analysis window, defaulting each bound to the table's range
fn resolve_window(
    monitor: &Monitor,
    table: &RawTable,
    metric: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> CliResult<Window> {
    let kind = monitor.normalizer().config().period_kind;
    let range = monitor
        .period_range(table, metric)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "Table has no rows with a valid period".to_string())?;

    let start = match start {
        Some(raw) => parse_bound(kind, raw)?,
        None => range.start,
    };
    let end = match end {
        Some(raw) => parse_bound(kind, raw)?,
        None => range.end,
    };
    Ok(Window::new(start, end))
}

/// Run columns command
fn run_columns(ctx: &Context, input: PathBuf, kind: TableKind) -> CliResult<()> {
    let table = ctx.load_metric_table(&input, kind)?;
    let columns = ctx
        .monitor(kind)
        .metric_columns(&table)
        .map_err(|e| e.to_string())?;
    write_json(&columns, None)
}

/// Run analyze command
#[allow(clippy::too_many_arguments)]
fn run_analyze(
    ctx: &Context,
    input: PathBuf,
    kind: TableKind,
    metric: Option<String>,
    start: Option<String>,
    end: Option<String>,
    requests: Option<PathBuf>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let table = ctx.load_metric_table(&input, kind)?;
    let monitor = ctx.monitor(kind);

    match metric {
        Some(metric) => {
            let window =
                resolve_window(&monitor, &table, &metric, start.as_deref(), end.as_deref())?;
            let result = monitor
                .analyze_metric(&table, &metric, &window)
                .map_err(|e| e.to_string())?;
            info!(
                "{} over {}: latest {} = {:.2} -> {}",
                metric, window, result.latest_period, result.latest_value, result.classification
            );
            write_json(&result, output.as_ref())
        }
        None => {
            let columns = monitor.metric_columns(&table).map_err(|e| e.to_string())?;
            let first = columns
                .first()
                .ok_or_else(|| "No metric columns".to_string())?;
            let window = resolve_window(&monitor, &table, first, start.as_deref(), end.as_deref())?;
            let attribution = requests
                .as_deref()
                .map(|path| ctx.load_attribution(path))
                .transpose()?;
            let alerts = monitor
                .current_alerts(&table, &window, attribution.as_ref())
                .map_err(|e| e.to_string())?;
            info!("{} alerts over {}", alerts.len(), window);
            write_json(&alerts, output.as_ref())
        }
    }
}

/// Run sweep command
fn run_sweep(
    ctx: &Context,
    inputs: Vec<PathBuf>,
    requests: PathBuf,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let attribution = ctx.load_attribution(&requests)?;
    let normalizer = PeriodNormalizer::new(ctx.config.antibiotics.clone());
    let analyzer = RobustBandAnalyzer::from_config(ctx.config.band);

    let tables = inputs
        .iter()
        .map(|path| {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("table")
                .to_string();
            load_csv_table(path, ctx.delimiter).map(|table| (name, table))
        })
        .collect::<CliResult<Vec<_>>>()?;

    let sources: Vec<SweepSource<'_>> = tables
        .iter()
        .map(|(name, table)| SweepSource::new(name, table, &normalizer as &dyn SeriesNormalizer))
        .collect();
    let report = alert_sweep(&sources, &attribution, &analyzer).map_err(|e| e.to_string())?;

    write_json(&report, output.as_ref())
}

/// Run services command
fn run_services(ctx: &Context, requests: PathBuf, period: Option<String>) -> CliResult<()> {
    let attribution = ctx.load_attribution(&requests)?;

    match period {
        Some(raw) => {
            let kind = match ctx.config.attribution.granularity {
                Granularity::IsoWeek => PeriodKind::Week,
                Granularity::Date => PeriodKind::Date,
            };
            let period = parse_bound(kind, &raw)?;
            let services = surveillance::attribute(&attribution, &period);
            if services.is_empty() {
                info!("no services recorded in period {}", period);
            }
            write_json(&services, None)
        }
        None => write_json(&attribution.periods(), None),
    }
}

/// Run phenotypes command
fn run_phenotypes(ctx: &Context, input: PathBuf, output: Option<PathBuf>) -> CliResult<()> {
    let shares = ctx.load_metric_table(&input, TableKind::Phenotypes)?;

    let mut writer = match &output {
        Some(path) => {
            let file = File::create(path).map_err(|e| format!("Failed to create output: {}", e))?;
            csv::WriterBuilder::new()
                .delimiter(ctx.delimiter)
                .from_writer(Box::new(file) as Box<dyn std::io::Write>)
        }
        None => csv::WriterBuilder::new()
            .delimiter(ctx.delimiter)
            .from_writer(Box::new(std::io::stdout()) as Box<dyn std::io::Write>),
    };

    writer
        .write_record(shares.headers())
        .map_err(|e| format!("Failed to write CSV: {}", e))?;
    for row in shares.rows() {
        writer
            .write_record(row)
            .map_err(|e| format!("Failed to write CSV: {}", e))?;
    }
    writer
        .flush()
        .map_err(|e| format!("Failed to write CSV: {}", e))?;

    if let Some(path) = output {
        info!("{} share rows written to {}", shares.row_count(), path.display());
    }
    Ok(())
}

/// Run bacteria command
fn run_bacteria(ctx: &Context, input: PathBuf, query: String) -> CliResult<()> {
    let table = load_csv_table(&input, ctx.delimiter)?;
    let catalog =
        BacteriaCatalog::from_table(&table, &ctx.config.catalog).map_err(|e| e.to_string())?;
    let hits = catalog.search(&query);
    debug!("{} of {} profiles match '{}'", hits.len(), catalog.len(), query);
    write_json(&hits, None)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surveillance=info".into()),
        )
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = Context::new(cli.config.as_deref(), cli.delimiter).and_then(|ctx| match cli
        .command
    {
        Commands::Columns { input, kind } => run_columns(&ctx, input, kind),

        Commands::Analyze {
            input,
            kind,
            metric,
            start,
            end,
            requests,
            output,
        } => run_analyze(&ctx, input, kind, metric, start, end, requests, output),

        Commands::Sweep {
            input,
            requests,
            output,
        } => run_sweep(&ctx, input, requests, output),

        Commands::Services { requests, period } => run_services(&ctx, requests, period),

        Commands::Phenotypes { input, output } => run_phenotypes(&ctx, input, output),

        Commands::Bacteria { input, query } => run_bacteria(&ctx, input, query),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
