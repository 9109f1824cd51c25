//! CLI entry point for the bike-share insights tool.
//!
//! Provides subcommands for reporting headline metrics for a selection and
//! exporting the aggregation views as CSV tables, optionally publishing the
//! full dashboard JSON to S3.

use anyhow::Result;
use bikeshare_insights::{
    config::SelectionConfig,
    error::PipelineError,
    output::{export_views, log_summary, print_pretty, to_json},
    parser::load_records,
    pipeline::{dataset::Dataset, publish::write_json_to_s3, types::Dashboard},
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Usage views and highlights for hourly bike-share data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log the headline metrics for a selection
    Report {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the full dashboard as JSON to stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write every aggregation view as CSV and optionally publish to S3
    Export {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Directory to write the CSV tables into
        #[arg(short, long, default_value = "views")]
        output_dir: String,

        /// Optional: S3 bucket to upload the dashboard JSON to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Object key for the dashboard JSON
        #[arg(long, default_value = "dashboards/latest.json")]
        s3_key: String,

        /// Optional: Gzip compress the dashboard JSON before uploading
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// Path to the hourly dataset CSV
    #[arg(value_name = "DATASET", default_value = "data/hour.csv")]
    dataset: String,

    /// JSON file with a saved selection; flags below override it
    #[arg(short, long)]
    selection: Option<String>,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// First hour to include (0-23)
    #[arg(long)]
    start_hour: Option<u8>,

    /// Last hour to include (0-23)
    #[arg(long)]
    end_hour: Option<u8>,

    /// Season codes to include (1=spring .. 4=winter), comma separated
    #[arg(long, value_delimiter = ',')]
    seasons: Option<Vec<u8>>,

    /// Weather codes to include (1=clear .. 4=heavy precipitation), comma separated
    #[arg(long, value_delimiter = ',')]
    weathers: Option<Vec<u8>>,

    /// Day-type codes to include (0=workday, 1=weekend, 2=holiday), comma separated
    #[arg(long, value_delimiter = ',')]
    day_types: Option<Vec<u8>>,
}

impl SelectionArgs {
    fn overrides(&self) -> SelectionConfig {
        SelectionConfig {
            start_date: self.start_date,
            end_date: self.end_date,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            seasons: self.seasons.clone(),
            weathers: self.weathers.clone(),
            day_types: self.day_types.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { selection, json } => {
            let Some(dashboard) = run_query(&selection)? else {
                return Ok(());
            };

            log_summary(&dashboard.summary);
            print_pretty(&dashboard);
            if json {
                println!("{}", to_json(&dashboard)?);
            }
        }
        Commands::Export {
            selection,
            output_dir,
            s3_bucket,
            s3_key,
            gzip,
        } => {
            let Some(dashboard) = run_query(&selection)? else {
                return Ok(());
            };

            export_views(Path::new(&output_dir), &dashboard.views)?;

            if let Some(bucket) = s3_bucket {
                let config = aws_config::load_from_env().await;
                let s3 = aws_sdk_s3::Client::new(&config);
                info!(bucket = %bucket, gzip, "S3 upload enabled");
                write_json_to_s3(&s3, &bucket, &s3_key, &dashboard, gzip).await?;
            } else {
                info!("S3 bucket not specified, skipping upload");
            }
        }
    }

    Ok(())
}

/// Loads the dataset, resolves the selection and runs the pipeline.
///
/// Returns `None` when the selection matches nothing, which is reported
/// and is not a failure.
#[tracing::instrument(skip_all, fields(dataset = %args.dataset))]
fn run_query(args: &SelectionArgs) -> Result<Option<Dashboard>> {
    let raw = load_records(&args.dataset)?;
    let dataset = Dataset::new(&raw);

    let Some(span) = dataset.date_span() else {
        warn!("Dataset has no valid records");
        return Ok(None);
    };

    let base = match &args.selection {
        Some(path) => SelectionConfig::load(path)?,
        None => SelectionConfig::default(),
    };
    let selection = base.merged_with(args.overrides()).resolve(span)?;

    match dataset.query(&selection) {
        Ok(dashboard) => Ok(Some(dashboard)),
        Err(PipelineError::EmptyResult) => {
            warn!("No data for this selection");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
