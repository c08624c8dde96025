//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::builtin_indicators::BuiltinIndicators;
use crate::adapters::csv_adapter::{read_candles, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{build_pipeline_config, PipelineConfig};
use crate::domain::error::CandlelabError;
use crate::domain::feature_table::{Column, FeatureTable};
use crate::domain::fetch::fetch_candles;
use crate::domain::hawkes::apply_hawkes;
use crate::domain::pipeline::add_indicators;
use crate::domain::resample::resample;
use crate::domain::series::Value;
use crate::domain::timeframe::Timeframe;
use crate::ports::feature_sink_port::FeatureSinkPort;
use crate::ports::indicator_port::IndicatorLibrary;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "candlelab", about = "Candle resampling, indicator features and Hawkes decay")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the feature table described by a config file
    Features {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Resample a candle CSV to a coarser timeframe
    Resample {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        timeframe: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the Hawkes decay of one column of a candle CSV
    Hawkes {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        kappa: f64,
        #[arg(long, default_value = "close")]
        column: String,
    },
    /// Validate a config file without reading any data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Features { config, output } => run_features(&config, output.as_deref()),
        Command::Resample {
            input,
            timeframe,
            output,
        } => run_resample(&input, &timeframe, &output),
        Command::Hawkes {
            input,
            kappa,
            column,
        } => run_hawkes(&input, kappa, &column),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: CandlelabError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(fail)
}

/// Default output next to the candle files: `<symbol>_<timeframe>_features.csv`.
pub fn default_output_path(config: &PipelineConfig) -> PathBuf {
    let timeframe = config.resample.unwrap_or(config.fetch.timeframe);
    config.data_path.join(format!(
        "{}_{}_features.csv",
        config.fetch.symbol.replace('/', "-"),
        timeframe
    ))
}

fn run_features(config_path: &Path, output_path: Option<&Path>) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match build_pipeline_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let output = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(&config));
    let csv = CsvAdapter::new(config.data_path.clone());

    // Stages 2-6: Fetch, resample, indicators, Hawkes, write
    match run_features_pipeline(&csv, &BuiltinIndicators, &csv, &config, &output) {
        Ok(rows) => {
            eprintln!("Wrote {} rows to {}", rows, output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Runs the full feature pipeline and returns the number of rows written.
pub fn run_features_pipeline(
    market_data: &dyn MarketDataPort,
    library: &dyn IndicatorLibrary,
    sink: &dyn FeatureSinkPort,
    config: &PipelineConfig,
    output_path: &Path,
) -> Result<usize, CandlelabError> {
    eprintln!(
        "Fetching {} {} from {} to {}",
        config.fetch.symbol, config.fetch.timeframe, config.fetch.since, config.fetch.until
    );
    let mut candles = fetch_candles(market_data, &config.fetch, config.pacing)?;
    if candles.is_empty() {
        return Err(CandlelabError::Data {
            reason: format!(
                "no candles for {} {} in the requested range",
                config.fetch.symbol, config.fetch.timeframe
            ),
        });
    }
    eprintln!("Fetched {} candles", candles.len());

    if let Some(timeframe) = config.resample {
        candles = resample(&candles, timeframe)?;
        eprintln!("Resampled to {} ({} candles)", timeframe, candles.len());
    }

    let mut table = FeatureTable::new(candles)?;
    add_indicators(&mut table, config.default_length, &config.overrides, library)?;
    eprintln!("Computed {} indicator columns", table.indicators.len());

    if let Some(hawkes) = &config.hawkes {
        let column = apply_hawkes(&mut table, hawkes.source, hawkes.kappa)?;
        eprintln!("Added {}", column.name());
    }

    sink.write(&table, output_path)?;
    Ok(table.len())
}

fn run_resample(input: &Path, timeframe: &str, output: &Path) -> ExitCode {
    let timeframe: Timeframe = match timeframe.parse() {
        Ok(tf) => tf,
        Err(e) => {
            return fail(CandlelabError::InvalidParameter {
                name: "timeframe".into(),
                reason: format!("{e}"),
            });
        }
    };

    eprintln!("Resampling {} to {}", input.display(), timeframe);
    let result = read_candles(input)
        .and_then(|candles| resample(&candles, timeframe))
        .and_then(FeatureTable::new)
        .and_then(|table| {
            let sink = CsvAdapter::new(PathBuf::new());
            sink.write(&table, output).map(|_| table.len())
        });

    match result {
        Ok(rows) => {
            eprintln!("Wrote {} candles to {}", rows, output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Decays one column of the candles in `input`. Indicator columns are
/// computed on the fly with the builtin library.
pub fn hawkes_from_csv(
    input: &Path,
    kappa: f64,
    column: &str,
) -> Result<(String, FeatureTable), CandlelabError> {
    let source: Column = column.parse()?;
    let mut table = FeatureTable::new(read_candles(input)?)?;

    if let Column::Indicator(indicator) = source {
        let series = BuiltinIndicators.compute(indicator, table.candles())?;
        table.insert_indicator(series);
    }

    let name = apply_hawkes(&mut table, source, kappa)?.name();
    Ok((name, table))
}

fn run_hawkes(input: &Path, kappa: f64, column: &str) -> ExitCode {
    let (name, table) = match hawkes_from_csv(input, kappa, column) {
        Ok(result) => result,
        Err(e) => return fail(e),
    };
    let Some(decayed) = table.hawkes.last() else {
        return ExitCode::SUCCESS;
    };

    println!("timestamp,{name}");
    for (candle, value) in table.candles().iter().zip(&decayed.values) {
        match value {
            Value::Defined(v) => println!("{},{}", candle.timestamp.to_rfc3339(), v),
            Value::Undefined => println!("{},", candle.timestamp.to_rfc3339()),
        }
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match build_pipeline_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    eprintln!("\nData:");
    eprintln!("  path:      {}", config.data_path.display());
    eprintln!("  symbol:    {}", config.fetch.symbol);
    eprintln!("  timeframe: {}", config.fetch.timeframe);
    eprintln!("  range:     {} .. {}", config.fetch.since, config.fetch.until);
    if let Some(tf) = config.resample {
        eprintln!("  resample:  {}", tf);
    }

    eprintln!("\nIndicators:");
    for indicator in crate::domain::length::indicator_plan(config.default_length, &config.overrides) {
        eprintln!("  {}", indicator);
    }

    if let Some(hawkes) = &config.hawkes {
        eprintln!("\nHawkes:");
        eprintln!("  source: {}", hawkes.source);
        eprintln!("  kappa:  {}", hawkes.kappa);
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
