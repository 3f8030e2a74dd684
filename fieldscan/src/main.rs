use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use fieldscan_core::config::DEFAULT_CONFIG_FILE;
use fieldscan_core::export::default_output_dir;
use fieldscan_core::{AnalyzerConfig, FieldAnalyzer, FieldScanError, HeaderStrategy, save_results};
use std::path::PathBuf;

mod formatter;
mod logger;

#[derive(Parser)]
#[command(name = "fieldscan")]
#[command(
    about = "Infer worksheet headers and build a cross-sheet field matrix",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS file to analyze
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output directory [default: <FILE's directory>/excel_analysis_results]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Skip printing the summary to the console
    #[arg(long)]
    no_summary: bool,

    /// Do not write result files
    #[arg(long)]
    no_save: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// How column headers are resolved
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Leave generated and placeholder columns out of the field lists
    #[arg(long)]
    skip_unnamed: bool,

    /// Print every worksheet's columns with their inferred headers
    #[arg(long)]
    show_columns: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON report on stdout
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Search the first data rows for embedded headers
    Inferred,
    /// Use the first row's labels as they are
    Nominal,
}

impl From<StrategyArg> for HeaderStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Inferred => HeaderStrategy::Inferred,
            StrategyArg::Nominal => HeaderStrategy::Nominal,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        AnalyzerConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_config_path.exists() {
            AnalyzerConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            AnalyzerConfig::default()
        }
    };

    // Command line flags override the file
    if let Some(strategy) = cli.strategy {
        config.global.strategy = strategy.into();
    }
    if cli.skip_unnamed {
        config.global.include_unnamed_columns = false;
    }
    config.validate().context("Invalid configuration")?;

    let analyzer = FieldAnalyzer::with_config(config);
    let settings = &analyzer.config().global;
    log::debug!(
        "Header strategy {:?}, repeat limit {}, common value ratio {}",
        settings.strategy,
        settings.header_repeat_limit,
        settings.common_value_ratio
    );
    let analysis = match analyzer.analyze_file(&cli.file) {
        Ok(analysis) => analysis,
        Err(e @ FieldScanError::InputMissing(_)) => {
            eprintln!("{} {}", "ERROR:".red().bold(), e);
            std::process::exit(1);
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to analyze file: {}", cli.file.display()));
        }
    };

    if cli.show_columns {
        formatter::print_columns(&analysis);
    }

    match cli.format {
        OutputFormat::Human => {
            if !cli.no_summary {
                formatter::print_human(&analysis);
            }
        }
        OutputFormat::Json => formatter::print_json(&analysis)?,
    }

    if !cli.no_save {
        let output_dir = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_dir(&cli.file));
        let saved = save_results(&analysis, &output_dir).with_context(|| {
            format!("Failed to save results to {}", output_dir.display())
        })?;
        if matches!(cli.format, OutputFormat::Human) {
            formatter::print_saved(&output_dir, &saved);
        }
    }

    Ok(())
}
