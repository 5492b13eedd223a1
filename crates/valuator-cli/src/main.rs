//! valuator CLI: run the property valuation analyses from the command line.
//!
//! Usage:
//!   valuator run --seed 42
//!   valuator run --config analysis.json --json
//!   valuator datasets
//!   valuator config > analysis.json

mod error;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use error::{CliError, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;
use valuator::analysis::datasets::{self, Dataset};
use valuator::analysis::{run_all_analyses_with, AnalysisConfig};
use valuator::preprocessing::NormalizationMode;
use valuator::ValuatorError;

#[derive(Parser)]
#[command(name = "valuator")]
#[command(about = "Property valuation signals from the embedded listing data")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the classification, regression, clustering and forest analyses
    Run {
        /// Base random seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// How the classifier, regressor and clusterer scale their query
        #[arg(short, long, value_enum)]
        normalization: Option<Normalization>,

        /// Run the analyses one after another instead of concurrently
        #[arg(long)]
        sequential: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the embedded datasets
    Datasets {
        /// Print the datasets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Normalization {
    /// Standardize each prediction batch with its own statistics
    PerCall,
    /// Reuse the statistics captured at training time
    FitStats,
}

impl From<Normalization> for NormalizationMode {
    fn from(value: Normalization) -> Self {
        match value {
            Normalization::PerCall => Self::PerCall,
            Normalization::FitStats => Self::FitStatistics,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            seed,
            config,
            normalization,
            sequential,
            json,
        } => cmd_run(
            seed,
            config.as_deref(),
            normalization,
            sequential,
            json,
        ),
        Commands::Datasets { json } => cmd_datasets(json),
        Commands::Config => cmd_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so `--json` output stays parseable.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install log subscriber: {e}");
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::ConfigNotFound(path.to_path_buf()));
            }
            debug!(path = %path.display(), "loading configuration");
            Ok(AnalysisConfig::from_json_file(path)?)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn cmd_run(
    seed: Option<u64>,
    config_path: Option<&Path>,
    normalization: Option<Normalization>,
    sequential: bool,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    if let Some(mode) = normalization {
        config.normalization = mode.into();
    }
    if sequential {
        config.parallel = false;
    }

    let report = run_all_analyses_with(&config)?;

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(ValuatorError::from)?;
        println!("{text}");
    } else {
        output::section("Property valuation report");
        match config.seed {
            Some(seed) => println!("Seed: {seed}"),
            None => println!("Seed: (entropy)"),
        }
        println!();
        print!("{report}");
    }

    Ok(())
}

fn cmd_datasets(json: bool) -> Result<()> {
    let classification = datasets::classification()?;
    let regression = datasets::regression()?;
    let clustering = datasets::clustering()?;
    let ensemble = datasets::ensemble()?;

    if json {
        let value = serde_json::json!({
            "listings": datasets::LISTINGS,
            "classification": classification,
            "regression": regression,
            "clustering": clustering,
            "ensemble": ensemble,
        });
        let text = serde_json::to_string_pretty(&value).map_err(ValuatorError::from)?;
        println!("{text}");
        return Ok(());
    }

    print_dataset(&classification, |i| {
        let label = classification.targets[i];
        Some(format!("{label}"))
    });
    print_dataset(&regression, |i| Some(format!("{:.1}", regression.targets[i])));
    print_dataset(&clustering, |_| None);
    print_dataset(&ensemble, |i| Some(format!("{:.1}", ensemble.targets[i])));

    Ok(())
}

fn print_dataset<T>(data: &Dataset<T>, target: impl Fn(usize) -> Option<String>) {
    output::section(&format!("{} ({} rows)", data.name, data.x.n_rows()));
    output::kv("features", data.feature_names.join(", "));
    for (i, row) in data.x.rows().enumerate() {
        let name = datasets::LISTINGS.get(i).copied().unwrap_or("?");
        let values: Vec<String> = row.iter().map(|v| format!("{v}")).collect();
        match target(i) {
            Some(t) => println!("  {name:<20} [{}] -> {t}", values.join(", ")),
            None => println!("  {name:<20} [{}]", values.join(", ")),
        }
    }
    let query: Vec<String> = data
        .named_query()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    output::kv("query", query.join(", "));
}

fn cmd_config() -> Result<()> {
    let text =
        serde_json::to_string_pretty(&AnalysisConfig::default()).map_err(ValuatorError::from)?;
    println!("{text}");
    Ok(())
}
