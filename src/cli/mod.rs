//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod agreement;
mod model;
mod pipeline;
mod report;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::agreement::Metric;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, TweetsentConfig};
use crate::logging::{self, Verbosity};
use crate::network::OptimizerKind;
use crate::tweet::Representation;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// tweetsent - Tweet sentiment pipeline
#[derive(Parser)]
#[command(name = "tweetsent")]
#[command(about = "Tweet sentiment pipeline: embed, classify, analyze and chart tweets")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: tweetsent.toml found from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug events
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log warnings and errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add min, max and average word vectors to a tweet dataset
    Preprocess {
        /// Input tweet JSON file
        input: PathBuf,

        /// Output JSON file
        output: PathBuf,

        /// fastText .vec embeddings (default: from config)
        #[arg(long)]
        embeddings: Option<PathBuf>,
    },
    /// Train the sentiment network and save the model
    Train {
        /// Annotated training tweets (default: from config)
        #[arg(long)]
        train: Option<PathBuf>,

        /// Annotated development tweets (default: from config)
        #[arg(long)]
        dev: Option<PathBuf>,

        /// Model output file (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of epochs
        #[arg(long)]
        epochs: Option<usize>,

        /// Parameter update rule
        #[arg(long, value_enum)]
        optimizer: Option<OptimizerKind>,

        /// Pooled tweet vector to train on
        #[arg(long, value_enum)]
        representation: Option<Representation>,

        /// Seed for initialization, shuffling and dropout
        #[arg(long)]
        seed: Option<u64>,

        /// Also evaluate on the training set
        #[arg(long)]
        eval_train: bool,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Evaluate a saved model on an annotated dataset
    Evaluate {
        /// Annotated tweets (default: the configured test dataset)
        dataset: Option<PathBuf>,

        /// Model file (default: from config)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Annotate tweets with hashtags, tokens and predicted sentiment
    Predict {
        /// Input tweets (default: the configured Twitter dataset)
        input: Option<PathBuf>,

        /// Output file (default: the configured Twitter predictions)
        output: Option<PathBuf>,

        /// Model file (default: from config)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
    /// Print statistics of a predicted dataset
    Stats {
        /// Predicted tweets (default: the configured Twitter predictions)
        input: Option<PathBuf>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Entries per top list
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Render statistic charts of a predicted dataset to PNG
    Plot {
        /// Predicted tweets (default: the configured Twitter predictions)
        input: Option<PathBuf>,

        /// Chart directory (default: from config)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Inter-annotator agreement (Krippendorff's alpha) of the disambiguation data
    Iaa {
        /// Disambiguation JSON (default: from config)
        input: Option<PathBuf>,

        /// Distance metric
        #[arg(long, value_enum)]
        metric: Option<Metric>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Run the whole pipeline, skipping stages whose output exists
    Run {
        /// Recompute every stage
        #[arg(long)]
        force: bool,

        /// Directory holding the input files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory receiving generated files
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.quiet, cli.verbose));
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Preprocess { input, output, embeddings } => {
            model::run_preprocess(config, &input, &output, embeddings.as_deref())
        }
        Commands::Train { train, dev, output, epochs, optimizer, representation, seed, eval_train, format } => {
            let overrides = CliOverrides {
                model: output.as_deref().map(from_cwd),
                epochs,
                optimizer,
                representation,
                seed,
                ..Default::default()
            };
            model::run_train(config, &overrides, train.as_deref(), dev.as_deref(), eval_train, &format)
        }
        Commands::Evaluate { dataset, model, format } => {
            let overrides = CliOverrides { model: model.as_deref().map(from_cwd), ..Default::default() };
            model::run_evaluate(config, &overrides, dataset.as_deref(), &format)
        }
        Commands::Predict { input, output, model } => {
            let overrides = CliOverrides { model: model.as_deref().map(from_cwd), ..Default::default() };
            model::run_predict(config, &overrides, input.as_deref(), output.as_deref())
        }
        Commands::Stats { input, format, output, top_k } => {
            let overrides = CliOverrides { top_k, ..Default::default() };
            report::run_stats(config, &overrides, input.as_deref(), &format, output.as_deref())
        }
        Commands::Plot { input, out_dir } => report::run_plot(config, input.as_deref(), out_dir.as_deref()),
        Commands::Iaa { input, metric, format } => agreement::run_iaa(config, input.as_deref(), metric, &format),
        Commands::Run { force, data_dir, results_dir } => {
            let overrides = CliOverrides { data_dir, results_dir, ..Default::default() };
            pipeline::run_pipeline(config, &overrides, force)
        }
    }
}

/// Load the configuration and apply command-line overrides.
pub(crate) fn settings(config: Option<&Path>, overrides: &CliOverrides) -> Result<TweetsentConfig, ExitCode> {
    let mut settings = match load_config(config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    if let Err(e) = merge_cli_overrides(&mut settings, overrides) {
        eprintln!("Error: {}", e);
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    Ok(settings)
}

/// Paths given on the command line are relative to the working directory,
/// not to the configured data or results directory.
pub(crate) fn from_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
}

/// Input files must exist before any work starts.
pub(crate) fn require_input(path: &Path) -> Result<(), ExitCode> {
    if path.is_file() {
        Ok(())
    } else {
        eprintln!("Error: Cannot open input file '{}'", path.display());
        Err(ExitCode::from(EXIT_INVALID_ARGS))
    }
}

/// Accept only the `text` and `json` output formats.
pub(crate) fn check_format(format: &str) -> Result<(), ExitCode> {
    if format == "text" || format == "json" {
        Ok(())
    } else {
        eprintln!("Error: --format must be 'text' or 'json'");
        Err(ExitCode::from(EXIT_INVALID_ARGS))
    }
}

/// Print a failure and map it to the error exit code.
pub(crate) fn fail(error: impl std::fmt::Display) -> ExitCode {
    eprintln!("Error: {}", error);
    ExitCode::from(EXIT_ERROR)
}

/// Serialize as pretty JSON, or render text.
pub(crate) fn render<T, F>(value: &T, format: &str, text: F) -> Result<String, ExitCode>
where
    T: serde::Serialize,
    F: FnOnce(&T) -> String,
{
    if format == "json" {
        serde_json::to_string_pretty(value).map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(fail)
    } else {
        Ok(text(value))
    }
}

/// Write output to a file, or print it.
pub(crate) fn emit(text: &str, output: Option<&Path>) -> ExitCode {
    if let Some(output_path) = output {
        if let Err(e) = std::fs::write(output_path, text) {
            eprintln!("Error: Failed to write '{}': {}", output_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Report written to: {}", output_path.display());
    } else {
        print!("{}", text);
    }
    ExitCode::from(EXIT_SUCCESS)
}
