//! Configuration schema types for `tweetsent.toml`
//!
//! Defines the sections of the pipeline configuration and their validation
//! rules. Every section and field is optional; missing values take the
//! defaults below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::agreement::Metric;
use crate::analyze::StatsOptions;
use crate::chart::ChartStyle;
use crate::network::{OptimizerKind, TrainingConfig};
use crate::tweet::Representation;

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the input files
    pub data_dir: PathBuf,
    /// Directory receiving every generated file
    pub results_dir: PathBuf,
    /// fastText `.vec` embeddings, in `data_dir`
    pub embeddings: PathBuf,
    /// Annotated training tweets, in `data_dir`
    pub train_dataset: PathBuf,
    /// Annotated development tweets, in `data_dir`
    pub dev_dataset: PathBuf,
    /// Annotated test tweets, in `data_dir`
    pub test_dataset: PathBuf,
    /// Unannotated tweets to analyze, in `data_dir`
    pub twitter_dataset: PathBuf,
    /// Word-sense disambiguation annotations, in `data_dir`
    pub disambiguation: PathBuf,
    /// Trained model, in `results_dir`
    pub model: PathBuf,
    /// Test tweets with predictions, in `results_dir`
    pub test_predictions: PathBuf,
    /// Analyzed tweets with predictions, in `results_dir`
    pub twitter_predictions: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_dir: PathBuf::from("results"),
            embeddings: PathBuf::from("cc.de.100.500000.vec"),
            train_dataset: PathBuf::from("train.json"),
            dev_dataset: PathBuf::from("dev.json"),
            test_dataset: PathBuf::from("filtered_test.json"),
            twitter_dataset: PathBuf::from("Twitter_Datensatz.json"),
            disambiguation: PathBuf::from("Disambiguierung.json"),
            model: PathBuf::from("best_model.json"),
            test_predictions: PathBuf::from("filtered_test_preprocessed.json"),
            twitter_predictions: PathBuf::from("Auswertung_Twitter.json"),
        }
    }
}

impl PathsConfig {
    /// Resolve an input file against `data_dir`.
    pub fn data(&self, file: &Path) -> PathBuf {
        resolve_in(&self.data_dir, file)
    }

    /// Resolve an output file against `results_dir`.
    pub fn result(&self, file: &Path) -> PathBuf {
        resolve_in(&self.results_dir, file)
    }
}

fn resolve_in(dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        dir.join(file)
    }
}

/// Network architecture and training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden1: usize,
    pub hidden2: usize,
    pub dropout: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub optimizer: OptimizerKind,
    pub seed: u64,
    /// Pooled tweet vector the network consumes
    pub representation: Representation,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let training = TrainingConfig::default();
        Self {
            hidden1: 64,
            hidden2: 32,
            dropout: 0.2,
            epochs: training.epochs,
            batch_size: training.batch_size,
            learning_rate: training.learning_rate,
            optimizer: training.optimizer,
            seed: training.seed,
            representation: Representation::default(),
        }
    }
}

impl NetworkConfig {
    pub fn training(&self) -> TrainingConfig {
        TrainingConfig {
            epochs: self.epochs,
            batch_size: self.batch_size,
            learning_rate: self.learning_rate,
            optimizer: self.optimizer,
            seed: self.seed,
        }
    }
}

/// Statistics settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Entries per top list
    pub top_k: usize,
    /// Minimum occurrences for the misclassified-hashtag ranking
    pub min_hashtag_occurrences: u64,
    /// Distance metric for inter-annotator agreement
    pub metric: Metric,
}

impl Default for StatsConfig {
    fn default() -> Self {
        let options = StatsOptions::default();
        Self {
            top_k: options.top_k,
            min_hashtag_occurrences: options.min_hashtag_occurrences,
            metric: Metric::default(),
        }
    }
}

impl StatsConfig {
    pub fn options(&self) -> StatsOptions {
        StatsOptions { top_k: self.top_k, min_hashtag_occurrences: self.min_hashtag_occurrences }
    }
}

/// Chart rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    pub width: u32,
    pub height: u32,
    pub text_scale: u32,
    /// Chart directory, in `results_dir`
    pub output_dir: PathBuf,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        let style = ChartStyle::default();
        Self {
            width: style.width,
            height: style.height,
            text_scale: style.text_scale,
            output_dir: PathBuf::from("charts"),
        }
    }
}

impl ChartsConfig {
    pub fn style(&self) -> ChartStyle {
        ChartStyle { width: self.width, height: self.height, text_scale: self.text_scale }
    }
}

/// Complete tweetsent.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweetsentConfig {
    pub paths: PathsConfig,
    pub network: NetworkConfig,
    pub stats: StatsConfig,
    pub charts: ChartsConfig,
}

/// Smallest chart edge that leaves room for a plot.
pub const MIN_CHART_SIZE: u32 = 100;

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "network.dropout")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tweetsent.toml: '{}' {}", self.field, self.message)
    }
}

impl TweetsentConfig {
    /// Validate the configuration and return every problem found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ConfigValidationError { field: field.to_string(), message: message.to_string() });
            }
        };

        let net = &self.network;
        check(net.hidden1 > 0, "network.hidden1", "must be a positive integer");
        check(net.hidden2 > 0, "network.hidden2", "must be a positive integer");
        check((0.0..1.0).contains(&net.dropout), "network.dropout", "must be in [0, 1)");
        check(net.epochs > 0, "network.epochs", "must be a positive integer");
        check(net.batch_size > 0, "network.batch_size", "must be a positive integer");
        check(
            net.learning_rate.is_finite() && net.learning_rate > 0.0,
            "network.learning_rate",
            "must be a positive number",
        );

        check(self.stats.top_k > 0, "stats.top_k", "must be a positive integer");

        let charts = &self.charts;
        check(charts.width >= MIN_CHART_SIZE, "charts.width", "must be at least 100");
        check(charts.height >= MIN_CHART_SIZE, "charts.height", "must be at least 100");
        check(charts.text_scale > 0, "charts.text_scale", "must be a positive integer");

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Chart directory resolved against the results directory.
    pub fn charts_dir(&self) -> PathBuf {
        self.paths.result(&self.charts.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: TweetsentConfig = toml::from_str("").unwrap();
        assert_eq!(config, TweetsentConfig::default());
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[paths]
data_dir = "input"
results_dir = "out"
model = "model.json"

[network]
hidden1 = 128
hidden2 = 16
dropout = 0.5
epochs = 5
optimizer = "sgd"
representation = "tweetmax"

[stats]
top_k = 5
min_hashtag_occurrences = 10
metric = "nominal"

[charts]
width = 1024
height = 768
output_dir = "plots"
"#;
        let config: TweetsentConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.paths.data(&config.paths.embeddings), PathBuf::from("input/cc.de.100.500000.vec"));
        assert_eq!(config.paths.result(&config.paths.model), PathBuf::from("out/model.json"));
        assert_eq!(config.network.hidden1, 128);
        assert_eq!(config.network.optimizer, OptimizerKind::Sgd);
        assert_eq!(config.network.representation, Representation::Max);
        assert_eq!(config.network.batch_size, 32);
        assert_eq!(config.stats.metric, Metric::Nominal);
        assert_eq!(config.stats.options().top_k, 5);
        assert_eq!(config.charts.style().width, 1024);
        assert_eq!(config.charts_dir(), PathBuf::from("out/plots"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = TweetsentConfig::default();
        config.network.learning_rate = 0.01;
        config.charts.output_dir = PathBuf::from("img");
        let text = toml::to_string(&config).unwrap();
        let parsed: TweetsentConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation_reports_every_problem() {
        let toml = r#"
[network]
hidden1 = 0
dropout = 1.0
learning_rate = -0.1

[stats]
top_k = 0

[charts]
width = 20
"#;
        let config: TweetsentConfig = toml::from_str(toml).unwrap();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["network.hidden1", "network.dropout", "network.learning_rate", "stats.top_k", "charts.width"]
        );
    }

    #[test]
    fn test_absolute_paths_kept() {
        let paths = PathsConfig::default();
        assert_eq!(paths.data(Path::new("/tmp/x.json")), PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn test_unknown_optimizer_rejected() {
        let result: Result<TweetsentConfig, _> = toml::from_str("[network]\noptimizer = \"rmsprop\"");
        assert!(result.is_err());
    }
}
