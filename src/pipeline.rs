//! Pipeline stages driven by the configuration
//!
//! Each stage reads its inputs from the configured data and results
//! directories. [`run_pipeline`] chains them the way the exercise does:
//! train a model, predict and analyze the test set, predict and chart the
//! Twitter dataset, then measure annotator agreement.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::agreement::{alpha_by_word_class, load_items, ClassAgreement, Metric};
use crate::analyze::{AnalysisReport, StatsOptions};
use crate::chart::render_all;
use crate::config::TweetsentConfig;
use crate::embeddings::EmbeddingError;
use crate::error::Result;
use crate::network::{
    evaluate, train_eval, Evaluation, FeedForwardNetwork, ModelFile, Samples, TrainEval, SENTIMENT_CLASSES,
};
use crate::preprocess::TweetPreprocessor;
use crate::tweet::{load_tweets, Representation, Tweet};

/// Embedding table loaded on first use.
pub struct Embeddings {
    path: PathBuf,
    loaded: Option<TweetPreprocessor>,
}

impl Embeddings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), loaded: None }
    }

    pub fn from_config(config: &TweetsentConfig) -> Self {
        Self::new(config.paths.data(&config.paths.embeddings))
    }

    pub fn preprocessor(&mut self) -> Result<&TweetPreprocessor, EmbeddingError> {
        let preprocessor = match self.loaded.take() {
            Some(p) => p,
            None => TweetPreprocessor::load(&self.path)?,
        };
        Ok(self.loaded.insert(preprocessor))
    }
}

/// Tweets with the `representation` vector, vectorizing them when any lacks it.
pub fn with_vectors(
    tweets: Vec<Tweet>,
    representation: Representation,
    embeddings: &mut Embeddings,
) -> Result<Vec<Tweet>> {
    if tweets.iter().all(|t| t.vector(representation).is_some()) {
        return Ok(tweets);
    }
    Ok(embeddings.preprocessor()?.convert_tweets(tweets))
}

/// Labeled samples from a dataset file.
pub fn load_samples(path: &Path, representation: Representation, embeddings: &mut Embeddings) -> Result<Samples> {
    let tweets = with_vectors(load_tweets(path)?, representation, embeddings)?;
    Ok(Samples::from_tweets(&tweets, representation)?)
}

/// Train a network on the configured training set and evaluate it on the dev set.
pub fn train_model(
    config: &TweetsentConfig,
    embeddings: &mut Embeddings,
    evaluate_train: bool,
) -> Result<(ModelFile, TrainEval)> {
    let net = &config.network;
    let paths = &config.paths;
    let train_samples = load_samples(&paths.data(&paths.train_dataset), net.representation, embeddings)?;
    let dev_samples = load_samples(&paths.data(&paths.dev_dataset), net.representation, embeddings)?;

    let mut network = FeedForwardNetwork::new(
        train_samples.width(),
        net.hidden1,
        net.hidden2,
        SENTIMENT_CLASSES,
        net.dropout,
        net.seed,
    )?;
    info!(
        train = train_samples.len(),
        dev = dev_samples.len(),
        parameters = network.num_parameters(),
        optimizer = net.optimizer.name(),
        representation = net.representation.field(),
        "training network"
    );
    let training = net.training();
    let result = train_eval(&mut network, &train_samples, &dev_samples, &training, evaluate_train)?;
    info!(accuracy = result.dev.accuracy, "dev accuracy");

    Ok((ModelFile::new(network, net.representation).with_training(training), result))
}

/// Evaluate a saved model on an annotated dataset.
pub fn evaluate_dataset(model: &ModelFile, path: &Path, embeddings: &mut Embeddings) -> Result<Evaluation> {
    let samples = load_samples(path, model.representation, embeddings)?;
    Ok(evaluate(&model.network, &samples)?)
}

/// Statistics over a predicted dataset file.
pub fn analyze_file(path: &Path, options: &StatsOptions) -> Result<AnalysisReport> {
    let tweets = load_tweets(path)?;
    Ok(AnalysisReport::build(&tweets, options)?)
}

/// Krippendorff's alpha over the disambiguation dataset, overall and per word class.
pub fn agreement_file(path: &Path, metric: Metric) -> Result<Vec<ClassAgreement>> {
    let items = load_items(path)?;
    Ok(alpha_by_word_class(&items, &metric)?)
}

/// Outcome of [`run_pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    /// Dev evaluation, present when the model was trained in this run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainEval>,
    pub test_report: AnalysisReport,
    pub twitter_report: AnalysisReport,
    pub charts: Vec<PathBuf>,
    pub agreement: Vec<ClassAgreement>,
}

/// Whether a stage can reuse its existing output.
fn reuse(path: &Path, force: bool, stage: &str) -> bool {
    let exists = path.exists();
    if exists && !force {
        info!(stage, path = %path.display(), "output exists, skipping");
    }
    exists && !force
}

/// Run every stage, skipping those whose output exists unless `force` is set.
pub fn run_pipeline(config: &TweetsentConfig, force: bool) -> Result<PipelineSummary> {
    let paths = &config.paths;
    let mut embeddings = Embeddings::from_config(config);

    let model_path = paths.result(&paths.model);
    let (model, training) = if reuse(&model_path, force, "train") {
        (ModelFile::load(&model_path)?, None)
    } else {
        let (model, result) = train_model(config, &mut embeddings, false)?;
        model.save(&model_path)?;
        (model, Some(result))
    };
    if model.representation != config.network.representation {
        warn!(
            model = model.representation.field(),
            configured = config.network.representation.field(),
            "saved model uses a different representation than configured"
        );
    }

    let options = config.stats.options();
    let test_predictions = paths.result(&paths.test_predictions);
    if !reuse(&test_predictions, force, "predict test") {
        embeddings.preprocessor()?.preprocess_with_prediction(
            &paths.data(&paths.test_dataset),
            &test_predictions,
            &model,
        )?;
    }
    let test_report = analyze_file(&test_predictions, &options)?;

    let twitter_predictions = paths.result(&paths.twitter_predictions);
    if !reuse(&twitter_predictions, force, "predict twitter") {
        embeddings.preprocessor()?.preprocess_with_prediction(
            &paths.data(&paths.twitter_dataset),
            &twitter_predictions,
            &model,
        )?;
    }
    let twitter_report = analyze_file(&twitter_predictions, &options)?;
    let charts = render_all(&twitter_report, &config.charts_dir(), &config.charts.style())?;

    let agreement = agreement_file(&paths.data(&paths.disambiguation), config.stats.metric)?;

    Ok(PipelineSummary { training, test_report, twitter_report, charts, agreement })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChartsConfig, NetworkConfig, PathsConfig};
    use std::fs;
    use tempfile::TempDir;

    const EMBEDDINGS: &str = "4 3\ngut 1 0 0\nschlecht 0 1 0\nokay 0 0 1\nheute 0.5 0.5 0.5\n";

    fn dataset(rows: &[(&str, u8)]) -> String {
        let items: Vec<String> =
            rows.iter().map(|(text, gold)| format!(r#"{{"text": "{text}", "annotation": {gold}}}"#)).collect();
        format!("[{}]", items.join(","))
    }

    fn labeled() -> String {
        dataset(&[
            ("gut", 2),
            ("heute gut", 2),
            ("schlecht", 0),
            ("heute schlecht", 0),
            ("okay", 1),
            ("heute okay", 1),
        ])
    }

    fn project(dir: &Path) -> TweetsentConfig {
        let data = dir.join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("emb.vec"), EMBEDDINGS).unwrap();
        fs::write(data.join("train.json"), labeled()).unwrap();
        fs::write(data.join("dev.json"), labeled()).unwrap();
        fs::write(data.join("test.json"), dataset(&[("gut #a", 2), ("schlecht #a", 0), ("nix", 1)])).unwrap();
        fs::write(
            data.join("twitter.json"),
            r##"[
                {"text": "gut #wetter", "author_name": "anna", "created_at": "2021-05-03T09:00:00Z"},
                {"text": "schlecht #wetter", "author_name": "ben", "created_at": "2021-05-04T10:00:00Z"}
            ]"##,
        )
        .unwrap();
        fs::write(
            data.join("disambiguation.json"),
            r#"[
                {"noun": "Bank", "annotations": [{"value": 1}, {"value": 1}]},
                {"verb": "laufen", "annotations": [{"value": {"$numberLong": "3"}}, {"value": 3}]},
                {"adjective": "hell", "annotations": [{"value": 2}, {"value": 1}]}
            ]"#,
        )
        .unwrap();

        TweetsentConfig {
            paths: PathsConfig {
                data_dir: data,
                results_dir: dir.join("results"),
                embeddings: "emb.vec".into(),
                train_dataset: "train.json".into(),
                dev_dataset: "dev.json".into(),
                test_dataset: "test.json".into(),
                twitter_dataset: "twitter.json".into(),
                disambiguation: "disambiguation.json".into(),
                ..PathsConfig::default()
            },
            network: NetworkConfig {
                hidden1: 8,
                hidden2: 8,
                dropout: 0.0,
                epochs: 30,
                batch_size: 2,
                ..NetworkConfig::default()
            },
            charts: ChartsConfig { width: 320, height: 240, text_scale: 1, ..ChartsConfig::default() },
            ..TweetsentConfig::default()
        }
    }

    #[test]
    fn test_embeddings_loaded_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emb.vec");
        fs::write(&path, EMBEDDINGS).unwrap();
        let mut embeddings = Embeddings::new(&path);
        assert_eq!(embeddings.preprocessor().unwrap().embeddings().dim(), 3);
        fs::remove_file(&path).unwrap();
        assert_eq!(embeddings.preprocessor().unwrap().embeddings().len(), 4);
    }

    #[test]
    fn test_missing_embeddings_is_error() {
        let mut embeddings = Embeddings::new("/nonexistent/emb.vec");
        assert!(embeddings.preprocessor().is_err());
    }

    #[test]
    fn test_with_vectors_skips_loading_when_present() {
        let mut tweet = Tweet::new("gut");
        tweet.tweetavg = Some(vec![1.0, 0.0, 0.0]);
        let mut embeddings = Embeddings::new("/nonexistent/emb.vec");
        let tweets = with_vectors(vec![tweet], Representation::Avg, &mut embeddings).unwrap();
        assert_eq!(tweets.len(), 1);
    }

    #[test]
    fn test_run_pipeline_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = project(dir.path());

        let summary = run_pipeline(&config, false).unwrap();
        let training = summary.training.as_ref().unwrap();
        assert_eq!(training.losses.len(), 30);
        assert_eq!(training.dev.total, 6);

        // "nix" has no embedding and is dropped
        assert_eq!(summary.test_report.tweets, 2);
        assert_eq!(summary.test_report.errors.as_ref().unwrap().labeled, 2);
        assert_eq!(summary.twitter_report.tweets, 2);
        assert_eq!(summary.charts.len(), 8);
        assert!(summary.charts.iter().all(|p| p.exists()));
        assert_eq!(summary.agreement[0].label, "all");
        assert!(summary.agreement[0].alpha.is_some());
        assert!(dir.path().join("results/best_model.json").exists());

        // Second run reuses the saved model and predictions
        let again = run_pipeline(&config, false).unwrap();
        assert!(again.training.is_none());
        assert_eq!(again.twitter_report, summary.twitter_report);
    }

    #[test]
    fn test_evaluate_dataset() {
        let dir = TempDir::new().unwrap();
        let config = project(dir.path());
        let mut embeddings = Embeddings::from_config(&config);
        let (model, _) = train_model(&config, &mut embeddings, true).unwrap();

        let eval = evaluate_dataset(&model, &config.paths.data(Path::new("test.json")), &mut embeddings).unwrap();
        assert_eq!(eval.total, 2);
    }
}
