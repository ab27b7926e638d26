//! Mini-batch training

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::evaluate::{evaluate, Evaluation};
use super::model::{feature_matrix, FeedForwardNetwork};
use super::optimizer::OptimizerKind;
use super::ModelError;
use crate::tweet::{Representation, Tweet};

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub optimizer: OptimizerKind,
    /// Seed for batch shuffling and dropout
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { epochs: 20, batch_size: 32, learning_rate: 0.001, optimizer: OptimizerKind::Adam, seed: 42 }
    }
}

/// Labeled feature rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub features: Array2<f64>,
    pub labels: Vec<usize>,
}

impl Samples {
    pub fn new(features: Array2<f64>, labels: Vec<usize>) -> Result<Self, ModelError> {
        if features.nrows() != labels.len() {
            return Err(ModelError::SampleMismatch { rows: features.nrows(), labels: labels.len() });
        }
        Ok(Self { features, labels })
    }

    /// Tweets carrying both a gold annotation and the pooled vector; others are skipped.
    pub fn from_tweets(tweets: &[Tweet], representation: Representation) -> Result<Self, ModelError> {
        let mut vectors = Vec::with_capacity(tweets.len());
        let mut labels = Vec::with_capacity(tweets.len());
        for tweet in tweets {
            if let (Some(vector), Some(gold)) = (tweet.vector(representation), tweet.annotation) {
                vectors.push(vector);
                labels.push(gold.index());
            }
        }
        let skipped = tweets.len() - vectors.len();
        if skipped > 0 {
            warn!(skipped, field = representation.field(), "tweets without annotation or vector skipped");
        }

        let width = vectors.first().map_or(0, |v| v.len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != width) {
            return Err(ModelError::DimensionMismatch { expected: width, found: bad.len() });
        }
        Self::new(feature_matrix(&vectors, width), labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn width(&self) -> usize {
        self.features.ncols()
    }
}

/// Train for `config.epochs` epochs; returns the mean loss of each epoch.
pub fn train(
    network: &mut FeedForwardNetwork,
    samples: &Samples,
    config: &TrainingConfig,
) -> Result<Vec<f64>, ModelError> {
    if samples.is_empty() {
        return Err(ModelError::EmptyDataset);
    }
    let batch_size = config.batch_size.max(1);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut optimizers = [
        config.optimizer.build(config.learning_rate),
        config.optimizer.build(config.learning_rate),
        config.optimizer.build(config.learning_rate),
    ];
    let mut order: Vec<usize> = (0..samples.len()).collect();
    let mut losses = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        order.shuffle(&mut rng);
        let mut total = 0.0;
        let mut batches = 0usize;
        for batch in order.chunks(batch_size) {
            let x = samples.features.select(Axis(0), batch);
            let y: Vec<usize> = batch.iter().map(|&i| samples.labels[i]).collect();
            total += network.train_batch(&x, &y, &mut optimizers, &mut rng)?;
            batches += 1;
        }
        let loss = total / batches as f64;
        info!(epoch, epochs = config.epochs, loss, "epoch finished");
        losses.push(loss);
    }
    Ok(losses)
}

/// Result of [`train_eval`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainEval {
    pub losses: Vec<f64>,
    pub dev: Evaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train: Option<Evaluation>,
}

/// Train, then evaluate on the dev set and optionally on the training set.
pub fn train_eval(
    network: &mut FeedForwardNetwork,
    train_samples: &Samples,
    dev_samples: &Samples,
    config: &TrainingConfig,
    evaluate_train: bool,
) -> Result<TrainEval, ModelError> {
    let losses = train(network, train_samples, config)?;
    let dev = evaluate(network, dev_samples)?;
    debug!(accuracy = dev.accuracy, "dev evaluation");
    let train = if evaluate_train { Some(evaluate(network, train_samples)?) } else { None };
    Ok(TrainEval { losses, dev, train })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tweet::Sentiment;
    use ndarray::array;

    fn separable() -> Samples {
        let features = array![
            [2.0, 0.0],
            [1.5, 0.2],
            [1.8, -0.1],
            [0.0, 2.0],
            [0.2, 1.6],
            [-0.1, 1.9],
            [-2.0, -2.0],
            [-1.7, -1.5],
            [-1.9, -2.2],
        ];
        Samples::new(features, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]).unwrap()
    }

    #[test]
    fn test_separable_reaches_full_accuracy() {
        let samples = separable();
        let mut net = FeedForwardNetwork::new(2, 16, 16, 3, 0.0, 11).unwrap();
        let config = TrainingConfig { epochs: 150, batch_size: 3, learning_rate: 0.01, ..Default::default() };
        let result = train_eval(&mut net, &samples, &samples, &config, true).unwrap();
        assert_eq!(result.losses.len(), 150);
        assert!(result.losses.last().unwrap() < &result.losses[0]);
        assert_eq!(result.dev.accuracy, 100.0);
        assert!(result.train.is_some());
    }

    #[test]
    fn test_training_is_deterministic() {
        let samples = separable();
        let config = TrainingConfig { epochs: 5, batch_size: 4, ..Default::default() };
        let mut a = FeedForwardNetwork::new(2, 8, 8, 3, 0.3, 5).unwrap();
        let mut b = a.clone();
        let la = train(&mut a, &samples, &config).unwrap();
        let lb = train(&mut b, &samples, &config).unwrap();
        assert_eq!(la, lb);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_training_set() {
        let samples = Samples::new(Array2::zeros((0, 2)), vec![]).unwrap();
        let mut net = FeedForwardNetwork::new(2, 4, 4, 3, 0.0, 1).unwrap();
        assert!(matches!(train(&mut net, &samples, &TrainingConfig::default()), Err(ModelError::EmptyDataset)));
    }

    #[test]
    fn test_samples_from_tweets() {
        let mut labeled = Tweet::new("a");
        labeled.annotation = Some(Sentiment::Positive);
        labeled.set_vector(Representation::Avg, vec![0.5, 1.0]);
        let mut unlabeled = Tweet::new("b");
        unlabeled.set_vector(Representation::Avg, vec![0.0, 0.0]);
        let mut other = Tweet::new("c");
        other.annotation = Some(Sentiment::Negative);
        other.set_vector(Representation::Max, vec![1.0, 1.0]);

        let samples = Samples::from_tweets(&[labeled, unlabeled, other], Representation::Avg).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples.labels, vec![2]);
        assert_eq!(samples.features, array![[0.5, 1.0]]);
    }

    #[test]
    fn test_samples_ragged_vectors() {
        let mut a = Tweet::new("a");
        a.annotation = Some(Sentiment::Neutral);
        a.set_vector(Representation::Min, vec![0.0, 0.0]);
        let mut b = a.clone();
        b.set_vector(Representation::Min, vec![0.0]);
        assert!(matches!(
            Samples::from_tweets(&[a, b], Representation::Min),
            Err(ModelError::DimensionMismatch { expected: 2, found: 1 })
        ));
    }
}
