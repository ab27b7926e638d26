//! Sentiment classifier
//!
//! A small feed-forward network over pooled tweet vectors, trained with
//! softmax cross-entropy on seeded mini-batches.

mod evaluate;
mod layer;
mod model;
mod optimizer;
mod persist;
mod train;

use thiserror::Error;

use crate::dataset::DatasetError;

pub use evaluate::{evaluate, format_evaluation_text, Evaluation};
pub use layer::{DenseLayer, LayerGradients};
pub use model::{softmax, FeedForwardNetwork};
pub use optimizer::{Adam, Optimizer, OptimizerKind, Sgd};
pub use persist::{ModelFile, MODEL_FORMAT_VERSION};
pub use train::{train, train_eval, Samples, TrainEval, TrainingConfig};

/// Number of sentiment classes the CLI trains for.
pub const SENTIMENT_CLASSES: usize = 3;

/// Error building, training or applying a network
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid network: {0}")]
    InvalidArchitecture(String),
    #[error("input has {found} features, network expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("{rows} feature rows but {labels} labels")]
    SampleMismatch { rows: usize, labels: usize },
    #[error("no samples to train or evaluate on")]
    EmptyDataset,
    #[error("class index {0} out of range")]
    InvalidLabel(usize),
    #[error("tweet has no '{0}' vector")]
    MissingVector(&'static str),
    #[error("unsupported model format version {0}")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
