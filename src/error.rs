//! Crate-level error aggregating the per-module error types

use thiserror::Error;

use crate::agreement::IaaError;
use crate::analyze::AnalysisError;
use crate::config::ConfigError;
use crate::dataset::DatasetError;
use crate::embeddings::EmbeddingError;
use crate::frequency::RankError;
use crate::network::ModelError;
use crate::output::OutputError;
use crate::tweet::TweetError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Tweet(#[from] TweetError),
    #[error(transparent)]
    Rank(#[from] RankError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("agreement: {0}")]
    Agreement(#[from] IaaError),
    #[error("model: {0}")]
    Model(#[from] ModelError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
