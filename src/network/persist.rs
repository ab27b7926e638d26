//! Model files
//!
//! A trained network is stored as JSON together with the tweet
//! representation it was trained on, so prediction pools tweets the same way.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::model::FeedForwardNetwork;
use super::train::TrainingConfig;
use super::ModelError;
use crate::dataset::{read_json, write_json};
use crate::tweet::{Representation, Sentiment, Tweet};

/// Current model file format.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// A trained network and the metadata needed to use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub version: u32,
    pub representation: Representation,
    pub network: FeedForwardNetwork,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainingConfig>,
    /// RFC 3339 creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ModelFile {
    pub fn new(network: FeedForwardNetwork, representation: Representation) -> Self {
        Self {
            version: MODEL_FORMAT_VERSION,
            representation,
            network,
            training: None,
            created_at: Some(Utc::now().to_rfc3339()),
        }
    }

    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = Some(training);
        self
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        write_json(path, self, true)?;
        info!(path = %path.display(), "saved model");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let model: Self = read_json(path)?;
        if model.version != MODEL_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion(model.version));
        }
        Ok(model)
    }

    /// Predict from the tweet's stored vector for this model's representation.
    pub fn predict(&self, tweet: &Tweet) -> Result<Sentiment, ModelError> {
        let vector = tweet
            .vector(self.representation)
            .ok_or(ModelError::MissingVector(self.representation.field()))?;
        self.network.predict(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models/best.json");
        let network = FeedForwardNetwork::new(3, 4, 4, 3, 0.1, 9).unwrap();
        let model = ModelFile::new(network, Representation::Max).with_training(TrainingConfig::default());
        model.save(&path).unwrap();

        let loaded = ModelFile::load(&path).unwrap();
        assert_eq!(loaded.representation, Representation::Max);
        assert_eq!(loaded.training, Some(TrainingConfig::default()));

        let mut tweet = Tweet::new("x");
        tweet.set_vector(Representation::Max, vec![0.3, -0.2, 1.0]);
        assert_eq!(loaded.predict(&tweet).unwrap(), model.predict(&tweet).unwrap());
    }

    #[test]
    fn test_missing_vector() {
        let network = FeedForwardNetwork::new(2, 2, 2, 3, 0.0, 1).unwrap();
        let model = ModelFile::new(network, Representation::Avg);
        assert!(matches!(model.predict(&Tweet::new("x")), Err(ModelError::MissingVector("tweetavg"))));
    }

    #[test]
    fn test_unsupported_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let network = FeedForwardNetwork::new(2, 2, 2, 3, 0.0, 1).unwrap();
        let mut model = ModelFile::new(network, Representation::Avg);
        model.version = 99;
        model.save(&path).unwrap();
        assert!(matches!(ModelFile::load(&path), Err(ModelError::UnsupportedVersion(99))));
    }
}
