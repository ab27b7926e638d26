//! Tweet preprocessing
//!
//! Turns tweet text into pooled word vectors and, for prediction runs, adds
//! hashtags, token attributes and the predicted sentiment. Tweets with no
//! token in the embedding vocabulary carry no signal and are dropped.
//!
//! Per-tweet work runs on the rayon thread pool; output keeps input order.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::embeddings::{EmbeddingError, EmbeddingTable};
use crate::error::Error;
use crate::network::{ModelError, ModelFile};
use crate::tokenizer::{extract_hashtags, raw_tokens, tokenize};
use crate::tweet::{load_tweets, save_tweets, Representation, Tweet};

/// Element-wise min, max or mean over equally sized vectors.
///
/// Returns `None` for an empty input.
///
/// # Examples
///
/// ```
/// use tweetsent::preprocess::pool;
/// use tweetsent::tweet::Representation;
///
/// let vectors: [&[f32]; 2] = [&[1.0, 4.0], &[3.0, 2.0]];
/// assert_eq!(pool(&vectors, Representation::Max), Some(vec![3.0, 4.0]));
/// assert_eq!(pool(&vectors, Representation::Avg), Some(vec![2.0, 3.0]));
/// assert_eq!(pool(&[], Representation::Min), None);
/// ```
pub fn pool(vectors: &[&[f32]], representation: Representation) -> Option<Vec<f32>> {
    let (first, rest) = vectors.split_first()?;
    let mut acc: Vec<f64> = first.iter().map(|&v| f64::from(v)).collect();
    for vector in rest {
        for (a, &v) in acc.iter_mut().zip(vector.iter()) {
            let v = f64::from(v);
            *a = match representation {
                Representation::Min => a.min(v),
                Representation::Max => a.max(v),
                Representation::Avg => *a + v,
            };
        }
    }
    if representation == Representation::Avg {
        let n = vectors.len() as f64;
        acc.iter_mut().for_each(|a| *a /= n);
    }
    Some(acc.into_iter().map(|a| a as f32).collect())
}

/// Preprocessor backed by a word embedding table.
#[derive(Debug, Clone)]
pub struct TweetPreprocessor {
    embeddings: EmbeddingTable,
}

impl TweetPreprocessor {
    pub fn new(embeddings: EmbeddingTable) -> Self {
        Self { embeddings }
    }

    /// Load the embedding table from a fastText `.vec` file.
    pub fn load(path: &Path) -> Result<Self, EmbeddingError> {
        EmbeddingTable::load(path).map(Self::new)
    }

    pub fn embeddings(&self) -> &EmbeddingTable {
        &self.embeddings
    }

    /// Vectors of the tweet's tokens that are in the vocabulary, in token order.
    pub fn convert_tweet<'a>(&'a self, text: &str) -> Vec<&'a [f32]> {
        raw_tokens(text).filter_map(|(_, token)| self.embeddings.get(token)).collect()
    }

    /// Add all three pooled vectors; `None` when no token is known.
    pub fn vectorize(&self, mut tweet: Tweet) -> Option<Tweet> {
        let vectors = self.convert_tweet(&tweet.text);
        for representation in [Representation::Min, Representation::Max, Representation::Avg] {
            let pooled = pool(&vectors, representation)?;
            tweet.set_vector(representation, pooled);
        }
        Some(tweet)
    }

    /// Vectorize a batch in parallel, dropping tweets without known tokens.
    pub fn convert_tweets(&self, tweets: Vec<Tweet>) -> Vec<Tweet> {
        let total = tweets.len();
        let converted: Vec<Tweet> = tweets.into_par_iter().filter_map(|t| self.vectorize(t)).collect();
        debug!(total, kept = converted.len(), "vectorized tweets");
        converted
    }

    /// Read a tweet dataset, add pooled vectors and write the result.
    ///
    /// Returns the number of tweets written.
    pub fn convert_dataset(&self, input: &Path, output: &Path) -> Result<usize, Error> {
        let tweets = load_tweets(input)?;
        let total = tweets.len();
        let converted = self.convert_tweets(tweets);
        save_tweets(output, &converted, true)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            written = converted.len(),
            dropped = total - converted.len(),
            "preprocessed dataset"
        );
        Ok(converted.len())
    }

    /// Add hashtags, token attributes, the model's pooled vector and its prediction.
    ///
    /// `None` when no token is known.
    pub fn annotate(&self, mut tweet: Tweet, model: &ModelFile) -> Option<Result<Tweet, ModelError>> {
        let vectors = self.convert_tweet(&tweet.text);
        let pooled = pool(&vectors, model.representation)?;
        tweet.hashtags = Some(extract_hashtags(&tweet.text));
        tweet.tokens = Some(tokenize(&tweet.text));
        tweet.set_vector(model.representation, pooled);
        Some(model.predict(&tweet).map(|sentiment| {
            tweet.predicted_sentiment = Some(sentiment);
            tweet
        }))
    }

    /// Annotate and predict a batch in parallel, keeping input order.
    pub fn predict_tweets(&self, tweets: Vec<Tweet>, model: &ModelFile) -> Result<Vec<Tweet>, ModelError> {
        tweets.into_par_iter().filter_map(|t| self.annotate(t, model)).collect()
    }

    /// Read a tweet dataset, predict every tweet and write the result.
    ///
    /// Returns the number of tweets written.
    pub fn preprocess_with_prediction(&self, input: &Path, output: &Path, model: &ModelFile) -> Result<usize, Error> {
        let tweets = load_tweets(input)?;
        let total = tweets.len();
        let predicted = self.predict_tweets(tweets, model)?;
        save_tweets(output, &predicted, false)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            written = predicted.len(),
            dropped = total - predicted.len(),
            representation = model.representation.field(),
            "predicted dataset"
        );
        Ok(predicted.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::FeedForwardNetwork;
    use crate::tweet::Sentiment;
    use tempfile::TempDir;

    fn preprocessor() -> TweetPreprocessor {
        TweetPreprocessor::new(EmbeddingTable::from_vectors(
            2,
            [
                ("gut".to_string(), vec![1.0, 0.0]),
                ("schlecht".to_string(), vec![-1.0, 2.0]),
                ("#Berlin".to_string(), vec![0.0, 4.0]),
            ],
        ))
    }

    #[test]
    fn test_pool_min_max_avg() {
        let vectors: [&[f32]; 3] = [&[1.0, -1.0], &[3.0, 5.0], &[2.0, 2.0]];
        assert_eq!(pool(&vectors, Representation::Min), Some(vec![1.0, -1.0]));
        assert_eq!(pool(&vectors, Representation::Max), Some(vec![3.0, 5.0]));
        assert_eq!(pool(&vectors, Representation::Avg), Some(vec![2.0, 2.0]));
    }

    #[test]
    fn test_convert_tweet_skips_unknown() {
        let p = preprocessor();
        let vectors = p.convert_tweet("gut oder schlecht?");
        assert_eq!(vectors, vec![&[1.0, 0.0][..], &[-1.0, 2.0][..]]);
        assert!(p.convert_tweet("nichts bekannt").is_empty());
    }

    #[test]
    fn test_convert_tweets_drops_and_keeps_order() {
        let p = preprocessor();
        let tweets = vec![Tweet::new("gut"), Tweet::new("unbekannt"), Tweet::new("schlecht #Berlin")];
        let converted = p.convert_tweets(tweets);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].text, "gut");
        assert_eq!(converted[1].tweetavg, Some(vec![-0.5, 3.0]));
        for tweet in &converted {
            for r in [Representation::Min, Representation::Max, Representation::Avg] {
                assert_eq!(tweet.vector(r).map(<[f32]>::len), Some(2));
            }
        }
    }

    #[test]
    fn test_convert_dataset() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out/preprocessed.json");
        std::fs::write(&input, r#"[{"text": "gut", "annotation": 2}, {"text": "???"}]"#).unwrap();

        let written = preprocessor().convert_dataset(&input, &output).unwrap();
        assert_eq!(written, 1);
        let tweets = load_tweets(&output).unwrap();
        assert_eq!(tweets[0].annotation, Some(Sentiment::Positive));
        assert_eq!(tweets[0].tweetmax, Some(vec![1.0, 0.0]));
    }

    #[test]
    fn test_preprocess_with_prediction() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("predicted.json");
        std::fs::write(&input, r#"[{"text": "Sehr gut #Berlin"}, {"text": "leer"}]"#).unwrap();

        let network = FeedForwardNetwork::new(2, 4, 4, 3, 0.0, 3).unwrap();
        let model = ModelFile::new(network, Representation::Avg);
        let written = preprocessor().preprocess_with_prediction(&input, &output, &model).unwrap();
        assert_eq!(written, 1);

        let tweets = load_tweets(&output).unwrap();
        let tweet = &tweets[0];
        assert_eq!(tweet.hashtags, Some(vec!["#Berlin".to_string()]));
        assert_eq!(tweet.tokens.as_ref().map(Vec::len), Some(3));
        assert!(tweet.predicted_sentiment.is_some());
        assert!(tweet.tweetavg.is_some());
        assert!(tweet.tweetmin.is_none());
    }
}
