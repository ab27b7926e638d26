//! Data models for tweet datasets
//!
//! Tweets travel through every stage as JSON objects. Each stage adds fields
//! (pooled vectors, predicted sentiment, token attributes, hashtags); fields
//! this crate does not know about are kept and written back unchanged.

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{read_json, write_json, DatasetError};

/// Error for malformed tweet fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TweetError {
    /// Sentiment outside 0..=2 or an unknown label
    #[error("invalid sentiment '{0}', expected 0 (negative), 1 (neutral) or 2 (positive)")]
    InvalidSentiment(String),
    /// A field needed by the current stage is absent
    #[error("tweet is missing field '{0}'")]
    MissingField(&'static str),
    /// `created_at` is not an ISO-8601 timestamp
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Sentiment class. Serialized as its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "SentimentRepr", into = "u8")]
pub enum Sentiment {
    Negative = 0,
    Neutral = 1,
    Positive = 2,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    /// Class index (0, 1, 2).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
        }
    }
}

impl From<Sentiment> for u8 {
    fn from(s: Sentiment) -> u8 {
        s as u8
    }
}

/// Accepted on input: an index or a label.
#[derive(Deserialize)]
#[serde(untagged)]
enum SentimentRepr {
    Index(u64),
    Label(String),
}

impl TryFrom<SentimentRepr> for Sentiment {
    type Error = TweetError;

    fn try_from(repr: SentimentRepr) -> Result<Self, Self::Error> {
        match repr {
            SentimentRepr::Index(i) => usize::try_from(i)
                .ok()
                .and_then(Sentiment::from_index)
                .ok_or_else(|| TweetError::InvalidSentiment(i.to_string())),
            SentimentRepr::Label(label) => match label.trim().to_lowercase().as_str() {
                "0" | "negative" => Ok(Sentiment::Negative),
                "1" | "neutral" => Ok(Sentiment::Neutral),
                "2" | "positive" => Ok(Sentiment::Positive),
                _ => Err(TweetError::InvalidSentiment(label)),
            },
        }
    }
}

/// Pooled vector a model consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Representation {
    /// Element-wise minimum over token vectors
    #[serde(rename = "tweetmin")]
    #[value(name = "tweetmin")]
    Min,
    /// Element-wise maximum over token vectors
    #[serde(rename = "tweetmax")]
    #[value(name = "tweetmax")]
    Max,
    /// Element-wise mean over token vectors
    #[default]
    #[serde(rename = "tweetavg")]
    #[value(name = "tweetavg")]
    Avg,
}

impl Representation {
    /// Field name in the tweet JSON.
    pub fn field(self) -> &'static str {
        match self {
            Representation::Min => "tweetmin",
            Representation::Max => "tweetmax",
            Representation::Avg => "tweetavg",
        }
    }
}

/// Linguistic attributes of one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAttributes {
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub pos: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dep: Option<String>,
    #[serde(default)]
    pub shape: String,
    #[serde(default)]
    pub alpha: bool,
    #[serde(default)]
    pub stop: bool,
}

/// A tweet record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<String>,
    /// Gold sentiment
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub annotation: Option<Sentiment>,
    #[serde(rename = "predicted-sentiment", skip_serializing_if = "Option::is_none", default)]
    pub predicted_sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hashtags: Option<Vec<String>>,
    #[serde(rename = "tokens-pos-attributes", skip_serializing_if = "Option::is_none", default)]
    pub tokens: Option<Vec<TokenAttributes>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tweetmin: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tweetmax: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tweetavg: Option<Vec<f32>>,
    /// Fields not modeled here
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Tweet {
    /// A tweet with only its text set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author_name: None,
            created_at: None,
            annotation: None,
            predicted_sentiment: None,
            hashtags: None,
            tokens: None,
            tweetmin: None,
            tweetmax: None,
            tweetavg: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Author, required by user statistics.
    pub fn author(&self) -> Result<&str, TweetError> {
        self.author_name.as_deref().ok_or(TweetError::MissingField("author_name"))
    }

    /// Gold label, required by error analysis.
    pub fn gold(&self) -> Result<Sentiment, TweetError> {
        self.annotation.ok_or(TweetError::MissingField("annotation"))
    }

    /// Prediction, required by every statistic over predicted sentiment.
    pub fn prediction(&self) -> Result<Sentiment, TweetError> {
        self.predicted_sentiment.ok_or(TweetError::MissingField("predicted-sentiment"))
    }

    /// Parse `created_at`.
    ///
    /// Accepts RFC 3339 (including a `Z` suffix) and offset-less ISO
    /// timestamps, which are taken as UTC.
    pub fn timestamp(&self) -> Result<DateTime<FixedOffset>, TweetError> {
        let raw = self.created_at.as_deref().ok_or(TweetError::MissingField("created_at"))?;
        parse_timestamp(raw)
    }

    /// Whether a gold label exists and the prediction differs from it.
    pub fn is_misclassified(&self) -> bool {
        matches!(
            (self.annotation, self.predicted_sentiment),
            (Some(gold), Some(predicted)) if gold != predicted
        )
    }

    /// The pooled vector stored for a representation.
    pub fn vector(&self, representation: Representation) -> Option<&[f32]> {
        match representation {
            Representation::Min => self.tweetmin.as_deref(),
            Representation::Max => self.tweetmax.as_deref(),
            Representation::Avg => self.tweetavg.as_deref(),
        }
    }

    pub fn set_vector(&mut self, representation: Representation, vector: Vec<f32>) {
        match representation {
            Representation::Min => self.tweetmin = Some(vector),
            Representation::Max => self.tweetmax = Some(vector),
            Representation::Avg => self.tweetavg = Some(vector),
        }
    }
}

/// Parse an ISO-8601 timestamp as found in tweet exports.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, TweetError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    // Python's isoformat() separates with a space
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }
    Err(TweetError::InvalidTimestamp(raw.to_string()))
}

/// Load a tweet dataset (a JSON array).
pub fn load_tweets(path: &Path) -> Result<Vec<Tweet>, DatasetError> {
    read_json(path)
}

/// Write a tweet dataset.
pub fn save_tweets(path: &Path, tweets: &[Tweet], pretty: bool) -> Result<(), DatasetError> {
    write_json(path, tweets, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};

    #[test]
    fn test_parse_full_record() {
        let json = r##"{
            "text": "Guten Morgen #Berlin",
            "author_name": "alice",
            "created_at": "2021-05-03T08:15:00.000Z",
            "annotation": 2,
            "predicted-sentiment": 1,
            "hashtags": ["#Berlin"],
            "id": "12345",
            "tokens-pos-attributes": [
                {"text": "Guten", "lemma": "gut", "pos": "ADJ", "tag": "ADJA", "dep": "nk",
                 "shape": "Xxxxx", "alpha": true, "stop": false}
            ]
        }"##;
        let tweet: Tweet = serde_json::from_str(json).unwrap();
        assert_eq!(tweet.annotation, Some(Sentiment::Positive));
        assert_eq!(tweet.predicted_sentiment, Some(Sentiment::Neutral));
        assert!(tweet.is_misclassified());
        assert_eq!(tweet.extra.get("id"), Some(&serde_json::json!("12345")));

        let tokens = tweet.tokens.as_ref().unwrap();
        assert_eq!(tokens[0].tag.as_deref(), Some("ADJA"));

        let ts = tweet.timestamp().unwrap();
        assert_eq!(ts.weekday(), Weekday::Mon);
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_round_trip_keeps_unknown_fields() {
        let json = r#"{"text": "x", "retweets": 7, "predicted-sentiment": 0}"#;
        let tweet: Tweet = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&tweet).unwrap();
        assert_eq!(back["retweets"], 7);
        assert_eq!(back["predicted-sentiment"], 0);
        assert!(back.get("hashtags").is_none());
    }

    #[test]
    fn test_sentiment_labels_and_errors() {
        let s: Sentiment = serde_json::from_str("\"positive\"").unwrap();
        assert_eq!(s, Sentiment::Positive);
        assert!(serde_json::from_str::<Sentiment>("3").is_err());
        assert!(serde_json::from_str::<Sentiment>("\"angry\"").is_err());
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2021-05-03T08:15:00Z").is_ok());
        assert!(parse_timestamp("2021-05-03T08:15:00+02:00").is_ok());
        assert!(parse_timestamp("2021-05-03 08:15:00+00:00").is_ok());
        assert!(parse_timestamp("2021-05-03T08:15:00").is_ok());
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(TweetError::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_missing_fields() {
        let tweet = Tweet::new("hello");
        assert_eq!(tweet.author(), Err(TweetError::MissingField("author_name")));
        assert_eq!(tweet.timestamp(), Err(TweetError::MissingField("created_at")));
        assert!(!tweet.is_misclassified());
    }

    #[test]
    fn test_vectors_by_representation() {
        let mut tweet = Tweet::new("x");
        tweet.set_vector(Representation::Max, vec![1.0, 2.0]);
        assert_eq!(tweet.vector(Representation::Max), Some(&[1.0, 2.0][..]));
        assert_eq!(tweet.vector(Representation::Avg), None);
    }
}
