//! Corpus analysis for predicted tweet datasets
//!
//! Provides statistics over tweets that carry a predicted sentiment:
//! - Misclassified tweets and their most frequent words
//! - Hashtag frequency, sentiment and misclassification rates
//! - Most active users by sentiment and weekday
//! - Posting frequency per weekday and hour of the week
//!
//! Every top list counts into a [`FrequencyTable`] and ranks it with
//! [`select_top_k`]; an empty table gives an empty list.

mod distribution;
mod hashtags;
mod report;
mod temporal;
mod users;
mod words;

use std::borrow::Cow;
use std::hash::Hash;

use thiserror::Error;

use crate::frequency::{select_top_k, FrequencyTable, RankError};
use crate::tokenizer::{extract_hashtags, tokenize};
use crate::tweet::{TokenAttributes, Tweet, TweetError};

// Re-export public API
pub use distribution::{pos_distribution, sentiment_distribution};
pub use hashtags::{analyze_hashtags, most_wrongly_classified_hashtags, HashtagSentiments, WrongHashtag};
pub use report::{format_report_text, AnalysisReport, ErrorAnalysis, StatsOptions};
pub use temporal::{temporal_distribution, TemporalDistribution, HOURS_PER_WEEK, WEEKDAYS};
pub use users::{analyze_active_users, UserActivity};
pub use words::{is_content_word, most_frequent_words, wrongly_classified};

/// Error computing a statistic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Tweet(#[from] TweetError),
    #[error(transparent)]
    Rank(#[from] RankError),
}

/// Rank a table, treating an empty table as an empty ranking.
fn rank<K: Eq + Hash + Clone>(table: &FrequencyTable<K>, k: usize) -> Result<Vec<(K, u64)>, RankError> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    select_top_k(table, k)
}

/// Stored token attributes, or a fresh tokenization of the text.
fn tokens_of(tweet: &Tweet) -> Cow<'_, [TokenAttributes]> {
    match &tweet.tokens {
        Some(tokens) => Cow::Borrowed(tokens.as_slice()),
        None => Cow::Owned(tokenize(&tweet.text)),
    }
}

/// Stored hashtags, or hashtags extracted from the text.
fn hashtags_of(tweet: &Tweet) -> Cow<'_, [String]> {
    match &tweet.hashtags {
        Some(tags) => Cow::Borrowed(tags.as_slice()),
        None => Cow::Owned(extract_hashtags(&tweet.text)),
    }
}
