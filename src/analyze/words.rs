//! Misclassified tweets and their vocabulary

use super::{rank, tokens_of, AnalysisError};
use crate::frequency::FrequencyTable;
use crate::tweet::{TokenAttributes, Tweet};

/// Tweets whose prediction differs from the gold annotation.
///
/// Tweets without a gold annotation are never counted as wrong.
pub fn wrongly_classified<'a, I>(tweets: I) -> Vec<&'a Tweet>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    tweets.into_iter().filter(|t| t.is_misclassified()).collect()
}

/// Whether a token counts as a content word.
///
/// Stop words, punctuation, whitespace and anything not purely alphabetic
/// are skipped.
pub fn is_content_word(token: &TokenAttributes) -> bool {
    let text = token.text.as_str();
    !token.stop
        && !text.is_empty()
        && !text.chars().all(|c| c.is_ascii_punctuation())
        && !text.chars().all(char::is_whitespace)
        && text.chars().all(char::is_alphabetic)
}

/// The `k` most frequent content words, counted case-sensitively.
pub fn most_frequent_words<'a, I>(tweets: I, k: usize) -> Result<Vec<(String, u64)>, AnalysisError>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    let mut table = FrequencyTable::new();
    for tweet in tweets {
        for token in tokens_of(tweet).iter().filter(|t| is_content_word(t)) {
            table.add(token.text.clone());
        }
    }
    Ok(rank(&table, k)?)
}
