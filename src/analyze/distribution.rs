//! Dataset-wide distributions

use super::{tokens_of, AnalysisError};
use crate::frequency::FrequencyTable;
use crate::tweet::Tweet;

/// Predicted `[negative, neutral, positive]` counts.
pub fn sentiment_distribution<'a, I>(tweets: I) -> Result<[u64; 3], AnalysisError>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    let mut counts = [0u64; 3];
    for tweet in tweets {
        counts[tweet.prediction()?.index()] += 1;
    }
    Ok(counts)
}

/// Part-of-speech tag counts over all tokens, in order of first appearance.
pub fn pos_distribution<'a, I>(tweets: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    let mut table = FrequencyTable::new();
    for tweet in tweets {
        for token in tokens_of(tweet).iter() {
            table.add(token.pos.clone());
        }
    }
    table.iter().map(|(pos, count)| (pos.clone(), count)).collect()
}
