//! Hashtag statistics

use std::collections::HashMap;

use serde::Serialize;

use super::{hashtags_of, rank, AnalysisError};
use crate::frequency::FrequencyTable;
use crate::tweet::Tweet;

/// A frequent hashtag with its predicted sentiment counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashtagSentiments {
    pub hashtag: String,
    pub count: u64,
    /// `[negative, neutral, positive]`
    pub sentiments: [u64; 3],
}

/// A hashtag ranked by how often its tweets are misclassified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrongHashtag {
    pub hashtag: String,
    /// Occurrences in all tweets
    pub total: u64,
    /// Occurrences in misclassified tweets
    pub incorrect: u64,
    /// `incorrect / total`
    pub ratio: f64,
}

/// The `k` most used hashtags and the sentiments predicted for their tweets.
///
/// Every tweet must carry a prediction.
pub fn analyze_hashtags<'a, I>(tweets: I, k: usize) -> Result<Vec<HashtagSentiments>, AnalysisError>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    let mut table = FrequencyTable::new();
    let mut sentiments: HashMap<String, [u64; 3]> = HashMap::new();
    for tweet in tweets {
        let predicted = tweet.prediction()?;
        for hashtag in hashtags_of(tweet).iter() {
            table.add(hashtag.clone());
            sentiments.entry(hashtag.clone()).or_default()[predicted.index()] += 1;
        }
    }

    Ok(rank(&table, k)?
        .into_iter()
        .map(|(hashtag, count)| {
            let sentiments = sentiments.get(&hashtag).copied().unwrap_or_default();
            HashtagSentiments { hashtag, count, sentiments }
        })
        .collect())
}

/// Hashtags ranked by misclassification count.
///
/// Ranking stops at the first hashtag that occurs fewer than
/// `min_occurrences` times overall, so rare hashtags and everything ranked
/// below them are left out. Every tweet must carry a gold annotation and a
/// prediction.
pub fn most_wrongly_classified_hashtags<'a, I>(
    tweets: I,
    k: usize,
    min_occurrences: u64,
) -> Result<Vec<WrongHashtag>, AnalysisError>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    let mut totals = FrequencyTable::new();
    let mut incorrect = FrequencyTable::new();
    for tweet in tweets {
        let wrong = tweet.prediction()? != tweet.gold()?;
        for hashtag in hashtags_of(tweet).iter() {
            totals.add(hashtag.clone());
            if wrong {
                incorrect.add(hashtag.clone());
            } else {
                incorrect.touch(hashtag.clone());
            }
        }
    }

    let mut result = Vec::new();
    for (hashtag, wrong) in rank(&incorrect, k)? {
        let total = totals.get(&hashtag);
        if total < min_occurrences {
            break;
        }
        result.push(WrongHashtag { ratio: wrong as f64 / total as f64, hashtag, total, incorrect: wrong });
    }
    Ok(result)
}
