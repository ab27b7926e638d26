//! Most active accounts

use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;

use super::{rank, AnalysisError};
use crate::frequency::FrequencyTable;
use crate::tweet::Tweet;

/// Activity of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserActivity {
    pub user: String,
    pub tweets: u64,
    /// Predicted `[negative, neutral, positive]` counts
    pub sentiments: [u64; 3],
    /// Tweets per weekday, Monday first
    pub weekdays: [u64; 7],
}

#[derive(Default)]
struct Tally {
    sentiments: [u64; 3],
    weekdays: [u64; 7],
}

/// The `k` accounts with the most tweets.
///
/// Every tweet needs an author, a prediction and a valid `created_at`.
pub fn analyze_active_users<'a, I>(tweets: I, k: usize) -> Result<Vec<UserActivity>, AnalysisError>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    let mut table = FrequencyTable::new();
    let mut tallies: HashMap<String, Tally> = HashMap::new();
    for tweet in tweets {
        let user = tweet.author()?;
        let predicted = tweet.prediction()?;
        let weekday = tweet.timestamp()?.weekday().num_days_from_monday() as usize;

        table.add(user.to_string());
        let tally = tallies.entry(user.to_string()).or_default();
        tally.sentiments[predicted.index()] += 1;
        tally.weekdays[weekday] += 1;
    }

    Ok(rank(&table, k)?
        .into_iter()
        .map(|(user, tweets)| {
            let tally = tallies.remove(&user).unwrap_or_default();
            UserActivity { user, tweets, sentiments: tally.sentiments, weekdays: tally.weekdays }
        })
        .collect())
}
