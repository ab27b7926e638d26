//! Analysis report aggregation and formatting

use serde::Serialize;
use tracing::debug;

use super::distribution::{pos_distribution, sentiment_distribution};
use super::hashtags::{analyze_hashtags, most_wrongly_classified_hashtags, HashtagSentiments, WrongHashtag};
use super::temporal::{temporal_distribution, TemporalDistribution, WEEKDAYS};
use super::users::{analyze_active_users, UserActivity};
use super::words::{most_frequent_words, wrongly_classified};
use super::AnalysisError;
use crate::frequency::TOP_K;
use crate::tweet::{Sentiment, Tweet};

/// Knobs for report building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsOptions {
    /// Entries per top list
    pub top_k: usize,
    /// Minimum occurrences for a hashtag in the misclassification ranking
    pub min_hashtag_occurrences: u64,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self { top_k: TOP_K, min_hashtag_occurrences: 3 }
    }
}

/// Error analysis over tweets with a gold annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorAnalysis {
    pub labeled: usize,
    pub misclassified: usize,
    /// Most frequent content words in misclassified tweets
    pub frequent_words: Vec<(String, u64)>,
    pub wrong_hashtags: Vec<WrongHashtag>,
}

/// Statistics over a predicted tweet dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub tweets: usize,
    /// Predicted `[negative, neutral, positive]` counts
    pub sentiments: [u64; 3],
    /// Part-of-speech tag counts
    pub pos: Vec<(String, u64)>,
    pub top_hashtags: Vec<HashtagSentiments>,
    /// Present when tweets carry `author_name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_users: Option<Vec<UserActivity>>,
    /// Present when tweets carry `created_at`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalDistribution>,
    /// Present when tweets carry a gold `annotation`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorAnalysis>,
}

impl AnalysisReport {
    /// Compute every statistic the dataset supports.
    ///
    /// Every tweet needs a prediction. Author, timestamp and annotation
    /// sections are computed when any tweet carries the field, and then every
    /// tweet must carry it.
    pub fn build(tweets: &[Tweet], options: &StatsOptions) -> Result<Self, AnalysisError> {
        let k = options.top_k;
        let sentiments = sentiment_distribution(tweets)?;
        let pos = pos_distribution(tweets);
        let top_hashtags = analyze_hashtags(tweets, k)?;

        let active_users = if tweets.iter().any(|t| t.author_name.is_some()) {
            Some(analyze_active_users(tweets, k)?)
        } else {
            None
        };
        let temporal = if tweets.iter().any(|t| t.created_at.is_some()) {
            Some(temporal_distribution(tweets)?)
        } else {
            None
        };

        let labeled: Vec<&Tweet> = tweets.iter().filter(|t| t.annotation.is_some()).collect();
        let errors = if labeled.is_empty() {
            None
        } else {
            let wrong = wrongly_classified(labeled.iter().copied());
            Some(ErrorAnalysis {
                labeled: labeled.len(),
                misclassified: wrong.len(),
                frequent_words: most_frequent_words(wrong.iter().copied(), k)?,
                wrong_hashtags: most_wrongly_classified_hashtags(
                    labeled.iter().copied(),
                    k,
                    options.min_hashtag_occurrences,
                )?,
            })
        };

        debug!(tweets = tweets.len(), labeled = labeled.len(), "built analysis report");
        Ok(Self { tweets: tweets.len(), sentiments, pos, top_hashtags, active_users, temporal, errors })
    }
}

fn heading(output: &mut String, title: &str) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&"─".repeat(title.chars().count()));
    output.push('\n');
}

/// Format the report as human-readable text.
pub fn format_report_text(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str("Tweet Sentiment Report\n");
    output.push_str("======================\n");
    output.push_str(&format!("Tweets analyzed: {}\n", report.tweets));
    output.push('\n');

    heading(&mut output, "SENTIMENT DISTRIBUTION");
    let total: u64 = report.sentiments.iter().sum();
    for sentiment in Sentiment::ALL {
        let count = report.sentiments[sentiment.index()];
        let percentage = if total == 0 { 0.0 } else { count as f64 * 100.0 / total as f64 };
        output.push_str(&format!("  {:10} {:>8}  ({:.1}%)\n", sentiment.label(), count, percentage));
    }
    output.push('\n');

    if !report.pos.is_empty() {
        heading(&mut output, "PART OF SPEECH");
        for (pos, count) in &report.pos {
            output.push_str(&format!("  {:10} {:>8}\n", pos, count));
        }
        output.push('\n');
    }

    if !report.top_hashtags.is_empty() {
        heading(&mut output, &format!("TOP HASHTAGS (top {})", report.top_hashtags.len()));
        for row in &report.top_hashtags {
            let [neg, neu, pos] = row.sentiments;
            output.push_str(&format!(
                "  {:24} {:>6}  neg {:>4}  neu {:>4}  pos {:>4}\n",
                row.hashtag, row.count, neg, neu, pos
            ));
        }
        output.push('\n');
    }

    if let Some(users) = report.active_users.as_ref().filter(|u| !u.is_empty()) {
        heading(&mut output, &format!("MOST ACTIVE USERS (top {})", users.len()));
        for user in users {
            let [neg, neu, pos] = user.sentiments;
            let days: Vec<String> = user.weekdays.iter().map(u64::to_string).collect();
            output.push_str(&format!(
                "  {:24} {:>6}  neg {:>4}  neu {:>4}  pos {:>4}  Mo-Su {}\n",
                user.user,
                user.tweets,
                neg,
                neu,
                pos,
                days.join("/")
            ));
        }
        output.push('\n');
    }

    if let Some(temporal) = &report.temporal {
        heading(&mut output, "AVERAGE TWEETS PER WEEKDAY");
        for (day, avg) in WEEKDAYS.iter().zip(temporal.weekday_average) {
            output.push_str(&format!("  {:10} {:>8.1}\n", day, avg));
        }
        output.push('\n');
    }

    if let Some(errors) = &report.errors {
        heading(&mut output, "MISCLASSIFICATIONS");
        output.push_str(&format!("  Labeled tweets:   {}\n", errors.labeled));
        output.push_str(&format!("  Misclassified:    {}\n", errors.misclassified));
        output.push('\n');

        if !errors.frequent_words.is_empty() {
            heading(&mut output, "FREQUENT WORDS IN MISCLASSIFIED TWEETS");
            for (word, count) in &errors.frequent_words {
                output.push_str(&format!("  {:24} {:>6}\n", word, count));
            }
            output.push('\n');
        }

        if !errors.wrong_hashtags.is_empty() {
            heading(&mut output, "MOST OFTEN MISCLASSIFIED HASHTAGS");
            for row in &errors.wrong_hashtags {
                output.push_str(&format!(
                    "  {:24} {:>4} of {:>4}  ({:.0}%)\n",
                    row.hashtag,
                    row.incorrect,
                    row.total,
                    row.ratio * 100.0
                ));
            }
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(text: &str, user: &str, at: &str, gold: Option<Sentiment>, predicted: Sentiment) -> Tweet {
        let mut t = Tweet::new(text);
        t.author_name = Some(user.to_string());
        t.created_at = Some(at.to_string());
        t.annotation = gold;
        t.predicted_sentiment = Some(predicted);
        t
    }

    fn dataset() -> Vec<Tweet> {
        use Sentiment::*;
        vec![
            tweet("Impfung jetzt #corona", "anna", "2021-05-03T09:00:00Z", Some(Positive), Negative),
            tweet("Impfung bitte #corona", "anna", "2021-05-03T10:00:00Z", Some(Positive), Negative),
            tweet("Regen #wetter", "ben", "2021-05-04T09:00:00Z", Some(Neutral), Neutral),
            tweet("Sonne #wetter #corona", "cem", "2021-05-05T09:00:00Z", None, Positive),
        ]
    }

    #[test]
    fn test_build_full_report() {
        let report = AnalysisReport::build(&dataset(), &StatsOptions::default()).unwrap();
        assert_eq!(report.tweets, 4);
        assert_eq!(report.sentiments, [2, 1, 1]);
        assert_eq!(report.top_hashtags[0].hashtag, "#corona");
        assert_eq!(report.top_hashtags[0].sentiments, [2, 0, 1]);

        let users = report.active_users.as_ref().unwrap();
        assert_eq!(users[0].user, "anna");
        assert_eq!(users[0].tweets, 2);

        let temporal = report.temporal.as_ref().unwrap();
        assert_eq!(temporal.weekday_average[0], 2.0);

        let errors = report.errors.as_ref().unwrap();
        assert_eq!(errors.labeled, 3);
        assert_eq!(errors.misclassified, 2);
        assert_eq!(errors.frequent_words[0], ("Impfung".to_string(), 2));
        // #corona occurs twice among labeled tweets, below the default minimum of 3
        assert!(errors.wrong_hashtags.is_empty());
    }

    #[test]
    fn test_optional_sections() {
        let mut t = Tweet::new("Hallo #welt");
        t.predicted_sentiment = Some(Sentiment::Neutral);
        let report = AnalysisReport::build(&[t], &StatsOptions::default()).unwrap();
        assert!(report.active_users.is_none());
        assert!(report.temporal.is_none());
        assert!(report.errors.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("active_users").is_none());
        assert_eq!(json["sentiments"], serde_json::json!([0, 1, 0]));
    }

    #[test]
    fn test_format_report_text() {
        let options = StatsOptions { top_k: 10, min_hashtag_occurrences: 2 };
        let report = AnalysisReport::build(&dataset(), &options).unwrap();
        let text = format_report_text(&report);
        assert!(text.contains("Tweets analyzed: 4"));
        assert!(text.contains("SENTIMENT DISTRIBUTION\n──────────────────────\n"));
        assert!(text.contains("Negative"));
        assert!(text.contains("#corona"));
        assert!(text.contains("MOST ACTIVE USERS (top 3)"));
        assert!(text.contains("AVERAGE TWEETS PER WEEKDAY"));
        assert!(text.contains("MOST OFTEN MISCLASSIFIED HASHTAGS"));
        assert!(text.contains("(100%)"));
    }
}
