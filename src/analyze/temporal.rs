//! Posting frequency over the week

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike};
use serde::Serialize;

use super::AnalysisError;
use crate::tweet::Tweet;

/// Weekday names, Monday first.
pub const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// Hours in a week.
pub const HOURS_PER_WEEK: usize = 7 * 24;

/// Average tweet counts per weekday and per hour of the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalDistribution {
    /// Average tweets on a Monday, Tuesday, ..., Sunday
    pub weekday_average: [f64; 7],
    /// Average tweets per hour of the week; index `weekday * 24 + hour`
    pub hour_of_week_average: Vec<f64>,
    /// Distinct calendar days observed per weekday
    pub days_observed: [u64; 7],
}

/// Average tweets per weekday and hour-of-week.
///
/// Counts are bucketed by calendar day in each tweet's own UTC offset, then
/// averaged over the distinct days seen for that weekday. A weekday that never
/// occurs averages to 0.
pub fn temporal_distribution<'a, I>(tweets: I) -> Result<TemporalDistribution, AnalysisError>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    let mut days: BTreeMap<NaiveDate, [u64; 24]> = BTreeMap::new();
    for tweet in tweets {
        let ts = tweet.timestamp()?;
        days.entry(ts.date_naive()).or_insert([0; 24])[ts.hour() as usize] += 1;
    }

    let mut days_observed = [0u64; 7];
    let mut hour_totals = vec![0u64; HOURS_PER_WEEK];
    for (date, hours) in &days {
        let weekday = date.weekday().num_days_from_monday() as usize;
        days_observed[weekday] += 1;
        for (hour, count) in hours.iter().enumerate() {
            hour_totals[weekday * 24 + hour] += count;
        }
    }

    let average = |total: u64, weekday: usize| match days_observed[weekday] {
        0 => 0.0,
        n => total as f64 / n as f64,
    };

    let hour_of_week_average =
        hour_totals.iter().enumerate().map(|(slot, &total)| average(total, slot / 24)).collect();
    let mut weekday_average = [0.0; 7];
    for (weekday, avg) in weekday_average.iter_mut().enumerate() {
        let total: u64 = hour_totals[weekday * 24..(weekday + 1) * 24].iter().sum();
        *avg = average(total, weekday);
    }

    Ok(TemporalDistribution { weekday_average, hour_of_week_average, days_observed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: &str) -> Tweet {
        let mut t = Tweet::new("x");
        t.created_at = Some(ts.to_string());
        t
    }

    #[test]
    fn test_averages_over_distinct_days() {
        let tweets = vec![
            // Monday 2021-05-03: three tweets
            at("2021-05-03T08:10:00Z"),
            at("2021-05-03T08:50:00Z"),
            at("2021-05-03T20:00:00Z"),
            // Monday 2021-05-10: one tweet
            at("2021-05-10T08:00:00Z"),
            // Wednesday 2021-05-05: two tweets
            at("2021-05-05T00:30:00+00:00"),
            at("2021-05-05T23:59:59Z"),
        ];
        let dist = temporal_distribution(&tweets).unwrap();
        assert_eq!(dist.days_observed, [2, 0, 1, 0, 0, 0, 0]);
        assert_eq!(dist.weekday_average, [2.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(dist.hour_of_week_average.len(), HOURS_PER_WEEK);
        assert_eq!(dist.hour_of_week_average[8], 1.5);
        assert_eq!(dist.hour_of_week_average[20], 0.5);
        assert_eq!(dist.hour_of_week_average[2 * 24], 1.0);
        assert_eq!(dist.hour_of_week_average[2 * 24 + 23], 1.0);
        assert_eq!(dist.hour_of_week_average.iter().sum::<f64>(), 4.0);
    }

    #[test]
    fn test_local_offset_decides_the_day() {
        // 23:30 UTC on Sunday is already Monday in UTC+02:00
        let dist = temporal_distribution(&vec![at("2021-05-10T01:30:00+02:00")]).unwrap();
        assert_eq!(dist.days_observed[0], 1);
        assert_eq!(dist.hour_of_week_average[1], 1.0);
    }

    #[test]
    fn test_empty_input() {
        let dist = temporal_distribution(std::iter::empty()).unwrap();
        assert_eq!(dist.weekday_average, [0.0; 7]);
        assert!(dist.hour_of_week_average.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_missing_timestamp() {
        assert!(temporal_distribution(&vec![Tweet::new("x")]).is_err());
    }
}
