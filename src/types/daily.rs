use super::credits::Credits;
use super::usage::UsageRecord;
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

/// Credits consumed per calendar day, ordered by date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyCredits(BTreeMap<NaiveDate, Credits>);

impl DailyCredits {
    /// Sum credits per day. The date is taken in the timestamp's own offset,
    /// so "2024-04-29T23:30:00-05:00" counts towards 2024-04-29.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a UsageRecord>,
    {
        let mut days = BTreeMap::new();
        for record in records {
            match DateTime::parse_from_rfc3339(&record.timestamp) {
                Ok(ts) => {
                    let total = days.entry(ts.date_naive()).or_insert(Credits::ZERO);
                    *total = total.saturating_add(record.credits_used);
                }
                Err(e) => {
                    warn!(
                        message_id = %record.message_id,
                        timestamp = %record.timestamp,
                        error = %e,
                        "skipping record with unparseable timestamp"
                    );
                }
            }
        }
        Self(days)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Credits)> {
        self.0.iter()
    }

    pub fn get(&self, date: NaiveDate) -> Option<Credits> {
        self.0.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> Credits {
        self.0.values().sum()
    }
}
