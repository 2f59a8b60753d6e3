use crate::error::{Result, UsageError};
use crate::types::UsageRecord;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    ReportName,
    CreditsUsed,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::ReportName => "reportName",
            SortColumn::CreditsUsed => "creditsUsed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Ordered sort keys, e.g. `reportName:asc,creditsUsed:desc`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec(Vec<(SortColumn, SortOrder)>);

impl SortSpec {
    pub fn new(keys: Vec<(SortColumn, SortOrder)>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[(SortColumn, SortOrder)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for SortSpec {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| UsageError::Config {
            var: "sort".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let mut keys: Vec<(SortColumn, SortOrder)> = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (column, order) = part
                .split_once(':')
                .ok_or_else(|| invalid("expected column:direction"))?;
            let column = match column.trim() {
                "reportName" => SortColumn::ReportName,
                "creditsUsed" => SortColumn::CreditsUsed,
                _ => return Err(invalid("unknown column")),
            };
            let order = match order.trim() {
                "asc" => SortOrder::Asc,
                "desc" => SortOrder::Desc,
                _ => return Err(invalid("direction must be asc or desc")),
            };
            // a later key for the same column replaces the earlier one in place
            match keys.iter_mut().find(|(c, _)| *c == column) {
                Some(existing) => existing.1 = order,
                None => keys.push((column, order)),
            }
        }
        Ok(Self(keys))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(c, o)| format!("{}:{}", c.as_str(), o.as_str()))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

// Absent values sort after present ones whatever the direction
fn compare_optional<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
    }
}

fn compare_records(a: &UsageRecord, b: &UsageRecord, spec: &SortSpec) -> Ordering {
    for &(column, order) in spec.keys() {
        let ordering = match column {
            SortColumn::ReportName => {
                compare_optional(a.report_name.as_deref(), b.report_name.as_deref(), order)
            }
            SortColumn::CreditsUsed => {
                compare_optional(Some(a.credits_used), Some(b.credits_used), order)
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Stable multi-key sort; ties keep their input order
pub fn sort_usage(records: &mut [UsageRecord], spec: &SortSpec) {
    if spec.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare_records(a, b, spec));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Credits, MessageId};

    fn record(id: i64, report_name: Option<&str>, credits: Credits) -> UsageRecord {
        UsageRecord {
            message_id: MessageId::new(id),
            timestamp: "2024-04-29T02:08:29Z".to_string(),
            report_name: report_name.map(str::to_string),
            credits_used: credits,
        }
    }

    fn ids(records: &[UsageRecord]) -> Vec<i64> {
        records.iter().map(|r| r.message_id.get()).collect()
    }

    fn sample() -> Vec<UsageRecord> {
        vec![
            record(1, None, Credits::tenths(15)),
            record(2, Some("Beta"), Credits::whole(20)),
            record(3, Some("Alpha"), Credits::whole(20)),
            record(4, None, Credits::whole(1)),
            record(5, Some("Alpha"), Credits::whole(5)),
        ]
    }

    #[test]
    fn test_parse_sort_spec() {
        let spec: SortSpec = "reportName:asc,creditsUsed:desc".parse().unwrap();
        assert_eq!(
            spec.keys(),
            &[
                (SortColumn::ReportName, SortOrder::Asc),
                (SortColumn::CreditsUsed, SortOrder::Desc)
            ]
        );
        assert_eq!(spec.to_string(), "reportName:asc,creditsUsed:desc");

        assert!("".parse::<SortSpec>().unwrap().is_empty());
        assert!("timestamp:asc".parse::<SortSpec>().is_err());
        assert!("reportName:up".parse::<SortSpec>().is_err());
        assert!("reportName".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_repeated_column_keeps_position() {
        let spec: SortSpec = "creditsUsed:asc,reportName:asc,creditsUsed:desc".parse().unwrap();
        assert_eq!(spec.to_string(), "creditsUsed:desc,reportName:asc");
    }

    #[test]
    fn test_sort_by_report_name_absent_last() {
        let mut records = sample();
        sort_usage(&mut records, &"reportName:asc".parse().unwrap());
        assert_eq!(ids(&records), vec![3, 5, 2, 1, 4]);

        let mut records = sample();
        sort_usage(&mut records, &"reportName:desc".parse().unwrap());
        assert_eq!(ids(&records), vec![2, 3, 5, 1, 4]);
    }

    #[test]
    fn test_sort_by_credits() {
        let mut records = sample();
        sort_usage(&mut records, &"creditsUsed:desc".parse().unwrap());
        assert_eq!(ids(&records), vec![2, 3, 5, 1, 4]);

        let mut records = sample();
        sort_usage(&mut records, &"creditsUsed:asc".parse().unwrap());
        assert_eq!(ids(&records), vec![4, 1, 5, 2, 3]);
    }

    #[test]
    fn test_multi_key_sort() {
        let mut records = sample();
        sort_usage(
            &mut records,
            &"reportName:asc,creditsUsed:asc".parse().unwrap(),
        );
        assert_eq!(ids(&records), vec![5, 3, 2, 4, 1]);
    }

    #[test]
    fn test_empty_spec_keeps_order() {
        let mut records = sample();
        sort_usage(&mut records, &SortSpec::default());
        assert_eq!(ids(&records), vec![1, 2, 3, 4, 5]);
    }
}
