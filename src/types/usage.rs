use super::credits::Credits;
use super::ids::MessageId;
use serde::Serialize;

/// Cost attributed to a single message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub message_id: MessageId,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,
    pub credits_used: Credits,
}

impl UsageRecord {
    /// Whether the cost came from a report rather than text scoring
    #[inline]
    pub fn is_report(&self) -> bool {
        self.report_name.is_some()
    }
}

// Body shape served to dashboard clients
#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub usage: Vec<UsageRecord>,
}

impl UsageReport {
    pub fn new(usage: Vec<UsageRecord>) -> Self {
        Self { usage }
    }

    /// Sum of credits across all records
    pub fn total_credits(&self) -> Credits {
        self.usage.iter().map(|r| r.credits_used).sum()
    }
}
