use serde::{Deserialize, Serialize};
use std::fmt;

/// NewType wrapper for Message ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    /// Create a new MessageId
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// NewType wrapper for Report ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ReportId(i64);

impl ReportId {
    /// Create a new ReportId
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ReportId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
