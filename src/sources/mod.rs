pub mod http;

use crate::error::Result;
use crate::types::{Message, Report, ReportId};
use async_trait::async_trait;

pub use http::{HttpMessageSource, HttpReportLookup, build_client};

/// Ordered listing of the messages to price
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn list(&self) -> Result<Vec<Message>>;
}

/// Report lookup by id; `Ok(None)` means the report does not exist
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportLookup: Send + Sync {
    async fn get(&self, report_id: ReportId) -> Result<Option<Report>>;
}
