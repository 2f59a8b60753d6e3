use super::credits::Credits;
use super::ids::{MessageId, ReportId};
use serde::Deserialize;

// Message as listed by the message store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub timestamp: String,
    #[serde(default)]
    pub report_id: Option<ReportId>,
}

// Envelope returned by the message listing
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// A pre-priced report; its cost overrides text scoring when present
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub name: String,
    pub credit_cost: Credits,
}
