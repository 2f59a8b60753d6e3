pub mod credits;
pub mod daily;
pub mod ids;
pub mod message;
pub mod usage;

pub use credits::Credits;
pub use daily::DailyCredits;
pub use ids::{MessageId, ReportId};
pub use message::{Message, MessagesResponse, Report};
pub use usage::{UsageRecord, UsageReport};
