// Module declarations
pub mod calculator;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod resolver;
pub mod scoring;
pub mod sorting;
pub mod sources;
pub mod types;

// Re-export commonly used items
pub use calculator::UsageCalculator;
pub use config::Config;
pub use error::{Result, UsageError};
pub use resolver::ReportResolver;
pub use scoring::{CostScorer, ScoreBreakdown, ScoringConfig};
pub use sorting::{SortSpec, sort_usage};
pub use sources::{MessageSource, ReportLookup};
pub use types::{
    Credits, DailyCredits, Message, MessageId, Report, ReportId, UsageRecord, UsageReport,
};
