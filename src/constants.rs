use crate::types::Credits;
use std::time::Duration;

/// Message listing used when no override is configured
pub const DEFAULT_MESSAGES_URL: &str =
    "https://owpublic.blob.core.windows.net/tech-task/messages/current-period";

/// Report lookups append the report id as a final path segment
pub const DEFAULT_REPORTS_URL: &str = "https://owpublic.blob.core.windows.net/tech-task/reports";

pub const DEFAULT_BASE_COST: Credits = Credits::whole(1);

pub const DEFAULT_VOWELS: &str = "aeiou";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Scoring weights
pub const SHORT_WORD_COST: Credits = Credits::tenths(1);
pub const MEDIUM_WORD_COST: Credits = Credits::tenths(2);
pub const LONG_WORD_COST: Credits = Credits::tenths(3);
pub const SHORT_WORD_MAX_LEN: usize = 3;
pub const MEDIUM_WORD_MAX_LEN: usize = 7;

pub const CHARACTER_COST: Credits = Credits::hundredths(5);
pub const THIRD_VOWEL_COST: Credits = Credits::tenths(3);

pub const LENGTH_PENALTY: Credits = Credits::whole(5);
pub const LENGTH_PENALTY_THRESHOLD: usize = 100;

pub const UNIQUE_WORD_BONUS: Credits = Credits::whole(2);
