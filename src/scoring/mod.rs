//! Text scoring used when a message has no report to take its cost from.
//!
//! Every sub-score is computed in [`Credits`], so increments such as 0.05
//! and 0.3 accumulate without rounding drift. Character positions and
//! lengths count Unicode scalar values of the raw text.

use crate::constants::{
    CHARACTER_COST, DEFAULT_BASE_COST, DEFAULT_VOWELS, LENGTH_PENALTY, LENGTH_PENALTY_THRESHOLD,
    LONG_WORD_COST, MEDIUM_WORD_COST, MEDIUM_WORD_MAX_LEN, SHORT_WORD_COST, SHORT_WORD_MAX_LEN,
    THIRD_VOWEL_COST, UNIQUE_WORD_BONUS,
};
use crate::types::Credits;
use std::collections::HashSet;

/// Parameters of the scoring formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Added to every score and used as its floor
    pub base_cost: Credits,
    /// Lowercase vowels matched case-insensitively
    pub vowels: Vec<char>,
}

impl ScoringConfig {
    pub fn new(base_cost: Credits, vowels: &str) -> Self {
        let mut vowels: Vec<char> = vowels.chars().flat_map(char::to_lowercase).collect();
        vowels.sort_unstable();
        vowels.dedup();
        Self { base_cost, vowels }
    }

    #[inline]
    pub fn is_vowel(&self, c: char) -> bool {
        c.to_lowercase().all(|l| self.vowels.binary_search(&l).is_ok())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_COST, DEFAULT_VOWELS)
    }
}

/// Individual terms of a score, kept for inspection and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub base_cost: Credits,
    pub character_cost: Credits,
    pub word_length_cost: Credits,
    pub third_vowel_cost: Credits,
    pub length_penalty: Credits,
    pub unique_word_bonus: Credits,
    pub palindrome: bool,
}

impl ScoreBreakdown {
    /// Sum of all terms before the floor is applied
    pub fn subtotal(&self) -> Credits {
        self.base_cost
            + self.character_cost
            + self.word_length_cost
            + self.third_vowel_cost
            + self.length_penalty
            - self.unique_word_bonus
    }

    /// Subtotal clamped to the base cost
    pub fn floored(&self) -> Credits {
        self.subtotal().max(self.base_cost)
    }

    pub fn total(&self) -> Credits {
        if self.palindrome {
            self.floored() * 2
        } else {
            self.floored()
        }
    }
}

/// Scores message text; pure and deterministic
#[derive(Debug, Clone, Default)]
pub struct CostScorer {
    config: ScoringConfig,
}

impl CostScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Cost of a message that has no report
    pub fn score(&self, text: &str) -> Credits {
        self.breakdown(text).total()
    }

    pub fn breakdown(&self, text: &str) -> ScoreBreakdown {
        let words = extract_words(text);
        ScoreBreakdown {
            base_cost: self.config.base_cost,
            character_cost: character_count_cost(text),
            word_length_cost: word_length_cost(&words),
            third_vowel_cost: third_vowel_cost(text, &self.config),
            length_penalty: length_penalty(text),
            unique_word_bonus: unique_word_bonus(&words),
            palindrome: is_palindrome(text),
        }
    }
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '\'' || c == '-'
}

/// Maximal runs of ASCII letters, apostrophes and hyphens, in order
pub fn extract_words(text: &str) -> Vec<&str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|word| !word.is_empty())
        .collect()
}

pub fn word_length_cost(words: &[&str]) -> Credits {
    words
        .iter()
        // words are ASCII, so byte length is character length
        .map(|word| match word.len() {
            len if len <= SHORT_WORD_MAX_LEN => SHORT_WORD_COST,
            len if len <= MEDIUM_WORD_MAX_LEN => MEDIUM_WORD_COST,
            _ => LONG_WORD_COST,
        })
        .sum()
}

pub fn character_count_cost(text: &str) -> Credits {
    CHARACTER_COST * text.chars().count() as i64
}

/// 0.3 for each vowel at positions 2, 5, 8, ... of the raw text
pub fn third_vowel_cost(text: &str, config: &ScoringConfig) -> Credits {
    let hits = text
        .chars()
        .skip(2)
        .step_by(3)
        .filter(|&c| config.is_vowel(c))
        .count();
    THIRD_VOWEL_COST * hits as i64
}

pub fn length_penalty(text: &str) -> Credits {
    if text.chars().count() > LENGTH_PENALTY_THRESHOLD {
        LENGTH_PENALTY
    } else {
        Credits::ZERO
    }
}

/// Bonus when every extracted word is distinct; comparison is case-sensitive
pub fn unique_word_bonus(words: &[&str]) -> Credits {
    if words.is_empty() {
        return Credits::ZERO;
    }
    let mut seen = HashSet::with_capacity(words.len());
    if words.iter().all(|word| seen.insert(*word)) {
        UNIQUE_WORD_BONUS
    } else {
        Credits::ZERO
    }
}

/// Palindrome over lowercased ASCII alphanumerics; empty input is not one
pub fn is_palindrome(text: &str) -> bool {
    let normalized: Vec<u8> = text
        .bytes()
        .filter(u8::is_ascii_alphanumeric)
        .map(|b| b.to_ascii_lowercase())
        .collect();
    !normalized.is_empty() && normalized.iter().eq(normalized.iter().rev())
}
