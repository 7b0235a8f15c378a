use crate::error::EntryError;

use super::Transaction;

pub(crate) const MIN_LEVEL: u8 = 1;
pub(crate) const MAX_LEVEL: u8 = 10;

/// A satisfaction score already checked against `[MIN_LEVEL, MAX_LEVEL]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct SatisfactionLevel(u8);

impl SatisfactionLevel {
    pub(crate) fn new(level: i64) -> Result<Self, EntryError> {
        if (i64::from(MIN_LEVEL)..=i64::from(MAX_LEVEL)).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(EntryError::LevelOutOfRange(level))
        }
    }

    pub(crate) fn parse(s: &str) -> Result<Self, EntryError> {
        let level = s
            .trim()
            .parse::<i64>()
            .map_err(|_| EntryError::InvalidNumber(s.trim().to_string()))?;
        Self::new(level)
    }

    pub(crate) fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SatisfactionRating {
    pub(crate) id: Option<i64>,
    pub(crate) transaction_id: i64,
    pub(crate) level: u8,
    pub(crate) comment: String,
}

/// A transaction joined with its rating. Unrated transactions never appear
/// in this form.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RatedTransaction {
    pub(crate) transaction: Transaction,
    pub(crate) rating: SatisfactionRating,
}

impl RatedTransaction {
    pub(crate) fn level(&self) -> u8 {
        self.rating.level
    }
}
