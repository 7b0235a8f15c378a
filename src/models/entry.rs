use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::EntryError;

use super::{Direction, SatisfactionLevel, Transaction};

/// Largest amount any entry, goal target or goal balance may hold: one
/// quadrillion (`10^15`). Keeps every sum the insight engine takes far from
/// `Decimal::MAX`.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// A transaction and its rating, validated together before they are stored
/// as one unit.
#[derive(Debug, Clone)]
pub(crate) struct NewEntry {
    pub(crate) transaction: Transaction,
    pub(crate) level: u8,
    pub(crate) comment: String,
}

impl NewEntry {
    pub(crate) fn new(
        direction: Direction,
        description: &str,
        amount: Decimal,
        level: i64,
        comment: &str,
        occurred_at: Option<&str>,
    ) -> Result<Self, EntryError> {
        let description = validate_description(description)?;
        validate_amount(amount)?;
        let level = SatisfactionLevel::new(level)?;

        let mut transaction = Transaction::new(direction, description, amount);
        if let Some(raw) = occurred_at {
            transaction.occurred_at = parse_occurred_at(raw)?;
        }

        Ok(Self {
            transaction,
            level: level.get(),
            comment: comment.trim().to_string(),
        })
    }
}

/// Field overwrites for an existing entry. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EntryEdit {
    pub(crate) description: Option<String>,
    pub(crate) amount: Option<Decimal>,
    pub(crate) direction: Option<Direction>,
    pub(crate) level: Option<i64>,
    pub(crate) comment: Option<String>,
}

impl EntryEdit {
    pub(crate) fn validate(&self) -> Result<(), EntryError> {
        if self.is_empty() {
            return Err(EntryError::NothingToUpdate);
        }
        if let Some(desc) = &self.description {
            validate_description(desc)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(level) = self.level {
            SatisfactionLevel::new(level)?;
        }
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        !self.touches_transaction() && !self.touches_rating()
    }

    pub(crate) fn touches_transaction(&self) -> bool {
        self.description.is_some() || self.amount.is_some() || self.direction.is_some()
    }

    pub(crate) fn touches_rating(&self) -> bool {
        self.level.is_some() || self.comment.is_some()
    }
}

fn validate_description(description: &str) -> Result<String, EntryError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(EntryError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_amount(amount: Decimal) -> Result<(), EntryError> {
    if amount <= Decimal::ZERO {
        return Err(EntryError::NonPositiveAmount(amount));
    }
    check_max(amount)
}

pub(crate) fn check_max(amount: Decimal) -> Result<(), EntryError> {
    if amount > MAX_AMOUNT {
        return Err(EntryError::AmountTooLarge(amount));
    }
    Ok(())
}

/// Parse a user-typed amount. Accepts a `$` on either side of a leading
/// minus sign and thousands separators.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal, EntryError> {
    let raw = s.trim();
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, raw),
    };
    let digits: String = unsigned
        .strip_prefix('$')
        .unwrap_or(unsigned)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let cleaned = if negative { format!("-{digits}") } else { digits };
    Decimal::from_str(&cleaned).map_err(|_| EntryError::InvalidNumber(raw.to_string()))
}

/// Parse the goal amount for a projection. Zero is allowed and yields the
/// zero sentinel; negative goals are rejected.
pub(crate) fn parse_goal_amount(s: &str) -> Result<Decimal, EntryError> {
    let amount = parse_amount(s)?;
    if amount < Decimal::ZERO {
        return Err(EntryError::NegativeGoal(amount));
    }
    check_max(amount)?;
    Ok(amount)
}

/// Normalize a `YYYY-MM-DD` date or RFC 3339 timestamp to an RFC 3339 UTC
/// timestamp. Bare dates land on midnight UTC.
pub(crate) fn parse_occurred_at(s: &str) -> Result<String, EntryError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).to_rfc3339());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().to_rfc3339())
        .ok_or_else(|| EntryError::InvalidDate(s.to_string()))
}
