use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections raised while validating user input or resolving the record it
/// refers to. Storage failures are not represented here; they travel as
/// `rusqlite` errors wrapped in `anyhow` context.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum EntryError {
    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount cannot exceed 1,000,000,000,000,000, got {0}")]
    AmountTooLarge(Decimal),

    #[error("satisfaction level must be between 1 and 10, got {0}")]
    LevelOutOfRange(i64),

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("unknown entry type '{0}', expected income or expense")]
    UnknownDirection(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("goal name cannot be empty")]
    EmptyGoalName,

    #[error("goal target must be greater than zero, got {0}")]
    NonPositiveTarget(Decimal),

    #[error("amount cannot be negative, got {0}")]
    NegativeContribution(Decimal),

    #[error("goal amount cannot be negative, got {0}")]
    NegativeGoal(Decimal),

    #[error("nothing to update")]
    NothingToUpdate,

    /// A comment was edited on an entry that has no rating to attach it to.
    #[error("entry {0} has no satisfaction rating; set a level first")]
    Unrated(i64),

    #[error("no entry with id {0}")]
    TransactionNotFound(i64),

    #[error("no savings goal with id {0}")]
    GoalNotFound(i64),
}

impl EntryError {
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::TransactionNotFound(_) | Self::GoalNotFound(_))
    }
}
