use rust_decimal::Decimal;

use crate::error::EntryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Income,
    Expense,
}

impl Direction {
    /// Storage form, also used in exports.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    pub(crate) fn parse(s: &str) -> Result<Self, EntryError> {
        match s.trim().to_lowercase().as_str() {
            "income" | "inc" | "in" | "+" => Ok(Self::Income),
            "expense" | "exp" | "out" | "-" => Ok(Self::Expense),
            _ => Err(EntryError::UnknownDirection(s.trim().to_string())),
        }
    }

    pub(crate) fn all() -> &'static [Direction] {
        &[Self::Income, Self::Expense]
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub(crate) id: Option<i64>,
    pub(crate) direction: Direction,
    pub(crate) description: String,
    /// Always positive; `direction` carries the sign.
    pub(crate) amount: Decimal,
    /// RFC 3339 timestamp.
    pub(crate) occurred_at: String,
}

impl Transaction {
    pub(crate) fn new(direction: Direction, description: String, amount: Decimal) -> Self {
        Self {
            id: None,
            direction,
            description,
            amount,
            occurred_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub(crate) fn is_income(&self) -> bool {
        self.direction == Direction::Income
    }

    pub(crate) fn is_expense(&self) -> bool {
        self.direction == Direction::Expense
    }

    /// Amount with the sign implied by the direction.
    pub(crate) fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Income => self.amount,
            Direction::Expense => -self.amount,
        }
    }

    /// The `YYYY-MM-DD` part of `occurred_at`.
    pub(crate) fn date(&self) -> &str {
        self.occurred_at.get(..10).unwrap_or(&self.occurred_at)
    }
}
