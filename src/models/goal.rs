use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::EntryError;

use super::entry::check_max;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SavingsGoal {
    pub(crate) id: Option<i64>,
    pub(crate) name: String,
    pub(crate) target_amount: Decimal,
    pub(crate) current_amount: Decimal,
    pub(crate) created_at: String,
}

impl SavingsGoal {
    /// What is still missing to reach the target, never negative.
    pub(crate) fn remaining(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    pub(crate) fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Fraction of the target saved so far, clamped to `[0, 1]`.
    pub(crate) fn progress_ratio(&self) -> f64 {
        if self.target_amount <= Decimal::ZERO {
            return 0.0;
        }
        (self.current_amount / self.target_amount)
            .to_f64()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }
}

/// Validated input for a new savings goal.
#[derive(Debug, Clone)]
pub(crate) struct NewGoal {
    pub(crate) name: String,
    pub(crate) target_amount: Decimal,
    pub(crate) current_amount: Decimal,
}

impl NewGoal {
    pub(crate) fn new(
        name: &str,
        target_amount: Decimal,
        current_amount: Decimal,
    ) -> Result<Self, EntryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EntryError::EmptyGoalName);
        }
        if target_amount <= Decimal::ZERO {
            return Err(EntryError::NonPositiveTarget(target_amount));
        }
        if current_amount < Decimal::ZERO {
            return Err(EntryError::NegativeContribution(current_amount));
        }
        check_max(target_amount)?;
        check_max(current_amount)?;
        Ok(Self {
            name: name.to_string(),
            target_amount,
            current_amount,
        })
    }

    pub(crate) fn into_goal(self) -> SavingsGoal {
        SavingsGoal {
            id: None,
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
