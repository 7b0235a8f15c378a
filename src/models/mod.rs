mod entry;
mod goal;
mod rating;
mod transaction;

pub(crate) use entry::{
    parse_amount, parse_goal_amount, parse_occurred_at, validate_amount, EntryEdit, NewEntry,
    MAX_AMOUNT,
};
pub(crate) use goal::{NewGoal, SavingsGoal};
pub(crate) use rating::{RatedTransaction, SatisfactionLevel, SatisfactionRating, MAX_LEVEL, MIN_LEVEL};
pub(crate) use transaction::{Direction, Transaction};

#[cfg(test)]
mod tests;
