#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::EntryError;

// ── Direction ─────────────────────────────────────────────────

#[test]
fn test_direction_parse() {
    assert_eq!(Direction::parse("income").unwrap(), Direction::Income);
    assert_eq!(Direction::parse("INCOME").unwrap(), Direction::Income);
    assert_eq!(Direction::parse("in").unwrap(), Direction::Income);
    assert_eq!(Direction::parse("+").unwrap(), Direction::Income);
    assert_eq!(Direction::parse("expense").unwrap(), Direction::Expense);
    assert_eq!(Direction::parse(" Expense ").unwrap(), Direction::Expense);
    assert_eq!(Direction::parse("out").unwrap(), Direction::Expense);
    assert_eq!(Direction::parse("-").unwrap(), Direction::Expense);
}

#[test]
fn test_direction_parse_unknown() {
    assert_eq!(
        Direction::parse("transfer"),
        Err(EntryError::UnknownDirection("transfer".into()))
    );
}

#[test]
fn test_direction_roundtrip() {
    for d in Direction::all() {
        assert_eq!(Direction::parse(d.as_str()).unwrap(), *d);
        assert_eq!(Direction::parse(d.label()).unwrap(), *d);
    }
}

#[test]
fn test_direction_display() {
    assert_eq!(format!("{}", Direction::Income), "Income");
    assert_eq!(format!("{}", Direction::Expense), "Expense");
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_transaction_signed_amount() {
    let income = Transaction::new(Direction::Income, "Salary".into(), dec!(1500));
    let expense = Transaction::new(Direction::Expense, "Rent".into(), dec!(700));
    assert!(income.is_income());
    assert!(!income.is_expense());
    assert!(expense.is_expense());
    assert_eq!(income.signed_amount(), dec!(1500));
    assert_eq!(expense.signed_amount(), dec!(-700));
}

#[test]
fn test_transaction_new_defaults() {
    let txn = Transaction::new(Direction::Expense, "Coffee".into(), dec!(3.5));
    assert!(txn.id.is_none());
    assert!(!txn.occurred_at.is_empty());
    assert_eq!(txn.date().len(), 10);
}

// ── SatisfactionLevel ─────────────────────────────────────────

#[test]
fn test_level_bounds() {
    assert_eq!(SatisfactionLevel::new(1).unwrap().get(), MIN_LEVEL);
    assert_eq!(SatisfactionLevel::new(10).unwrap().get(), MAX_LEVEL);
    assert_eq!(
        SatisfactionLevel::new(0),
        Err(EntryError::LevelOutOfRange(0))
    );
    assert_eq!(
        SatisfactionLevel::new(11),
        Err(EntryError::LevelOutOfRange(11))
    );
}

#[test]
fn test_level_parse() {
    assert_eq!(SatisfactionLevel::parse(" 7 ").unwrap().get(), 7);
    assert_eq!(
        SatisfactionLevel::parse("seven"),
        Err(EntryError::InvalidNumber("seven".into()))
    );
}

// ── NewEntry ──────────────────────────────────────────────────

#[test]
fn test_new_entry_valid() {
    let entry = NewEntry::new(
        Direction::Expense,
        "  Forgotten subscription ",
        dec!(19.99),
        2,
        " never use it ",
        None,
    )
    .unwrap();
    assert_eq!(entry.transaction.description, "Forgotten subscription");
    assert_eq!(entry.transaction.amount, dec!(19.99));
    assert_eq!(entry.level, 2);
    assert_eq!(entry.comment, "never use it");
}

#[test]
fn test_new_entry_rejects_empty_description() {
    let err = NewEntry::new(Direction::Expense, "   ", dec!(5), 5, "", None).unwrap_err();
    assert_eq!(err, EntryError::EmptyDescription);
}

#[test]
fn test_new_entry_rejects_non_positive_amount() {
    let err = NewEntry::new(Direction::Income, "Gift", Decimal::ZERO, 5, "", None).unwrap_err();
    assert_eq!(err, EntryError::NonPositiveAmount(Decimal::ZERO));
    let err = NewEntry::new(Direction::Income, "Gift", dec!(-3), 5, "", None).unwrap_err();
    assert_eq!(err, EntryError::NonPositiveAmount(dec!(-3)));
}

#[test]
fn test_new_entry_rejects_level_out_of_range() {
    let err = NewEntry::new(Direction::Expense, "Lunch", dec!(12), 11, "", None).unwrap_err();
    assert_eq!(err, EntryError::LevelOutOfRange(11));
}

#[test]
fn test_new_entry_with_date() {
    let entry = NewEntry::new(
        Direction::Expense,
        "Lunch",
        dec!(12),
        6,
        "",
        Some("2024-03-05"),
    )
    .unwrap();
    assert_eq!(entry.transaction.occurred_at, "2024-03-05T00:00:00+00:00");
    assert_eq!(entry.transaction.date(), "2024-03-05");
}

#[test]
fn test_new_entry_rejects_bad_date() {
    let err = NewEntry::new(Direction::Expense, "Lunch", dec!(12), 6, "", Some("03/05/2024"))
        .unwrap_err();
    assert_eq!(err, EntryError::InvalidDate("03/05/2024".into()));
}

// ── Parsing helpers ───────────────────────────────────────────

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount("12.50").unwrap(), dec!(12.50));
    assert_eq!(parse_amount("$1,250.00").unwrap(), dec!(1250.00));
    assert_eq!(parse_amount(" 3 ").unwrap(), dec!(3));
    assert_eq!(
        parse_amount("abc"),
        Err(EntryError::InvalidNumber("abc".into()))
    );
}

#[test]
fn test_parse_amount_negative_with_dollar_sign() {
    assert_eq!(parse_amount("-$5").unwrap(), dec!(-5));
    assert_eq!(parse_amount("$-5").unwrap(), dec!(-5));
    assert_eq!(parse_amount("-$1,250.50").unwrap(), dec!(-1250.50));
    assert_eq!(
        parse_amount("--5"),
        Err(EntryError::InvalidNumber("--5".into()))
    );
}

#[test]
fn test_parse_goal_amount() {
    assert_eq!(parse_goal_amount("$1,200").unwrap(), dec!(1200));
    assert_eq!(parse_goal_amount("0").unwrap(), Decimal::ZERO);
    assert_eq!(
        parse_goal_amount("-5"),
        Err(EntryError::NegativeGoal(dec!(-5)))
    );
    assert_eq!(
        parse_goal_amount("2000000000000000"),
        Err(EntryError::AmountTooLarge(dec!(2000000000000000)))
    );
}

#[test]
fn test_amount_cap() {
    assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
    assert!(validate_amount(MAX_AMOUNT).is_ok());
    assert_eq!(
        validate_amount(Decimal::MAX),
        Err(EntryError::AmountTooLarge(Decimal::MAX))
    );
    let err = NewEntry::new(Direction::Expense, "Yacht", Decimal::MAX, 1, "", None).unwrap_err();
    assert_eq!(err, EntryError::AmountTooLarge(Decimal::MAX));

    let edit = EntryEdit {
        amount: Some(Decimal::MAX),
        ..Default::default()
    };
    assert_eq!(edit.validate(), Err(EntryError::AmountTooLarge(Decimal::MAX)));
}

#[test]
fn test_parse_occurred_at_rfc3339_normalized_to_utc() {
    let ts = parse_occurred_at("2024-01-15T10:30:00-05:00").unwrap();
    assert_eq!(ts, "2024-01-15T15:30:00+00:00");
}

// ── EntryEdit ─────────────────────────────────────────────────

#[test]
fn test_empty_edit_rejected() {
    assert_eq!(
        EntryEdit::default().validate(),
        Err(EntryError::NothingToUpdate)
    );
}

#[test]
fn test_edit_validates_present_fields_only() {
    let edit = EntryEdit {
        level: Some(9),
        ..Default::default()
    };
    assert!(edit.validate().is_ok());
    assert!(edit.touches_rating());
    assert!(!edit.touches_transaction());

    let bad = EntryEdit {
        amount: Some(dec!(0)),
        ..Default::default()
    };
    assert_eq!(bad.validate(), Err(EntryError::NonPositiveAmount(dec!(0))));

    let bad = EntryEdit {
        description: Some(" ".into()),
        ..Default::default()
    };
    assert_eq!(bad.validate(), Err(EntryError::EmptyDescription));

    let bad = EntryEdit {
        level: Some(0),
        ..Default::default()
    };
    assert_eq!(bad.validate(), Err(EntryError::LevelOutOfRange(0)));
}

// ── SavingsGoal ───────────────────────────────────────────────

#[test]
fn test_new_goal_validation() {
    assert!(NewGoal::new("Laptop", dec!(1200), Decimal::ZERO).is_ok());
    assert_eq!(
        NewGoal::new(" ", dec!(1200), Decimal::ZERO).unwrap_err(),
        EntryError::EmptyGoalName
    );
    assert_eq!(
        NewGoal::new("Laptop", Decimal::ZERO, Decimal::ZERO).unwrap_err(),
        EntryError::NonPositiveTarget(Decimal::ZERO)
    );
    assert_eq!(
        NewGoal::new("Laptop", dec!(1200), dec!(-1)).unwrap_err(),
        EntryError::NegativeContribution(dec!(-1))
    );
    assert_eq!(
        NewGoal::new("Island", Decimal::MAX, Decimal::ZERO).unwrap_err(),
        EntryError::AmountTooLarge(Decimal::MAX)
    );
    assert_eq!(
        NewGoal::new("Laptop", dec!(1200), Decimal::MAX).unwrap_err(),
        EntryError::AmountTooLarge(Decimal::MAX)
    );
}

#[test]
fn test_goal_progress() {
    let mut goal = NewGoal::new("Laptop", dec!(1200), dec!(300))
        .unwrap()
        .into_goal();
    assert_eq!(goal.remaining(), dec!(900));
    assert!((goal.progress_ratio() - 0.25).abs() < 1e-9);
    assert!(!goal.is_reached());

    goal.current_amount = dec!(1500);
    assert_eq!(goal.remaining(), Decimal::ZERO);
    assert!((goal.progress_ratio() - 1.0).abs() < 1e-9);
    assert!(goal.is_reached());
}
