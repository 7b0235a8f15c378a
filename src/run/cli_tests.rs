#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::error::EntryError;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ── positionals / flags ───────────────────────────────────────

#[test]
fn test_positionals_skip_flag_values() {
    let a = args(&["expense", "12", "3", "--comment", "meh", "Late", "pizza"]);
    assert_eq!(positionals(&a), vec!["expense", "12", "3", "Late", "pizza"]);
}

#[test]
fn test_flag_value_missing_value() {
    let a = args(&["--comment"]);
    assert_eq!(flag_value(&a, "--comment"), None);
}

// ── add ───────────────────────────────────────────────────────

#[test]
fn test_parse_add_full() {
    let a = args(&[
        "expense", "$1,250.50", "7", "New", "bike", "--date", "2024-03-02", "--comment", "worth it",
    ]);
    let entry = parse_add(&a).unwrap();
    assert_eq!(entry.transaction.direction, Direction::Expense);
    assert_eq!(entry.transaction.amount, dec!(1250.50));
    assert_eq!(entry.transaction.description, "New bike");
    assert_eq!(entry.transaction.occurred_at, "2024-03-02T00:00:00+00:00");
    assert_eq!(entry.level, 7);
    assert_eq!(entry.comment, "worth it");
}

#[test]
fn test_parse_add_requires_description() {
    assert!(parse_add(&args(&["income", "100", "5"])).is_err());
}

#[test]
fn test_parse_add_rejects_bad_level() {
    let err = parse_add(&args(&["expense", "10", "11", "Snack"])).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntryError>(),
        Some(&EntryError::LevelOutOfRange(11))
    );
}

#[test]
fn test_parse_add_rejects_unknown_type() {
    let err = parse_add(&args(&["gift", "10", "5", "Socks"])).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntryError>(),
        Some(&EntryError::UnknownDirection("gift".into()))
    );
}

#[test]
fn test_parse_add_rejects_zero_amount() {
    let err = parse_add(&args(&["expense", "0", "5", "Nothing"])).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntryError>(),
        Some(&EntryError::NonPositiveAmount(dec!(0)))
    );
}

// ── edit ──────────────────────────────────────────────────────

#[test]
fn test_parse_edit_fields() {
    let a = args(&["4", "--amount", "20", "--type", "income", "--level", "9"]);
    let (id, edit) = parse_edit(&a).unwrap();
    assert_eq!(id, 4);
    assert_eq!(
        edit,
        EntryEdit {
            amount: Some(dec!(20)),
            direction: Some(Direction::Income),
            level: Some(9),
            ..Default::default()
        }
    );
}

#[test]
fn test_parse_edit_nothing_to_update() {
    let err = parse_edit(&args(&["4"])).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntryError>(),
        Some(&EntryError::NothingToUpdate)
    );
}

#[test]
fn test_parse_edit_requires_id() {
    assert!(parse_edit(&args(&["--amount", "20"])).is_err());
    assert!(parse_edit(&args(&["abc", "--amount", "20"])).is_err());
}

// ── shellexpand ───────────────────────────────────────────────

#[test]
fn test_shellexpand_plain_path() {
    assert_eq!(shellexpand("/tmp/out.csv"), "/tmp/out.csv");
}

#[test]
fn test_shellexpand_home() {
    let expanded = shellexpand("~/out.csv");
    assert!(expanded.ends_with("/out.csv"));
    assert!(!expanded.starts_with('~'));
}

// ── goal amounts ──────────────────────────────────────────────

fn test_config() -> Config {
    Config::from_lookup(std::path::PathBuf::from("/tmp/worthit"), |_| None).unwrap()
}

#[test]
fn test_project_rejects_negative_goal() {
    let err = parse_project(&args(&["-5", "100"])).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntryError>(),
        Some(&EntryError::NegativeGoal(dec!(-5)))
    );
}

#[test]
fn test_project_accepts_zero_goal() {
    let (goal, saving) = parse_project(&args(&["0", "100", "--threshold", "6"])).unwrap();
    assert_eq!(goal, dec!(0));
    assert_eq!(saving, dec!(100));
}

#[test]
fn test_project_requires_goal_and_saving() {
    assert!(parse_project(&args(&["1200"])).is_err());
}

#[test]
fn test_insights_goal_flag_rejects_negative() {
    let err = simulation_args(&args(&["--goal", "-1200"]), &test_config()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EntryError>(),
        Some(&EntryError::NegativeGoal(dec!(-1200)))
    );
}

#[test]
fn test_insights_goal_flags_default_to_config() {
    let config = test_config();
    let (goal, saving) = simulation_args(&args(&[]), &config).unwrap();
    assert_eq!(goal, config.goal_amount);
    assert_eq!(saving, config.monthly_saving);

    let (goal, saving) = simulation_args(&args(&["--goal", "$2,400", "--saving", "50"]), &config)
        .unwrap();
    assert_eq!(goal, dec!(2400));
    assert_eq!(saving, dec!(50));
}
