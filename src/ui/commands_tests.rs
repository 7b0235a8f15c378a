#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use std::path::PathBuf;

use super::*;
use crate::config::Config;

fn setup() -> (App, Database) {
    let config = Config::from_lookup(PathBuf::from("/tmp/worthit-test"), |_| None).unwrap();
    let mut db = Database::open_in_memory().unwrap();
    let mut app = App::new(&config);
    app.refresh_all(&mut db).unwrap();
    (app, db)
}

fn record(db: &mut Database, direction: Direction, desc: &str, amount: Decimal, level: i64) -> i64 {
    let entry = NewEntry::new(direction, desc, amount, level, "", None).unwrap();
    db.record_entry(&entry).unwrap()
}

// ── Dispatch ──────────────────────────────────────────────────

#[test]
fn test_unknown_command_suggests_closest() {
    let (mut app, mut db) = setup();
    handle_command("treshold 4", &mut app, &mut db).unwrap();
    assert!(app.status_message.contains("Did you mean :threshold?"));
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("goal", "goals"), 1);
    assert_eq!(levenshtein("same", "same"), 0);
}

#[test]
fn test_help_sections_list_each_command_once() {
    let sections = help_sections();
    assert_eq!(sections.len(), CommandGroup::all().len());
    assert!(sections.iter().all(|(_, rows)| !rows.is_empty()));

    let labels: Vec<&str> = sections
        .iter()
        .flat_map(|(_, rows)| rows.iter().map(|(label, _)| label.as_str()))
        .collect();
    let listed: usize = labels.iter().map(|l| l.split(", ").count()).sum();
    assert_eq!(listed, COMMANDS.len());
    assert!(labels.contains(&":add, :a"));
    assert!(labels.contains(&":quit, :q"));

    let (_, goals) = sections
        .iter()
        .find(|(group, _)| *group == CommandGroup::Goals)
        .unwrap();
    let names: Vec<&str> = goals.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(names, vec![":delete-goal", ":goal", ":save"]);
}

#[test]
fn test_status_summary_tracks_flagged_spending() {
    let (mut app, mut db) = setup();
    app.screen = Screen::Insights;
    assert_eq!(app.status_summary(), "nothing rated below 5");

    handle_command("add expense 40 2 Impulse gadget", &mut app, &mut db).unwrap();
    app.screen = Screen::Insights;
    assert_eq!(app.status_summary(), "1 below 5 | $40.00 recoverable");

    app.screen = Screen::History;
    assert_eq!(app.status_summary(), "entry 1 of 1");
    app.screen = Screen::Dashboard;
    assert_eq!(app.status_summary(), "1 entries | net -$40.00");
}

#[test]
fn test_quit_and_help() {
    let (mut app, mut db) = setup();
    handle_command("help", &mut app, &mut db).unwrap();
    assert!(app.show_help);
    handle_command("q", &mut app, &mut db).unwrap();
    assert!(!app.running);
}

#[test]
fn test_screen_jumps() {
    let (mut app, mut db) = setup();
    handle_command("map", &mut app, &mut db).unwrap();
    assert_eq!(app.screen, Screen::ValueMap);
    handle_command("goals", &mut app, &mut db).unwrap();
    assert_eq!(app.screen, Screen::Goals);
    handle_command("history", &mut app, &mut db).unwrap();
    assert_eq!(app.screen, Screen::History);
}

// ── Entries ───────────────────────────────────────────────────

#[test]
fn test_add_records_entry_and_refreshes() {
    let (mut app, mut db) = setup();
    handle_command("add expense 12.50 3 Late night pizza", &mut app, &mut db).unwrap();

    assert_eq!(app.history.len(), 1);
    let entry = &app.history[0];
    assert_eq!(entry.transaction.description, "Late night pizza");
    assert_eq!(entry.transaction.amount, dec!(12.50));
    assert_eq!(entry.level(), Some(3));
    assert_eq!(app.report.low_satisfaction.count, 1);
    assert!(app.status_message.starts_with("Recorded #"));
}

#[test]
fn test_add_invalid_level_reports_error() {
    let (mut app, mut db) = setup();
    handle_command("add expense 10 42 Mystery", &mut app, &mut db).unwrap();
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_add_usage_when_incomplete() {
    let (mut app, mut db) = setup();
    handle_command("add expense 10", &mut app, &mut db).unwrap();
    assert!(app.status_message.starts_with("Usage:"));
}

#[test]
fn test_edit_commands_without_selection() {
    let (mut app, mut db) = setup();
    handle_command("amount 20", &mut app, &mut db).unwrap();
    assert!(app.status_message.contains("No entry selected"));
}

#[test]
fn test_rate_amount_type_comment_on_selected() {
    let (mut app, mut db) = setup();
    let id = record(&mut db, Direction::Expense, "Gym", dec!(40), 4);
    app.refresh_all(&mut db).unwrap();

    handle_command("rate 9 actually going", &mut app, &mut db).unwrap();
    handle_command("amount 45", &mut app, &mut db).unwrap();
    handle_command("comment three times a week", &mut app, &mut db).unwrap();
    handle_command("type income", &mut app, &mut db).unwrap();

    let txn = db.get_transaction(id).unwrap().unwrap();
    let rating = db.get_rating(id).unwrap().unwrap();
    assert_eq!(txn.amount, dec!(45));
    assert_eq!(txn.direction, Direction::Income);
    assert_eq!(rating.level, 9);
    assert_eq!(rating.comment, "three times a week");
}

#[test]
fn test_rename_without_args_opens_editor() {
    let (mut app, mut db) = setup();
    record(&mut db, Direction::Expense, "Coffee", dec!(4), 6);
    app.refresh_all(&mut db).unwrap();

    handle_command("rename", &mut app, &mut db).unwrap();
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.command_input, "Coffee");

    handle_command("rename Espresso", &mut app, &mut db).unwrap();
    assert_eq!(app.history[0].transaction.description, "Espresso");
}

#[test]
fn test_delete_requires_confirmation() {
    let (mut app, mut db) = setup();
    let id = record(&mut db, Direction::Expense, "Impulse buy", dec!(99), 1);
    app.refresh_all(&mut db).unwrap();

    handle_command("delete", &mut app, &mut db).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(
        app.pending_action,
        Some(PendingAction::DeleteEntry {
            id,
            description: "Impulse buy".into()
        })
    );
    assert_eq!(db.get_transaction_count().unwrap(), 1);

    confirm_pending(&mut app, &mut db).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 0);
    assert!(db.get_rating(id).unwrap().is_none());
    assert!(app.history.is_empty());
    assert!(app.pending_action.is_none());
}

// ── Insights ──────────────────────────────────────────────────

#[test]
fn test_threshold_changes_flagged_count() {
    let (mut app, mut db) = setup();
    record(&mut db, Direction::Expense, "Takeout", dec!(50), 3);
    record(&mut db, Direction::Expense, "Books", dec!(30), 8);
    app.refresh_all(&mut db).unwrap();
    assert_eq!(app.report.low_satisfaction.count, 1);

    handle_command("threshold 9", &mut app, &mut db).unwrap();
    assert_eq!(app.threshold, 9);
    assert_eq!(app.report.low_satisfaction.count, 2);

    handle_command("threshold 0", &mut app, &mut db).unwrap();
    assert_eq!(app.threshold, 9);
    assert!(app.status_message.starts_with("Error:"));
}

#[test]
fn test_simulate_uses_wasted_spending() {
    let (mut app, mut db) = setup();
    record(&mut db, Direction::Expense, "Takeout", dec!(50), 3);
    record(&mut db, Direction::Expense, "Books", dec!(30), 8);
    record(&mut db, Direction::Expense, "Subscription", dec!(20), 2);

    handle_command("simulate 1200 100", &mut app, &mut db).unwrap();
    assert_eq!(app.screen, Screen::Insights);
    let p = &app.report.projection;
    assert_eq!(p.months_baseline, dec!(12.0));
    assert_eq!(p.months_optimized, dec!(7.1));
    assert_eq!(p.months_saved, dec!(4.9));
}

#[test]
fn test_simulate_rejects_negative_goal() {
    let (mut app, mut db) = setup();
    let before = app.goal_amount;
    handle_command("simulate -5 100", &mut app, &mut db).unwrap();
    assert!(app.status_message.starts_with("Error:"));
    assert!(app.status_message.contains("negative"));
    assert_eq!(app.goal_amount, before);
}

// ── Goals ─────────────────────────────────────────────────────

#[test]
fn test_goal_save_and_delete() {
    let (mut app, mut db) = setup();
    handle_command("goal 500 Bike fund", &mut app, &mut db).unwrap();
    assert_eq!(app.screen, Screen::Goals);
    assert_eq!(app.goals.len(), 1);
    assert_eq!(app.goals[0].name, "Bike fund");

    handle_command("save 200", &mut app, &mut db).unwrap();
    assert_eq!(app.goals[0].current_amount, dec!(200));
    assert!(app.status_message.contains("to go"));

    handle_command("save 300", &mut app, &mut db).unwrap();
    assert!(app.goals[0].is_reached());

    handle_command("delete-goal", &mut app, &mut db).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    confirm_pending(&mut app, &mut db).unwrap();
    assert!(app.goals.is_empty());
}

#[test]
fn test_goal_rejects_bad_target() {
    let (mut app, mut db) = setup();
    handle_command("goal 0 Nothing", &mut app, &mut db).unwrap();
    assert!(app.status_message.starts_with("Error:"));
    assert!(db.get_goals().unwrap().is_empty());
}

#[test]
fn test_goal_projection_uses_remaining() {
    let (mut app, mut db) = setup();
    handle_command("goal 1000 Trip", &mut app, &mut db).unwrap();
    handle_command("save 400", &mut app, &mut db).unwrap();
    let goal = app.goals[0].clone();
    // 600 left at the default 100 a month, nothing flagged
    let p = app.goal_projection(&goal);
    assert_eq!(p.months_baseline, dec!(6.0));
    assert_eq!(p.months_optimized, dec!(6.0));
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_writes_file() {
    let (mut app, mut db) = setup();
    record(&mut db, Direction::Income, "Salary", dec!(2500), 8);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    handle_command(&format!("export {}", path.display()), &mut app, &mut db).unwrap();
    assert!(app.status_message.starts_with("Exported 1"));
    assert!(path.exists());
}
