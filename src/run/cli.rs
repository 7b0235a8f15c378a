use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::{parse_threshold, Config};
use crate::db::{Database, TransactionFilter};
use crate::insights::{
    aggregate_totals, find_low_satisfaction_expenses, project_goal_timeline, GoalProjection,
    InsightReport, WEIGHT_SCALE,
};
use crate::error::EntryError;
use crate::models::{
    parse_amount, parse_goal_amount, Direction, EntryEdit, NewEntry, NewGoal, SatisfactionLevel,
    MAX_LEVEL, MIN_LEVEL,
};
use crate::ui::util::{format_amount, format_months, format_months_saved, truncate};

/// Flags that take a value; their values are never positional.
const VALUE_FLAGS: &[&str] = &[
    "--comment",
    "--date",
    "--type",
    "--search",
    "--limit",
    "--description",
    "--amount",
    "--level",
    "--threshold",
    "--goal",
    "--saving",
];

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    match args[1].as_str() {
        "add" => cli_add(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db),
        "edit" => cli_edit(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "summary" | "s" => cli_summary(db),
        "insights" => cli_insights(&args[2..], db, config),
        "project" => cli_project(&args[2..], db, config),
        "goals" => cli_goals(db, config),
        "goal-add" => cli_goal_add(&args[2..], db),
        "goal-save" => cli_goal_save(&args[2..], db),
        "goal-delete" => cli_goal_delete(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("worthit {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("WorthIt - track what you earn, what you spend, and whether it was worth it");
    println!();
    println!("Usage: worthit [command]");
    println!();
    println!("Commands:");
    println!("  (none)                                 Launch interactive TUI");
    println!("  add <income|expense> <amount> <level> <description...>");
    println!(
        "                                         Record an entry rated {MIN_LEVEL}-{MAX_LEVEL}"
    );
    println!("    --comment <text>                     Why it was (or wasn't) worth it");
    println!("    --date <YYYY-MM-DD>                  When it happened (default: now)");
    println!("  list                                   Show history, newest first");
    println!("    --type <income|expense>  --search <text>  --limit <n>");
    println!("  edit <id>                              Change fields of an entry");
    println!("    --description <text>  --amount <n>  --type <t>  --level <n>  --comment <text>");
    println!("  delete <id>...                         Delete entries and their ratings");
    println!("  summary                                Income, expenses and what remains");
    println!("  insights                               Low-satisfaction report and value map");
    println!("    --threshold <n>  --goal <amount>  --saving <amount>");
    println!("  project <goal> <monthly-saving>        Months to reach a goal");
    println!("    --threshold <n>");
    println!("  goals                                  List savings goals");
    println!("  goal-add <target> <name...>            Create a savings goal");
    println!("  goal-save <id> <amount>                Put money towards a goal");
    println!("  goal-delete <id>                       Delete a savings goal");
    println!("  export [path]                          Export history to CSV");
    println!("  --help, -h                             Show this help");
    println!("  --version, -V                          Show version");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse()
        .with_context(|| format!("'{s}' is not a valid id"))
}

fn parse_level(s: &str) -> Result<i64> {
    Ok(i64::from(SatisfactionLevel::parse(s)?.get()))
}

pub(crate) fn parse_add(args: &[String]) -> Result<NewEntry> {
    let pos = positionals(args);
    if pos.len() < 4 {
        anyhow::bail!(
            "Usage: worthit add <income|expense> <amount> <level> <description...> [--comment <text>] [--date <YYYY-MM-DD>]"
        );
    }
    let direction = Direction::parse(pos[0])?;
    let amount = parse_amount(pos[1])?;
    let level = parse_level(pos[2])?;
    let description = pos[3..].join(" ");
    let comment = flag_value(args, "--comment").unwrap_or("");
    let entry = NewEntry::new(
        direction,
        &description,
        amount,
        level,
        comment,
        flag_value(args, "--date"),
    )?;
    Ok(entry)
}

pub(crate) fn parse_edit(args: &[String]) -> Result<(i64, EntryEdit)> {
    let id = positionals(args)
        .first()
        .map(|s| parse_id(s))
        .transpose()?
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Usage: worthit edit <id> [--description <text>] [--amount <n>] [--type <t>] [--level <n>] [--comment <text>]"
            )
        })?;

    let edit = EntryEdit {
        description: flag_value(args, "--description").map(str::to_string),
        amount: flag_value(args, "--amount").map(parse_amount).transpose()?,
        direction: flag_value(args, "--type").map(Direction::parse).transpose()?,
        level: flag_value(args, "--level").map(parse_level).transpose()?,
        comment: flag_value(args, "--comment").map(str::to_string),
    };
    edit.validate()?;
    Ok((id, edit))
}

fn threshold_arg(args: &[String], config: &Config) -> Result<u8> {
    flag_value(args, "--threshold")
        .map(parse_threshold)
        .transpose()
        .map(|t| t.unwrap_or(config.threshold))
}

// ── Entries ──────────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let entry = parse_add(args)?;
    let id = db.record_entry(&entry)?;
    let txn = &entry.transaction;
    println!(
        "Recorded #{id}: {} {} {} (satisfaction {}/{MAX_LEVEL})",
        txn.direction,
        txn.description,
        format_amount(txn.amount),
        entry.level
    );
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let filter = TransactionFilter {
        direction: flag_value(args, "--type").map(Direction::parse).transpose()?,
        search: flag_value(args, "--search").map(str::to_string),
        limit: flag_value(args, "--limit")
            .map(|l| l.parse::<u32>().with_context(|| format!("'{l}' is not a valid limit")))
            .transpose()?,
    };
    let history = db.get_history(&filter)?;
    if history.is_empty() {
        println!("No entries");
        return Ok(());
    }

    println!(
        "{:<5} {:<10} {:<8} {:<28} {:>12} {:>4}  Comment",
        "ID", "Date", "Type", "Description", "Amount", "Sat"
    );
    println!("{}", "─".repeat(80));
    for entry in &history {
        let txn = &entry.transaction;
        let level = entry
            .level()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".into());
        let comment = entry
            .rating
            .as_ref()
            .map(|r| r.comment.as_str())
            .unwrap_or("");
        println!(
            "{:<5} {:<10} {:<8} {:<28} {:>12} {:>4}  {}",
            txn.id.unwrap_or(0),
            txn.date(),
            txn.direction.label(),
            truncate(&txn.description, 28),
            format_amount(txn.signed_amount()),
            level,
            truncate(comment, 30),
        );
    }
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database) -> Result<()> {
    let (id, edit) = parse_edit(args)?;
    db.update_entry(id, &edit)?;

    let txn = db
        .get_transaction(id)?
        .ok_or(EntryError::TransactionNotFound(id))?;
    let rating = db
        .get_rating(id)?
        .map(|r| format!("{}/{MAX_LEVEL} {}", r.level, r.comment))
        .unwrap_or_else(|| "unrated".into());
    println!(
        "Updated #{id}: {} {} {} ({})",
        txn.direction,
        txn.description,
        format_amount(txn.amount),
        rating.trim_end()
    );
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: worthit delete <id>...");
    }
    let ids = args
        .iter()
        .map(|a| parse_id(a))
        .collect::<Result<Vec<_>>>()?;
    let count = db.delete_entries(&ids)?;
    println!("Deleted {count} entr{}", if count == 1 { "y" } else { "ies" });
    Ok(())
}

// ── Reports ──────────────────────────────────────────────────

fn cli_summary(db: &mut Database) -> Result<()> {
    let snapshot = db.snapshot()?;
    let totals = aggregate_totals(&snapshot.transactions);

    println!("WorthIt Summary");
    println!("{}", "─".repeat(40));
    println!("  Income:     {}", format_amount(totals.income));
    println!("  Expenses:   {}", format_amount(totals.expense));
    println!("  Remaining:  {}", format_amount(totals.net));
    println!("  Entries:    {}", snapshot.transactions.len());
    Ok(())
}

fn cli_insights(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let threshold = threshold_arg(args, config)?;
    let (goal, saving) = simulation_args(args, config)?;

    let snapshot = db.snapshot()?;
    let report = InsightReport::build(&snapshot, threshold, goal, saving);

    println!("Low-satisfaction expenses (rated below {threshold})");
    println!("{}", "─".repeat(50));
    if report.is_all_aligned() {
        println!("  Nothing flagged. Your spending matches what you value.");
    } else {
        for detail in &report.low_satisfaction.details {
            println!(
                "  {:<30} {:>12}  {}/{MAX_LEVEL}",
                truncate(&detail.description, 30),
                format_amount(detail.amount),
                detail.level
            );
        }
        println!(
            "  {} flagged, {} you could redirect",
            report.low_satisfaction.count,
            format_amount(report.low_satisfaction.total_wasted)
        );
    }

    println!();
    println!(
        "Goal of {} saving {} a month",
        format_amount(goal),
        format_amount(saving)
    );
    println!("{}", "─".repeat(50));
    print_projection(&report.projection);

    println!();
    println!("Value map (share of spending)");
    println!("{}", "─".repeat(50));
    if report.weights.is_empty() {
        println!("  No rated expenses yet");
    }
    for weight in &report.weights {
        let width = (weight.weight * Decimal::from(30) / WEIGHT_SCALE)
            .round()
            .to_usize()
            .unwrap_or(0);
        let percent = format!("{:.1}", weight.weight / Decimal::TEN);
        println!(
            "  {:<20} {:<30} {:>5}%  {}/{MAX_LEVEL}",
            truncate(&weight.description, 20),
            "█".repeat(width),
            percent,
            weight.satisfaction_level
        );
    }
    Ok(())
}

/// `--goal` and `--saving` for `insights`, defaulting to the configured values.
pub(crate) fn simulation_args(args: &[String], config: &Config) -> Result<(Decimal, Decimal)> {
    let goal = flag_value(args, "--goal")
        .map(parse_goal_amount)
        .transpose()?
        .unwrap_or(config.goal_amount);
    let saving = flag_value(args, "--saving")
        .map(parse_amount)
        .transpose()?
        .unwrap_or(config.monthly_saving);
    Ok((goal, saving))
}

fn print_projection(projection: &GoalProjection) {
    println!("  Current pace:      {}", format_months(projection.months_baseline));
    println!("  Redirecting waste: {}", format_months(projection.months_optimized));
    println!("  Time saved:        {}", format_months_saved(projection));
}

/// `project <goal> <monthly-saving>` positionals.
pub(crate) fn parse_project(args: &[String]) -> Result<(Decimal, Decimal)> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: worthit project <goal> <monthly-saving> [--threshold <n>]");
    }
    Ok((parse_goal_amount(pos[0])?, parse_amount(pos[1])?))
}

fn cli_project(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let (goal, saving) = parse_project(args)?;
    let threshold = threshold_arg(args, config)?;

    let rated = db.get_rated_transactions()?;
    let wasted = find_low_satisfaction_expenses(&rated, threshold).total_wasted;
    let projection = project_goal_timeline(goal, saving, wasted);

    println!(
        "Goal {} at {} a month, plus {} redirected",
        format_amount(goal),
        format_amount(saving),
        format_amount(wasted)
    );
    print_projection(&projection);
    Ok(())
}

// ── Goals ────────────────────────────────────────────────────

fn cli_goals(db: &mut Database, config: &Config) -> Result<()> {
    let goals = db.get_goals()?;
    if goals.is_empty() {
        println!("No savings goals. Add one with: worthit goal-add <target> <name>");
        return Ok(());
    }
    let rated = db.get_rated_transactions()?;
    let wasted = find_low_satisfaction_expenses(&rated, config.threshold).total_wasted;

    println!(
        "{:<4} {:<20} {:>12} {:>12} {:>5}  Months (now / redirected)",
        "ID", "Name", "Saved", "Target", "%"
    );
    println!("{}", "─".repeat(80));
    for goal in &goals {
        let projection = project_goal_timeline(goal.remaining(), config.monthly_saving, wasted);
        let status = if goal.is_reached() {
            "reached".to_string()
        } else {
            format!(
                "{} / {}",
                format_months(projection.months_baseline),
                format_months(projection.months_optimized)
            )
        };
        println!(
            "{:<4} {:<20} {:>12} {:>12} {:>4.0}%  {}",
            goal.id.unwrap_or(0),
            truncate(&goal.name, 20),
            format_amount(goal.current_amount),
            format_amount(goal.target_amount),
            goal.progress_ratio() * 100.0,
            status
        );
    }
    Ok(())
}

fn cli_goal_add(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: worthit goal-add <target> <name...>");
    }
    let target = parse_amount(&args[0])?;
    let name = args[1..].join(" ");
    let goal = NewGoal::new(&name, target, Decimal::ZERO)?;
    let id = db.insert_goal(&goal)?;
    println!("Created goal #{id}: {} ({})", goal.name, format_amount(target));
    Ok(())
}

fn cli_goal_save(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: worthit goal-save <id> <amount>");
    }
    let id = parse_id(&args[0])?;
    let amount = parse_amount(&args[1])?;
    let goal = db.contribute_to_goal(id, amount)?;
    println!(
        "{}: {} of {}",
        goal.name,
        format_amount(goal.current_amount),
        format_amount(goal.target_amount)
    );
    if goal.is_reached() {
        println!("Goal reached!");
    }
    Ok(())
}

fn cli_goal_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = args
        .first()
        .map(|a| parse_id(a))
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("Usage: worthit goal-delete <id>"))?;
    let goal = db.get_goal(id)?.ok_or(EntryError::GoalNotFound(id))?;
    db.delete_goal(id)?;
    println!("Deleted goal #{id}: {}", goal.name);
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| shellexpand("~/worthit-export.csv"));

    let count = db.export_to_csv(&output_path)?;
    if count == 0 {
        println!("Nothing to export");
    } else {
        println!("Exported {count} entries to {output_path}");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
