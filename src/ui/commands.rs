use std::collections::HashMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use tracing::warn;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::config::parse_threshold;
use crate::db::Database;
use crate::error::EntryError;
use crate::models::{
    parse_amount, parse_goal_amount, Direction, EntryEdit, NewEntry, NewGoal, MAX_LEVEL, MIN_LEVEL,
};
use crate::ui::util::{format_amount, format_months};

/// Where a command shows up in the help overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandGroup {
    Navigation,
    Entries,
    Insights,
    Goals,
}

impl CommandGroup {
    pub(crate) fn all() -> &'static [CommandGroup] {
        &[Self::Entries, Self::Insights, Self::Goals, Self::Navigation]
    }
}

impl std::fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Navigation => write!(f, "Navigation"),
            Self::Entries => write!(f, "Entries"),
            Self::Insights => write!(f, "Insights"),
            Self::Goals => write!(f, "Goals"),
        }
    }
}

pub(crate) struct Command {
    /// Primary name; every alias maps to a `Command` carrying the same one.
    pub(crate) name: &'static str,
    pub(crate) aliases: &'static [&'static str],
    pub(crate) group: CommandGroup,
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ([$name:expr $(, $alias:expr)*], $group:expr, $desc:expr, $func:expr, $registry:expr) => {{
        for key in [$name $(, $alias)*] {
            $registry.insert(
                key,
                Command {
                    name: $name,
                    aliases: &[$($alias),*],
                    group: $group,
                    description: $desc,
                    run: $func,
                },
            );
        }
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    use CommandGroup::{Entries, Goals, Insights, Navigation};
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!(
        ["add", "a"],
        Entries,
        "Record entry (e.g. :add expense 12.50 3 Late night pizza)",
        cmd_add,
        r
    );
    register_command!(
        ["rate"],
        Entries,
        "Rate selected entry (e.g. :rate 7 worth it)",
        cmd_rate,
        r
    );
    register_command!(["amount"], Entries, "Change amount of selected entry", cmd_amount, r);
    register_command!(["rename"], Entries, "Rename selected entry", cmd_rename, r);
    register_command!(["type"], Entries, "Set selected entry to income or expense", cmd_type, r);
    register_command!(["comment"], Entries, "Set comment on selected entry", cmd_comment, r);
    register_command!(["delete"], Entries, "Delete selected entry", cmd_delete, r);
    register_command!(
        ["export"],
        Entries,
        "Export history to CSV (e.g. :export ~/worthit.csv)",
        cmd_export,
        r
    );

    register_command!(
        ["threshold"],
        Insights,
        "Flag expenses rated below N (e.g. :threshold 6)",
        cmd_threshold,
        r
    );
    register_command!(
        ["simulate"],
        Insights,
        "Simulate a goal (e.g. :simulate 1200 100)",
        cmd_simulate,
        r
    );

    register_command!(
        ["goal"],
        Goals,
        "Create savings goal (e.g. :goal 5000 Emergency fund)",
        cmd_goal,
        r
    );
    register_command!(
        ["save"],
        Goals,
        "Add money to selected goal (e.g. :save 150)",
        cmd_save,
        r
    );
    register_command!(["delete-goal"], Goals, "Delete selected goal", cmd_delete_goal, r);

    register_command!(["dashboard", "d"], Navigation, "Go to Dashboard", cmd_dashboard, r);
    register_command!(["history"], Navigation, "Go to History", cmd_history, r);
    register_command!(["insights", "i"], Navigation, "Go to Insights", cmd_insights, r);
    register_command!(["map", "v"], Navigation, "Go to Value Map", cmd_value_map, r);
    register_command!(["goals"], Navigation, "Go to Goals", cmd_goals, r);
    register_command!(["help", "h"], Navigation, "Show this help", cmd_help, r);
    register_command!(["quit", "q"], Navigation, "Quit WorthIt", cmd_quit, r);

    r
});

/// Help overlay rows: one `(":name, :alias", description)` pair per command,
/// grouped and sorted by primary name.
pub(crate) fn help_sections() -> Vec<(CommandGroup, Vec<(String, &'static str)>)> {
    CommandGroup::all()
        .iter()
        .map(|&group| {
            let mut rows: Vec<(String, &'static str)> = COMMANDS
                .iter()
                .filter(|(&key, cmd)| key == cmd.name && cmd.group == group)
                .map(|(_, cmd)| {
                    let label = std::iter::once(cmd.name)
                        .chain(cmd.aliases.iter().copied())
                        .map(|n| format!(":{n}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    (label, cmd.description)
                })
                .collect();
            rows.sort();
            (group, rows)
        })
        .collect()
}

/// Run a `:` command. Rejected input lands in the status bar rather than
/// ending the session.
pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, db) {
            warn!(command = cmd_name, error = %e, "Command failed");
            // the selection pointed at something that is gone; resync the view
            if e
                .downcast_ref::<EntryError>()
                .is_some_and(EntryError::is_not_found)
            {
                app.refresh_all(db)?;
            }
            app.set_status(format!("Error: {e:#}"));
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Navigation ───────────────────────────────────────────────

pub(crate) fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> anyhow::Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard | Screen::History => app.refresh_history(db)?,
        Screen::Insights | Screen::ValueMap => app.refresh_insights(db)?,
        Screen::Goals => {
            app.refresh_goals(db)?;
            app.refresh_insights(db)?;
        }
    }
    Ok(())
}

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Dashboard)
}

fn cmd_history(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::History)
}

fn cmd_insights(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Insights)
}

fn cmd_value_map(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::ValueMap)
}

fn cmd_goals(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Goals)
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

// ── Entries ──────────────────────────────────────────────────

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.splitn(4, ' ').map(str::trim).collect();
    if parts.len() < 4 {
        app.set_status(format!(
            "Usage: :add <income|expense> <amount> <level {MIN_LEVEL}-{MAX_LEVEL}> <description>"
        ));
        return Ok(());
    }

    let direction = Direction::parse(parts[0])?;
    let amount = parse_amount(parts[1])?;
    let level: i64 = parts[2]
        .parse()
        .map_err(|_| anyhow::anyhow!("'{}' is not a valid satisfaction level", parts[2]))?;
    let entry = NewEntry::new(direction, parts[3], amount, level, "", None)?;
    let id = db.record_entry(&entry)?;

    app.history_index = 0;
    app.history_scroll = 0;
    app.refresh_all(db)?;
    app.set_status(format!(
        "Recorded #{id}: {} {}",
        entry.transaction.description,
        format_amount(entry.transaction.amount)
    ));
    Ok(())
}

/// Id of the entry under the cursor, or a status hint when there is none.
fn selected_entry_id(app: &mut App) -> Option<i64> {
    let id = app.selected_entry().and_then(|e| e.transaction.id);
    if id.is_none() {
        app.set_status("No entry selected. Pick one on the History screen (2)");
    }
    id
}

fn apply_edit(app: &mut App, db: &mut Database, id: i64, edit: EntryEdit) -> anyhow::Result<()> {
    db.update_entry(id, &edit)?;
    app.refresh_all(db)?;
    app.set_status(format!("Updated #{id}"));
    Ok(())
}

fn cmd_rate(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, ' ');
    let level = parts.next().filter(|s| !s.is_empty());
    let Some(level) = level else {
        app.set_status(format!("Usage: :rate <{MIN_LEVEL}-{MAX_LEVEL}> [comment]"));
        return Ok(());
    };
    let level: i64 = level
        .parse()
        .map_err(|_| anyhow::anyhow!("'{level}' is not a valid satisfaction level"))?;
    let comment = parts.next().map(str::trim).filter(|c| !c.is_empty());

    let Some(id) = selected_entry_id(app) else {
        return Ok(());
    };
    let edit = EntryEdit {
        level: Some(level),
        comment: comment.map(str::to_string),
        ..Default::default()
    };
    apply_edit(app, db, id, edit)
}

fn cmd_amount(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :amount <value>");
        return Ok(());
    }
    let amount = parse_amount(args)?;
    let Some(id) = selected_entry_id(app) else {
        return Ok(());
    };
    let edit = EntryEdit {
        amount: Some(amount),
        ..Default::default()
    };
    apply_edit(app, db, id, edit)
}

fn cmd_rename(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(id) = selected_entry_id(app) else {
        return Ok(());
    };
    if args.is_empty() {
        // Open an edit prompt seeded with the current description
        let current = app
            .selected_entry()
            .map(|e| e.transaction.description.clone());
        app.command_input = current.unwrap_or_default();
        app.input_mode = InputMode::Editing;
        return Ok(());
    }
    let edit = EntryEdit {
        description: Some(args.to_string()),
        ..Default::default()
    };
    apply_edit(app, db, id, edit)
}

fn cmd_type(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let names: Vec<&str> = Direction::all().iter().map(|d| d.label()).collect();
        app.set_status(format!("Usage: :type <{}>", names.join("|").to_lowercase()));
        return Ok(());
    }
    let direction = Direction::parse(args)?;
    let Some(id) = selected_entry_id(app) else {
        return Ok(());
    };
    let edit = EntryEdit {
        direction: Some(direction),
        ..Default::default()
    };
    apply_edit(app, db, id, edit)
}

fn cmd_comment(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(id) = selected_entry_id(app) else {
        return Ok(());
    };
    let edit = EntryEdit {
        comment: Some(args.to_string()),
        ..Default::default()
    };
    apply_edit(app, db, id, edit)
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(entry) = app.selected_entry() else {
        app.set_status("No entry selected");
        return Ok(());
    };
    let Some(id) = entry.transaction.id else {
        return Ok(());
    };
    let description = entry.transaction.description.clone();
    app.confirm_message = format!("Delete '{description}' and its rating?");
    app.pending_action = Some(PendingAction::DeleteEntry { id, description });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

// ── Insights ─────────────────────────────────────────────────

fn cmd_threshold(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!(
            "Flagging expenses rated below {}. Usage: :threshold <n>",
            app.threshold
        ));
        return Ok(());
    }
    app.threshold = parse_threshold(args)?;
    app.refresh_insights(db)?;
    app.set_status(format!(
        "Threshold {}: {} expenses flagged",
        app.threshold, app.report.low_satisfaction.count
    ));
    Ok(())
}

fn cmd_simulate(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 2 {
        app.set_status("Usage: :simulate <goal amount> <monthly saving>");
        return Ok(());
    }
    let goal = parse_goal_amount(parts[0])?;
    let saving = parse_amount(parts[1])?;

    app.goal_amount = goal;
    app.monthly_saving = saving;
    app.screen = Screen::Insights;
    app.refresh_insights(db)?;
    let p = &app.report.projection;
    let msg = format!(
        "{}: {} now, {} redirecting flagged spending",
        format_amount(goal),
        format_months(p.months_baseline),
        format_months(p.months_optimized)
    );
    app.set_status(msg);
    Ok(())
}

// ── Goals ────────────────────────────────────────────────────

fn cmd_goal(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, ' ');
    let (Some(target), Some(name)) = (parts.next(), parts.next()) else {
        app.set_status("Usage: :goal <target> <name>");
        return Ok(());
    };
    let target = parse_amount(target)?;
    let goal = NewGoal::new(name, target, Decimal::ZERO)?;
    db.insert_goal(&goal)?;

    app.screen = Screen::Goals;
    app.refresh_goals(db)?;
    app.goal_index = app.goals.len().saturating_sub(1);
    app.set_status(format!(
        "Created goal: {} ({})",
        goal.name,
        format_amount(goal.target_amount)
    ));
    Ok(())
}

fn cmd_save(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :save <amount>");
        return Ok(());
    }
    let amount = parse_amount(args)?;
    let Some(id) = app.selected_goal().and_then(|g| g.id) else {
        app.set_status("No goal selected. Create one with :goal <target> <name>");
        return Ok(());
    };
    let goal = db.contribute_to_goal(id, amount)?;
    app.refresh_goals(db)?;
    if goal.is_reached() {
        app.set_status(format!("{} reached!", goal.name));
    } else {
        app.set_status(format!(
            "{}: {} to go",
            goal.name,
            format_amount(goal.remaining())
        ));
    }
    Ok(())
}

fn cmd_delete_goal(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(goal) = app.selected_goal() else {
        app.set_status("No goal selected");
        return Ok(());
    };
    let Some(id) = goal.id else {
        return Ok(());
    };
    let name = goal.name.clone();
    app.confirm_message = format!("Delete goal '{name}'?");
    app.pending_action = Some(PendingAction::DeleteGoal { id, name });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

/// Carry out a confirmed action.
pub(crate) fn confirm_pending(app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(action) = app.pending_action.take() else {
        return Ok(());
    };
    match action {
        PendingAction::DeleteEntry { id, description } => {
            db.delete_entries(&[id])?;
            app.refresh_all(db)?;
            app.set_status(format!("Deleted: {description}"));
        }
        PendingAction::DeleteGoal { id, name } => {
            db.delete_goal(id)?;
            app.refresh_goals(db)?;
            app.set_status(format!("Deleted goal: {name}"));
        }
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        crate::run::shellexpand("~/worthit-export.csv")
    } else {
        crate::run::shellexpand(args)
    };
    let count = db.export_to_csv(&path)?;
    if count == 0 {
        app.set_status("Nothing to export");
    } else {
        app.set_status(format!("Exported {count} entries to {path}"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
