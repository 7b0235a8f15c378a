use anyhow::Result;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::db::{Database, HistoryEntry, TransactionFilter};
use crate::insights::{project_goal_timeline, GoalProjection, InsightReport, Snapshot};
use crate::models::SavingsGoal;
use crate::ui::util::format_amount;

/// Entries shown on the dashboard before `a` expands the list.
pub(crate) const RECENT_ENTRIES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    History,
    Insights,
    ValueMap,
    Goals,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::History,
            Self::Insights,
            Self::ValueMap,
            Self::Goals,
        ]
    }

    /// Screen-specific keys and commands, shown in the status bar and at the
    /// top of the help overlay.
    pub(crate) fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Dashboard => &[("a", "show all"), (":add", "record")],
            Self::History => &[("D", "delete"), (":rate", "re-rate"), (":rename", "edit")],
            Self::Insights => &[(":threshold", "cutoff"), (":simulate", "try a goal")],
            Self::ValueMap => &[(":threshold", "cutoff"), (":i", "details")],
            Self::Goals => &[("D", "delete"), (":save", "add money"), (":goal", "new")],
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::History => write!(f, "History"),
            Self::Insights => write!(f, "Insights"),
            Self::ValueMap => write!(f, "Value Map"),
            Self::Goals => write!(f, "Goals"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteEntry { id: i64, description: String },
    DeleteGoal { id: i64, name: String },
}

/// Everything the screens draw from. Handlers mutate it, render only reads it.
pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Simulation parameters
    pub(crate) threshold: u8,
    pub(crate) goal_amount: Decimal,
    pub(crate) monthly_saving: Decimal,

    // Dashboard
    pub(crate) dashboard_show_all: bool,

    // History (newest first)
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) history_index: usize,
    pub(crate) history_scroll: usize,
    pub(crate) transaction_count: i64,

    // Insights and value map
    pub(crate) report: InsightReport,
    pub(crate) insights_scroll: usize,

    // Goals
    pub(crate) goals: Vec<SavingsGoal>,
    pub(crate) goal_index: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            threshold: config.threshold,
            goal_amount: config.goal_amount,
            monthly_saving: config.monthly_saving,

            dashboard_show_all: false,

            history: Vec::new(),
            history_index: 0,
            history_scroll: 0,
            transaction_count: 0,

            report: InsightReport::build(
                &Snapshot::default(),
                config.threshold,
                config.goal_amount,
                config.monthly_saving,
            ),
            insights_scroll: 0,

            goals: Vec::new(),
            goal_index: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_history(&mut self, db: &Database) -> Result<()> {
        self.history = db.get_history(&TransactionFilter::default())?;
        self.transaction_count = db.get_transaction_count()?;
        if self.history_index >= self.history.len() {
            self.history_index = self.history.len().saturating_sub(1);
        }
        if self.history_scroll > self.history_index {
            self.history_scroll = self.history_index;
        }
        Ok(())
    }

    /// Rebuild the insight report from one consistent read.
    pub(crate) fn refresh_insights(&mut self, db: &mut Database) -> Result<()> {
        let snapshot = db.snapshot()?;
        self.report = InsightReport::build(
            &snapshot,
            self.threshold,
            self.goal_amount,
            self.monthly_saving,
        );
        Ok(())
    }

    pub(crate) fn refresh_goals(&mut self, db: &Database) -> Result<()> {
        self.goals = db.get_goals()?;
        if self.goal_index >= self.goals.len() {
            self.goal_index = self.goals.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &mut Database) -> Result<()> {
        self.refresh_history(db)?;
        self.refresh_insights(db)?;
        self.refresh_goals(db)?;
        Ok(())
    }

    pub(crate) fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.history.get(self.history_index)
    }

    pub(crate) fn selected_goal(&self) -> Option<&SavingsGoal> {
        self.goals.get(self.goal_index)
    }

    /// Entries for the dashboard list, newest first.
    pub(crate) fn dashboard_entries(&self) -> &[HistoryEntry] {
        if self.dashboard_show_all {
            &self.history
        } else {
            &self.history[..self.history.len().min(RECENT_ENTRIES)]
        }
    }

    /// Months left on a goal at the current saving rate, with and without the
    /// flagged spending redirected to it.
    pub(crate) fn goal_projection(&self, goal: &SavingsGoal) -> GoalProjection {
        project_goal_timeline(
            goal.remaining(),
            self.monthly_saving,
            self.report.low_satisfaction.total_wasted,
        )
    }

    /// What the current screen's numbers add up to, for the status bar.
    pub(crate) fn status_summary(&self) -> String {
        let flagged = &self.report.low_satisfaction;
        match self.screen {
            Screen::Dashboard => format!(
                "{} entries | net {}",
                self.transaction_count,
                format_amount(self.report.totals.net)
            ),
            Screen::History if self.history.is_empty() => "no entries".to_string(),
            Screen::History => format!(
                "entry {} of {}",
                self.history_index + 1,
                self.history.len()
            ),
            Screen::Insights | Screen::ValueMap if flagged.count == 0 => {
                format!("nothing rated below {}", self.threshold)
            }
            Screen::Insights | Screen::ValueMap => format!(
                "{} below {} | {} recoverable",
                flagged.count,
                self.threshold,
                format_amount(flagged.total_wasted)
            ),
            Screen::Goals => format!(
                "{} goals | {} reached",
                self.goals.len(),
                self.goals.iter().filter(|g| g.is_reached()).count()
            ),
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
