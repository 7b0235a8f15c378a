mod schema;

use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::EntryError;
use crate::insights::Snapshot;
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

/// Narrowing options for the history listing.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransactionFilter {
    pub(crate) direction: Option<Direction>,
    pub(crate) search: Option<String>,
    pub(crate) limit: Option<u32>,
}

/// A history row: the transaction and its rating, if it has one.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HistoryEntry {
    pub(crate) transaction: Transaction,
    pub(crate) rating: Option<SatisfactionRating>,
}

impl HistoryEntry {
    pub(crate) fn level(&self) -> Option<u8> {
        self.rating.as_ref().map(|r| r.level)
    }
}

const TRANSACTION_COLUMNS: &str = "t.id, t.direction, t.description, t.amount, t.occurred_at";
const RATING_COLUMNS: &str = "r.id, r.transaction_id, r.level, r.comment";

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "Opened database");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            debug!(version = schema::CURRENT_VERSION, "Created schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            info!(from = current, to = schema::CURRENT_VERSION, "Migrated schema");
        }

        Ok(())
    }

    // ── Unit of work ──────────────────────────────────────────

    /// Run `work` inside a single SQLite transaction.
    ///
    /// Commits when `work` returns `Ok`. Any error rolls everything back
    /// before it is handed to the caller, so a failed multi-step write never
    /// leaves part of itself behind.
    pub(crate) fn unit_of_work<T>(
        &mut self,
        label: &str,
        work: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let tx = self
            .conn
            .transaction()
            .with_context(|| format!("Failed to begin {label}"))?;
        match work(&tx) {
            Ok(value) => {
                tx.commit()
                    .with_context(|| format!("Failed to commit {label}"))?;
                debug!(label, "Committed");
                Ok(value)
            }
            Err(e) => {
                warn!(label, error = %e, "Rolling back");
                if let Err(rollback_err) = tx.rollback() {
                    warn!(label, error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    // ── Entries ───────────────────────────────────────────────

    /// Store a transaction and its rating together.
    pub(crate) fn record_entry(&mut self, entry: &NewEntry) -> Result<i64> {
        let txn = &entry.transaction;
        let id = self.unit_of_work("record entry", |tx| {
            tx.execute(
                "INSERT INTO transactions (direction, description, amount, occurred_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    txn.direction.as_str(),
                    txn.description,
                    txn.amount.to_string(),
                    txn.occurred_at,
                ],
            )
            .context("Failed to insert transaction")?;
            let id = tx.last_insert_rowid();
            tx.execute(
                "INSERT INTO satisfaction_ratings (transaction_id, level, comment)
                 VALUES (?1, ?2, ?3)",
                params![id, entry.level, entry.comment],
            )
            .context("Failed to insert satisfaction rating")?;
            Ok(id)
        })?;
        info!(
            id,
            direction = txn.direction.as_str(),
            amount = %txn.amount,
            level = entry.level,
            "Recorded entry"
        );
        Ok(id)
    }

    pub(crate) fn update_entry(&mut self, id: i64, edit: &EntryEdit) -> Result<()> {
        edit.validate()?;
        self.unit_of_work("update entry", |tx| {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM transactions WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(EntryError::TransactionNotFound(id).into());
            }

            if let Some(desc) = &edit.description {
                tx.execute(
                    "UPDATE transactions SET description = ?1 WHERE id = ?2",
                    params![desc.trim(), id],
                )?;
            }
            if let Some(amount) = edit.amount {
                tx.execute(
                    "UPDATE transactions SET amount = ?1 WHERE id = ?2",
                    params![amount.to_string(), id],
                )?;
            }
            if let Some(direction) = edit.direction {
                tx.execute(
                    "UPDATE transactions SET direction = ?1 WHERE id = ?2",
                    params![direction.as_str(), id],
                )?;
            }

            if !edit.touches_rating() {
                return Ok(());
            }

            let rating_id: Option<i64> = tx
                .query_row(
                    "SELECT id FROM satisfaction_ratings WHERE transaction_id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;

            match (rating_id, edit.level) {
                (Some(rating_id), level) => {
                    if let Some(level) = level {
                        tx.execute(
                            "UPDATE satisfaction_ratings SET level = ?1 WHERE id = ?2",
                            params![level, rating_id],
                        )?;
                    }
                    if let Some(comment) = &edit.comment {
                        tx.execute(
                            "UPDATE satisfaction_ratings SET comment = ?1 WHERE id = ?2",
                            params![comment.trim(), rating_id],
                        )?;
                    }
                }
                (None, Some(level)) => {
                    let comment = edit.comment.as_deref().unwrap_or("").trim();
                    tx.execute(
                        "INSERT INTO satisfaction_ratings (transaction_id, level, comment)
                         VALUES (?1, ?2, ?3)",
                        params![id, level, comment],
                    )?;
                }
                (None, None) => return Err(EntryError::Unrated(id).into()),
            }
            Ok(())
        })?;
        info!(id, "Updated entry");
        Ok(())
    }

    /// Delete entries and their ratings. Either every id is removed or none is.
    pub(crate) fn delete_entries(&mut self, ids: &[i64]) -> Result<usize> {
        let unique: BTreeSet<i64> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(0);
        }
        let count = self.unit_of_work("delete entries", |tx| {
            for &id in &unique {
                tx.execute(
                    "DELETE FROM satisfaction_ratings WHERE transaction_id = ?1",
                    params![id],
                )?;
                let removed =
                    tx.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
                if removed == 0 {
                    return Err(EntryError::TransactionNotFound(id).into());
                }
            }
            Ok(unique.len())
        })?;
        info!(count, "Deleted entries");
        Ok(count)
    }

    pub(crate) fn get_history(&self, filter: &TransactionFilter) -> Result<Vec<HistoryEntry>> {
        let mut sql = format!(
            "SELECT {TRANSACTION_COLUMNS}, {RATING_COLUMNS}
             FROM transactions t
             LEFT JOIN satisfaction_ratings r ON r.transaction_id = t.id
             WHERE 1=1"
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(direction) = filter.direction {
            sql.push_str(&format!(" AND t.direction = ?{}", param_values.len() + 1));
            param_values.push(Box::new(direction.as_str()));
        }
        if let Some(s) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            sql.push_str(&format!(
                " AND (t.description LIKE ?{0} OR r.comment LIKE ?{0})",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{s}%")));
        }

        sql.push_str(" ORDER BY t.occurred_at DESC, t.id DESC");

        if let Some(l) = filter.limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let transaction = row_to_transaction(row)?;
            let rating = match row.get::<_, Option<i64>>(5)? {
                Some(_) => Some(row_to_rating(row, 5)?),
                None => None,
            };
            Ok(HistoryEntry {
                transaction,
                rating,
            })
        })?;
        let entries = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(rows = entries.len(), "Loaded history");
        Ok(entries)
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions t WHERE t.id = ?1"),
                params![id],
                row_to_transaction,
            )
            .optional()?)
    }

    pub(crate) fn get_rating(&self, transaction_id: i64) -> Result<Option<SatisfactionRating>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {RATING_COLUMNS} FROM satisfaction_ratings r WHERE r.transaction_id = ?1"
                ),
                params![transaction_id],
                |row| row_to_rating(row, 0),
            )
            .optional()?)
    }

    /// Rated entries only, in the order they were recorded.
    pub(crate) fn get_rated_transactions(&self) -> Result<Vec<RatedTransaction>> {
        query_rated(&self.conn)
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    /// All transactions and rated pairs, read inside one transaction so
    /// totals and details always describe the same data.
    pub(crate) fn snapshot(&mut self) -> Result<Snapshot> {
        self.unit_of_work("snapshot", |tx| {
            Ok(Snapshot {
                transactions: query_transactions(tx)?,
                rated: query_rated(tx)?,
            })
        })
    }

    // ── Savings goals ─────────────────────────────────────────

    pub(crate) fn insert_goal(&mut self, goal: &NewGoal) -> Result<i64> {
        let goal = goal.clone().into_goal();
        let id = self.unit_of_work("insert goal", |tx| {
            tx.execute(
                "INSERT INTO savings_goals (name, target_amount, current_amount, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    goal.name,
                    goal.target_amount.to_string(),
                    goal.current_amount.to_string(),
                    goal.created_at,
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        info!(id, name = %goal.name, target = %goal.target_amount, "Created savings goal");
        Ok(id)
    }

    pub(crate) fn get_goals(&self) -> Result<Vec<SavingsGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, target_amount, current_amount, created_at
             FROM savings_goals ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map([], row_to_goal)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_goal(&self, id: i64) -> Result<Option<SavingsGoal>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, target_amount, current_amount, created_at
                 FROM savings_goals WHERE id = ?1",
                params![id],
                row_to_goal,
            )
            .optional()?)
    }

    /// Add `amount` to a goal's saved total and return the updated goal.
    pub(crate) fn contribute_to_goal(&mut self, id: i64, amount: Decimal) -> Result<SavingsGoal> {
        validate_amount(amount)?;
        let goal = self.unit_of_work("contribute to goal", |tx| {
            let mut goal = tx
                .query_row(
                    "SELECT id, name, target_amount, current_amount, created_at
                     FROM savings_goals WHERE id = ?1",
                    params![id],
                    row_to_goal,
                )
                .optional()?
                .ok_or(EntryError::GoalNotFound(id))?;
            let saved = goal.current_amount.saturating_add(amount);
            if saved > MAX_AMOUNT {
                return Err(EntryError::AmountTooLarge(saved).into());
            }
            goal.current_amount = saved;
            tx.execute(
                "UPDATE savings_goals SET current_amount = ?1 WHERE id = ?2",
                params![goal.current_amount.to_string(), id],
            )?;
            Ok(goal)
        })?;
        info!(id, amount = %amount, saved = %goal.current_amount, "Contributed to goal");
        Ok(goal)
    }

    pub(crate) fn delete_goal(&mut self, id: i64) -> Result<()> {
        self.unit_of_work("delete goal", |tx| {
            let removed = tx.execute("DELETE FROM savings_goals WHERE id = ?1", params![id])?;
            if removed == 0 {
                return Err(EntryError::GoalNotFound(id).into());
            }
            Ok(())
        })?;
        info!(id, "Deleted savings goal");
        Ok(())
    }

    // ── Export ────────────────────────────────────────────────

    /// Write the full history to a CSV file, newest first. Returns the row count.
    pub(crate) fn export_to_csv(&self, path: &str) -> Result<usize> {
        let entries = self.get_history(&TransactionFilter::default())?;
        if entries.is_empty() {
            return Ok(0);
        }

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        wtr.write_record([
            "id",
            "date",
            "type",
            "description",
            "amount",
            "satisfaction",
            "comment",
        ])?;
        for entry in &entries {
            let txn = &entry.transaction;
            wtr.write_record([
                txn.id.map(|id| id.to_string()).unwrap_or_default(),
                txn.date().to_string(),
                txn.direction.as_str().to_string(),
                txn.description.clone(),
                format!("{:.2}", txn.amount),
                entry.level().map(|l| l.to_string()).unwrap_or_default(),
                entry
                    .rating
                    .as_ref()
                    .map(|r| r.comment.clone())
                    .unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
        info!(rows = entries.len(), path, "Exported history");
        Ok(entries.len())
    }
}

fn query_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions t ORDER BY t.occurred_at, t.id"
    ))?;
    let rows = stmt.query_map([], row_to_transaction)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn query_rated(conn: &Connection) -> Result<Vec<RatedTransaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS}, {RATING_COLUMNS}
         FROM transactions t
         JOIN satisfaction_ratings r ON r.transaction_id = t.id
         ORDER BY t.occurred_at, t.id"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(RatedTransaction {
            transaction: row_to_transaction(row)?,
            rating: row_to_rating(row, 5)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let direction: String = row.get(1)?;
    let amount_str: String = row.get(3)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        direction: Direction::parse(&direction)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?,
        description: row.get(2)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        occurred_at: row.get(4)?,
    })
}

/// Reads the rating columns starting at `offset`.
fn row_to_rating(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<SatisfactionRating> {
    Ok(SatisfactionRating {
        id: Some(row.get(offset)?),
        transaction_id: row.get(offset + 1)?,
        level: row.get(offset + 2)?,
        comment: row.get(offset + 3)?,
    })
}

fn row_to_goal(row: &rusqlite::Row<'_>) -> rusqlite::Result<SavingsGoal> {
    let target: String = row.get(2)?;
    let current: String = row.get(3)?;
    Ok(SavingsGoal {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        target_amount: Decimal::from_str(&target).unwrap_or_default(),
        current_amount: Decimal::from_str(&current).unwrap_or_default(),
        created_at: row.get(4)?,
    })
}
