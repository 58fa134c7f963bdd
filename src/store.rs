// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence boundary over SQLite. Validation happens here, at the
//! creation boundary; the engine only ever sees well-formed entities. Every
//! read is scoped by the caller's already-authenticated user id.

use crate::engine::Window;
use crate::error::{Error, Result};
use crate::models::{
    Budget, BudgetPeriod, Category, NotificationEvent, NotificationKind, Transaction,
    TransactionKind, DEFAULT_OWNER,
};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

fn decimal_col(idx: usize, s: String) -> rusqlite::Result<Decimal> {
    s.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn enum_col<T>(idx: usize, s: &str, parse: impl Fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    parse(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown enum value '{s}'").into(),
        )
    })
}

// ---- categories ----

pub fn create_category(conn: &Connection, user_id: i64, name: &str) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "category name must not be empty"));
    }
    if user_id == DEFAULT_OWNER {
        return Err(Error::validation("user", "default categories are read-only"));
    }
    conn.execute(
        "INSERT INTO categories(user_id, name) VALUES (?1, ?2)",
        params![user_id, name],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The user's own categories plus the shared defaults (owner 0).
pub fn list_categories(conn: &Connection, user_id: i64) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name FROM categories
         WHERE user_id IN (?1, ?2) ORDER BY user_id DESC, name",
    )?;
    let rows = stmt.query_map(params![user_id, DEFAULT_OWNER], |r| {
        Ok(Category {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Resolves a category name for the user, preferring their own over a
/// same-named shared default.
pub fn find_category(conn: &Connection, user_id: i64, name: &str) -> Result<Category> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name FROM categories
         WHERE user_id IN (?1, ?2) AND name = ?3 ORDER BY user_id DESC LIMIT 1",
    )?;
    stmt.query_row(params![user_id, DEFAULT_OWNER, name], |r| {
        Ok(Category {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
        })
    })
    .optional()?
    .ok_or_else(|| Error::validation("category", format!("category '{name}' not found")))
}

pub fn delete_category(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    // shared defaults (owner 0) are not writable by any user
    let n = conn.execute(
        "DELETE FROM categories WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    if n == 0 {
        return Err(Error::not_found("category", id));
    }
    Ok(())
}

fn category_visible(conn: &Connection, user_id: i64, id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE id = ?1 AND user_id IN (?2, ?3)",
            params![id, user_id, DEFAULT_OWNER],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

// ---- transactions ----

pub struct NewTransaction {
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub occurred_at: chrono::NaiveDate,
    pub description: Option<String>,
    pub tags: Option<String>,
}

pub fn create_transaction(conn: &Connection, user_id: i64, tx: &NewTransaction) -> Result<i64> {
    if tx.amount <= Decimal::ZERO {
        return Err(Error::validation(
            "amount",
            "amount must be positive; direction is carried by kind",
        ));
    }
    if let Some(cid) = tx.category_id {
        if !category_visible(conn, user_id, cid)? {
            return Err(Error::not_found("category", cid));
        }
    }
    conn.execute(
        "INSERT INTO transactions(user_id, category_id, amount, kind, occurred_at, description, tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            tx.category_id,
            tx.amount.to_string(),
            tx.kind.as_str(),
            tx.occurred_at,
            tx.description,
            tx.tags
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Transactions are immutable except for description and category
/// correction. `None` leaves a field unchanged.
pub fn update_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
    description: Option<&str>,
    category_id: Option<i64>,
) -> Result<()> {
    if let Some(cid) = category_id {
        if !category_visible(conn, user_id, cid)? {
            return Err(Error::not_found("category", cid));
        }
    }
    let n = conn.execute(
        "UPDATE transactions SET
            description = COALESCE(?3, description),
            category_id = COALESCE(?4, category_id)
         WHERE id = ?1 AND user_id = ?2",
        params![id, user_id, description, category_id],
    )?;
    if n == 0 {
        return Err(Error::not_found("transaction", id));
    }
    Ok(())
}

pub fn delete_transaction(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    if n == 0 {
        return Err(Error::not_found("transaction", id));
    }
    Ok(())
}

pub fn list_transactions(
    conn: &Connection,
    user_id: i64,
    window: Option<&Window>,
    category_filter: Option<&BTreeSet<i64>>,
) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, user_id, category_id, amount, kind, occurred_at, description, tags
         FROM transactions WHERE user_id = ?1",
    );
    if window.is_some() {
        sql.push_str(" AND occurred_at >= ?2 AND occurred_at < ?3");
    }
    sql.push_str(" ORDER BY occurred_at, id");

    let map_row = |r: &rusqlite::Row<'_>| -> rusqlite::Result<Transaction> {
        let amount: String = r.get(3)?;
        let kind: String = r.get(4)?;
        Ok(Transaction {
            id: r.get(0)?,
            user_id: r.get(1)?,
            category_id: r.get(2)?,
            amount: decimal_col(3, amount)?,
            kind: enum_col(4, &kind, TransactionKind::parse)?,
            occurred_at: r.get(5)?,
            description: r.get(6)?,
            tags: r.get(7)?,
        })
    };

    let mut stmt = conn.prepare(&sql)?;
    let mut out = Vec::new();
    if let Some(w) = window {
        let rows = stmt.query_map(params![user_id, w.start, w.end], map_row)?;
        for row in rows {
            out.push(row?);
        }
    } else {
        let rows = stmt.query_map(params![user_id], map_row)?;
        for row in rows {
            out.push(row?);
        }
    }
    if let Some(filter) = category_filter {
        out.retain(|t| t.category_id.map(|c| filter.contains(&c)).unwrap_or(false));
    }
    Ok(out)
}

// ---- budgets ----

pub struct NewBudget {
    pub name: String,
    pub total_amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub alert_threshold_percent: Decimal,
    pub categories: Vec<i64>,
}

fn validate_budget(b: &NewBudget) -> Result<()> {
    if b.name.trim().is_empty() {
        return Err(Error::validation("name", "budget name must not be empty"));
    }
    if b.total_amount < Decimal::ZERO {
        return Err(Error::validation(
            "total_amount",
            "budget amount must not be negative",
        ));
    }
    if b.end_date <= b.start_date {
        return Err(Error::validation(
            "end_date",
            "end date must be strictly after start date",
        ));
    }
    if b.alert_threshold_percent < Decimal::ZERO || b.alert_threshold_percent > Decimal::ONE_HUNDRED
    {
        return Err(Error::validation(
            "alert_threshold_percent",
            "threshold must be between 0 and 100",
        ));
    }
    Ok(())
}

pub fn create_budget(conn: &Connection, user_id: i64, budget: &NewBudget) -> Result<i64> {
    validate_budget(budget)?;
    for cid in &budget.categories {
        if !category_visible(conn, user_id, *cid)? {
            return Err(Error::not_found("category", *cid));
        }
    }
    conn.execute(
        "INSERT INTO budgets(user_id, name, total_amount, period, start_date, end_date, alert_threshold, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)",
        params![
            user_id,
            budget.name.trim(),
            budget.total_amount.to_string(),
            budget.period.as_str(),
            budget.start_date,
            budget.end_date,
            budget.alert_threshold_percent.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    for cid in &budget.categories {
        conn.execute(
            "INSERT OR IGNORE INTO budget_categories(budget_id, category_id) VALUES (?1, ?2)",
            params![id, cid],
        )?;
    }
    Ok(id)
}

pub fn update_budget(
    conn: &Connection,
    user_id: i64,
    id: i64,
    name: Option<&str>,
    total_amount: Option<Decimal>,
    alert_threshold_percent: Option<Decimal>,
) -> Result<()> {
    if let Some(amt) = total_amount {
        if amt < Decimal::ZERO {
            return Err(Error::validation(
                "total_amount",
                "budget amount must not be negative",
            ));
        }
    }
    if let Some(t) = alert_threshold_percent {
        if t < Decimal::ZERO || t > Decimal::ONE_HUNDRED {
            return Err(Error::validation(
                "alert_threshold_percent",
                "threshold must be between 0 and 100",
            ));
        }
    }
    let n = conn.execute(
        "UPDATE budgets SET
            name = COALESCE(?3, name),
            total_amount = COALESCE(?4, total_amount),
            alert_threshold = COALESCE(?5, alert_threshold)
         WHERE id = ?1 AND user_id = ?2",
        params![
            id,
            user_id,
            name,
            total_amount.map(|d| d.to_string()),
            alert_threshold_percent.map(|d| d.to_string())
        ],
    )?;
    if n == 0 {
        return Err(Error::not_found("budget", id));
    }
    Ok(())
}

/// Budgets are deactivated, not deleted, so history survives.
pub fn deactivate_budget(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "UPDATE budgets SET is_active = 0 WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    if n == 0 {
        return Err(Error::not_found("budget", id));
    }
    Ok(())
}

fn budget_categories(conn: &Connection, budget_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT category_id FROM budget_categories WHERE budget_id = ?1 ORDER BY category_id",
    )?;
    let rows = stmt.query_map(params![budget_id], |r| r.get::<_, i64>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn map_budget(r: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    let amount: String = r.get(3)?;
    let period: String = r.get(4)?;
    let threshold: String = r.get(7)?;
    Ok(Budget {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        total_amount: decimal_col(3, amount)?,
        period: enum_col(4, &period, BudgetPeriod::parse)?,
        start_date: r.get(5)?,
        end_date: r.get(6)?,
        alert_threshold_percent: decimal_col(7, threshold)?,
        is_active: r.get(8)?,
        categories: Vec::new(),
    })
}

const BUDGET_COLS: &str =
    "id, user_id, name, total_amount, period, start_date, end_date, alert_threshold, is_active";

pub fn get_budget(conn: &Connection, user_id: i64, id: i64) -> Result<Budget> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BUDGET_COLS} FROM budgets WHERE id = ?1 AND user_id = ?2"
    ))?;
    let mut budget = stmt
        .query_row(params![id, user_id], map_budget)
        .optional()?
        .ok_or_else(|| Error::not_found("budget", id))?;
    budget.categories = budget_categories(conn, budget.id)?;
    Ok(budget)
}

pub fn list_active_budgets(conn: &Connection, user_id: i64) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BUDGET_COLS} FROM budgets
         WHERE user_id = ?1 AND is_active = 1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![user_id], map_budget)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    for budget in &mut out {
        budget.categories = budget_categories(conn, budget.id)?;
    }
    Ok(out)
}

// ---- notifications ----

fn map_notification(r: &rusqlite::Row<'_>) -> rusqlite::Result<NotificationEvent> {
    let kind: String = r.get(2)?;
    Ok(NotificationEvent {
        id: r.get(0)?,
        user_id: r.get(1)?,
        kind: enum_col(2, &kind, NotificationKind::parse)?,
        title: r.get(3)?,
        message: r.get(4)?,
        budget_id: r.get(5)?,
        is_read: r.get(6)?,
        created_at: r.get(7)?,
    })
}

const NOTIFICATION_COLS: &str =
    "id, user_id, kind, title, message, budget_id, is_read, created_at";

/// Persists derived events. `INSERT OR IGNORE` rides the partial unique
/// index on unread (user, budget, kind): when two evaluations race, the
/// second insert is dropped and the invariant holds. Returns the number of
/// rows actually inserted.
pub fn insert_notifications(conn: &Connection, events: &[NotificationEvent]) -> Result<usize> {
    let mut inserted = 0;
    for e in events {
        inserted += conn.execute(
            "INSERT OR IGNORE INTO notifications(user_id, kind, title, message, budget_id, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                e.user_id,
                e.kind.as_str(),
                e.title,
                e.message,
                e.budget_id,
                e.is_read,
                e.created_at
            ],
        )?;
    }
    Ok(inserted)
}

pub fn list_notifications(conn: &Connection, user_id: i64) -> Result<Vec<NotificationEvent>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTIFICATION_COLS} FROM notifications
         WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], map_notification)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_unread_notifications(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<NotificationEvent>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTIFICATION_COLS} FROM notifications
         WHERE user_id = ?1 AND is_read = 0 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], map_notification)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// `Unread -> Read` is the only transition and `Read` is terminal.
pub fn mark_notification_read(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    if n == 0 {
        return Err(Error::not_found("notification", id));
    }
    Ok(())
}
