// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::engine::Window;
use crate::models::{BudgetPeriod, TransactionKind};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_kind(s: &str) -> Result<TransactionKind> {
    TransactionKind::parse(s)
        .with_context(|| format!("Invalid kind '{}', expected income|expense", s))
}

pub fn parse_period(s: &str) -> Result<BudgetPeriod> {
    BudgetPeriod::parse(s)
        .with_context(|| format!("Invalid period '{}', expected monthly|quarterly|yearly", s))
}

/// Percentages are exact decimals internally; one decimal place is a
/// display concern only.
pub fn fmt_percent(p: &Decimal) -> String {
    format!("{}%", p.round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Calendar month containing `date`, as a half-open window.
pub fn month_window(date: NaiveDate) -> Result<Window> {
    let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .context("Invalid month start")?;
    let end = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .context("Invalid month end")?;
    Ok(Window::new(start, end))
}

// Active user settings: the CLI analog of an authenticated caller. Every
// command scopes its queries by this id (or an explicit --user override).
pub fn get_active_user(conn: &Connection) -> Result<i64> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='active_user'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        Some(s) => s
            .parse::<i64>()
            .with_context(|| format!("Invalid active_user '{}'", s)),
        None => Ok(1),
    }
}

pub fn set_active_user(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('active_user', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![user_id.to_string()],
    )?;
    Ok(())
}

/// User scope for a command: explicit `--user` wins, else the setting.
pub fn resolve_user(conn: &Connection, m: &clap::ArgMatches) -> Result<i64> {
    if let Some(u) = m.get_one::<i64>("user") {
        return Ok(*u);
    }
    get_active_user(conn)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
