// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::budgets::evaluate_all;
use crate::engine;
use crate::store;
use crate::utils::{maybe_print_json, month_window, parse_date, pretty_table, resolve_user};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("check", sub)) => check(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("read", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            store::mark_notification_read(conn, user, id)?;
            println!("Marked notification {} as read", id);
        }
        _ => {}
    }
    Ok(())
}

/// One evaluation cycle: aggregate -> evaluate -> derive -> persist.
/// Overspending is judged over the calendar month containing `as_of`.
fn check(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let now = match sub.get_one::<String>("as-of") {
        Some(s) => parse_date(s)?
            .and_hms_opt(0, 0, 0)
            .context("Invalid time of day")?,
        None => chrono::Local::now().naive_local(),
    };

    let statuses = evaluate_all(conn, user, now.date())?;
    let window = month_window(now.date())?;
    let txs = store::list_transactions(conn, user, Some(&window), None)?;
    let totals = engine::aggregate(&txs, &window, None);
    let existing = store::list_notifications(conn, user)?;

    let events = engine::derive(user, now, &statuses, &totals, &existing);
    let inserted = store::insert_notifications(conn, &events)?;
    if inserted == 0 {
        println!("No new notifications");
    } else {
        println!("{} new notification(s):", inserted);
        for e in &events {
            println!("  [{}] {}: {}", e.kind.as_str(), e.title, e.message);
        }
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let events = if sub.get_flag("unread") {
        store::list_unread_notifications(conn, user)?
    } else {
        store::list_notifications(conn, user)?
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &events)? {
        let rows = events
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    e.kind.as_str().to_string(),
                    if e.is_read { "read" } else { "unread" }.to_string(),
                    e.message.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Created", "Kind", "State", "Message"], rows)
        );
    }
    Ok(())
}
