// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{self, Window};
use crate::store;
use crate::utils::{fmt_percent, maybe_print_json, parse_date, pretty_table, resolve_user};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let window = Window::new(
        parse_date(sub.get_one::<String>("from").unwrap())?,
        parse_date(sub.get_one::<String>("to").unwrap())?,
    );
    let txs = store::list_transactions(conn, user, Some(&window), None)?;
    let agg = engine::aggregate(&txs, &window, None);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &agg)? {
        return Ok(());
    }

    let names: HashMap<i64, String> = store::list_categories(conn, user)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    println!(
        "Income: {}   Expense: {}   Net: {}",
        agg.total_income,
        agg.total_expense,
        agg.net()
    );
    let rows = agg
        .per_category
        .values()
        .map(|ct| {
            vec![
                names
                    .get(&ct.category_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", ct.category_id)),
                ct.amount.to_string(),
                fmt_percent(&ct.percentage_of_total),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Share of expenses"], rows)
    );
    Ok(())
}
