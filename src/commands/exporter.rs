// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! File export of aggregator output. Raw decimal values only: currency and
//! locale formatting belong to whatever consumes the files.

use crate::engine::{self, Window};
use crate::store;
use crate::utils::{parse_date, resolve_user};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => export_summary(conn, sub),
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let window = Window::new(
        parse_date(sub.get_one::<String>("from").unwrap())?,
        parse_date(sub.get_one::<String>("to").unwrap())?,
    );
    let txs = store::list_transactions(conn, user, Some(&window), None)?;
    let agg = engine::aggregate(&txs, &window, None);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["category_id", "amount", "percentage_of_total"])?;
            for ct in agg.per_category.values() {
                wtr.write_record([
                    ct.category_id.to_string(),
                    ct.amount.to_string(),
                    ct.percentage_of_total.to_string(),
                ])?;
            }
            wtr.write_record([
                "total_income".to_string(),
                agg.total_income.to_string(),
                String::new(),
            ])?;
            wtr.write_record([
                "total_expense".to_string(),
                agg.total_expense.to_string(),
                String::new(),
            ])?;
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&agg)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported summary to {}", out);
    Ok(())
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let txs = store::list_transactions(conn, user, None, None)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "kind", "amount", "category_id", "description", "tags"])?;
            for t in &txs {
                wtr.write_record([
                    t.occurred_at.to_string(),
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    t.category_id.map(|c| c.to_string()).unwrap_or_default(),
                    t.description.clone().unwrap_or_default(),
                    t.tags.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.occurred_at,
                        "kind": t.kind,
                        "amount": t.amount,
                        "category_id": t.category_id,
                        "description": t.description,
                        "tags": t.tags,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
