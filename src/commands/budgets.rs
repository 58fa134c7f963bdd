// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{self, BudgetStatus, Window};
use crate::store::{self, NewBudget};
use crate::utils::{
    fmt_percent, maybe_print_json, parse_date, parse_decimal, parse_period, pretty_table,
    resolve_user,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("deactivate", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            store::deactivate_budget(conn, user, id)?;
            println!("Deactivated budget {}", id);
        }
        Some(("progress", sub)) => progress(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let mut categories = Vec::new();
    if let Some(names) = sub.get_many::<String>("category") {
        for name in names {
            categories.push(store::find_category(conn, user, name.trim())?.id);
        }
    }
    let budget = NewBudget {
        name: sub.get_one::<String>("name").unwrap().clone(),
        total_amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        period: parse_period(sub.get_one::<String>("period").unwrap())?,
        start_date: parse_date(sub.get_one::<String>("start").unwrap())?,
        end_date: parse_date(sub.get_one::<String>("end").unwrap())?,
        alert_threshold_percent: parse_decimal(sub.get_one::<String>("threshold").unwrap())?,
        categories,
    };
    let id = store::create_budget(conn, user, &budget)?;
    println!("Added budget '{}' (id {})", budget.name.trim(), id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let budgets = store::list_active_budgets(conn, user)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        let rows = budgets
            .iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    b.name.clone(),
                    b.total_amount.to_string(),
                    b.period.as_str().to_string(),
                    format!("{}..{}", b.start_date, b.end_date),
                    fmt_percent(&b.alert_threshold_percent),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Amount", "Period", "Window", "Threshold"],
                rows
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let name = sub.get_one::<String>("name").map(|s| s.as_str());
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let threshold = sub
        .get_one::<String>("threshold")
        .map(|s| parse_decimal(s))
        .transpose()?;
    if name.is_none() && amount.is_none() && threshold.is_none() {
        anyhow::bail!("nothing to change: pass --name, --amount and/or --threshold");
    }
    store::update_budget(conn, user, id, name, amount, threshold)?;
    println!("Updated budget {}", id);
    Ok(())
}

/// Evaluates every active budget against its own window. This is the
/// `budget progress` read: recomputed on demand, never cached.
pub fn evaluate_all(conn: &Connection, user: i64, as_of: NaiveDate) -> Result<Vec<BudgetStatus>> {
    let budgets = store::list_active_budgets(conn, user)?;
    let mut statuses = Vec::with_capacity(budgets.len());
    for budget in &budgets {
        let window = Window::new(budget.start_date, budget.end_date);
        let txs = store::list_transactions(conn, user, Some(&window), None)?;
        let agg = engine::aggregate(&txs, &window, None);
        statuses.push(engine::evaluate(budget, &agg, as_of));
    }
    Ok(statuses)
}

fn progress(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let as_of = match sub.get_one::<String>("as-of") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let statuses = evaluate_all(conn, user, as_of)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &statuses)? {
        let rows = statuses
            .iter()
            .map(|s| {
                let state = if s.is_exceeded {
                    "EXCEEDED"
                } else if s.is_threshold_crossed {
                    "alert"
                } else {
                    "ok"
                };
                vec![
                    s.budget_id.to_string(),
                    s.budget_name.clone(),
                    s.spent_amount.to_string(),
                    fmt_percent(&s.percentage),
                    state.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Budget", "Spent", "Used", "State"], rows)
        );
    }
    Ok(())
}
