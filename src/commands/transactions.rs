// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::Window;
use crate::store::{self, NewTransaction};
use crate::utils::{
    maybe_print_json, parse_date, parse_decimal, parse_kind, pretty_table, resolve_user,
};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::BTreeSet;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            store::delete_transaction(conn, user, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let occurred_at = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => Some(store::find_category(conn, user, name.trim())?.id),
        None => None,
    };
    let tx = NewTransaction {
        category_id,
        amount,
        kind,
        occurred_at,
        description: sub.get_one::<String>("description").cloned(),
        tags: sub.get_one::<String>("tags").cloned(),
    };
    let id = store::create_transaction(conn, user, &tx)?;
    println!(
        "Recorded {} {} on {} (id {})",
        kind.as_str(),
        amount,
        occurred_at,
        id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let window = match (
        sub.get_one::<String>("from"),
        sub.get_one::<String>("to"),
    ) {
        (Some(from), Some(to)) => Some(Window::new(parse_date(from)?, parse_date(to)?)),
        (None, None) => None,
        _ => anyhow::bail!("--from and --to must be given together"),
    };
    let filter = match sub.get_one::<String>("category") {
        Some(name) => {
            let cat = store::find_category(conn, user, name.trim())?;
            Some(BTreeSet::from([cat.id]))
        }
        None => None,
    };
    let txs = store::list_transactions(conn, user, window.as_ref(), filter.as_ref())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &txs)? {
        let rows = txs
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.occurred_at.to_string(),
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    t.category_id.map(|c| c.to_string()).unwrap_or_default(),
                    t.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Kind", "Amount", "Category", "Description"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let description = sub.get_one::<String>("description").map(|s| s.as_str());
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => Some(store::find_category(conn, user, name.trim())?.id),
        None => None,
    };
    if description.is_none() && category_id.is_none() {
        anyhow::bail!("nothing to change: pass --description and/or --category");
    }
    store::update_transaction(conn, user, id, description, category_id)?;
    println!("Updated transaction {}", id);
    Ok(())
}
