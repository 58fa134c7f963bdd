// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{maybe_print_json, pretty_table, resolve_user};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = resolve_user(conn, sub)?;
            let name = sub.get_one::<String>("name").unwrap();
            let id = store::create_category(conn, user, name)?;
            println!("Added category '{}' (id {})", name.trim(), id);
        }
        Some(("list", sub)) => {
            let user = resolve_user(conn, sub)?;
            let cats = store::list_categories(conn, user)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let rows = cats
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            if c.is_default() { "default" } else { "own" }.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Category", "Owner"], rows));
            }
        }
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            store::delete_category(conn, user, id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
