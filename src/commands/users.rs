// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::DEFAULT_OWNER;
use crate::utils::{get_active_user, set_active_user};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("use", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if id == DEFAULT_OWNER {
                anyhow::bail!("user id {} is reserved for shared defaults", DEFAULT_OWNER);
            }
            set_active_user(conn, id)?;
            println!("Active user is now {}", id);
        }
        Some(("show", _)) => {
            println!("Active user: {}", get_active_user(conn)?);
        }
        _ => {}
    }
    Ok(())
}
