// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendwatch::commands::budgets::evaluate_all;
use spendwatch::engine;
use spendwatch::models::{BudgetPeriod, NotificationKind, TransactionKind};
use spendwatch::store::{self, NewBudget, NewTransaction};
use spendwatch::{cli, commands, db, utils};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seed_budget_with_spend(conn: &Connection, total: i64, spent: i64) -> i64 {
    let budget_id = store::create_budget(
        conn,
        1,
        &NewBudget {
            name: "August".into(),
            total_amount: Decimal::from(total),
            period: BudgetPeriod::Monthly,
            start_date: date("2025-08-01"),
            end_date: date("2025-09-01"),
            alert_threshold_percent: Decimal::from(80),
            categories: vec![],
        },
    )
    .unwrap();
    store::create_transaction(
        conn,
        1,
        &NewTransaction {
            category_id: None,
            amount: Decimal::from(spent),
            kind: TransactionKind::Expense,
            occurred_at: date("2025-08-10"),
            description: None,
            tags: None,
        },
    )
    .unwrap();
    budget_id
}

/// Full cycle: persisted budget and spend -> statuses -> derived events ->
/// persisted notifications, twice, asserting the second run is silent.
#[test]
fn evaluation_cycle_persists_once() {
    let conn = setup();
    seed_budget_with_spend(&conn, 1000, 1200);
    let now = date("2025-08-20").and_hms_opt(9, 0, 0).unwrap();

    let statuses = evaluate_all(&conn, 1, now.date()).unwrap();
    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].is_exceeded);

    let window = utils::month_window(now.date()).unwrap();
    let txs = store::list_transactions(&conn, 1, Some(&window), None).unwrap();
    let totals = engine::aggregate(&txs, &window, None);
    let existing = store::list_notifications(&conn, 1).unwrap();
    let events = engine::derive(1, now, &statuses, &totals, &existing);
    // exceeded budget plus overspending (1200 expense, no income)
    assert_eq!(events.len(), 2);
    assert_eq!(store::insert_notifications(&conn, &events).unwrap(), 2);

    // re-run the whole cycle against the persisted snapshot: no new events
    let statuses = evaluate_all(&conn, 1, now.date()).unwrap();
    let existing = store::list_notifications(&conn, 1).unwrap();
    let events = engine::derive(1, now, &statuses, &totals, &existing);
    assert!(events.is_empty());
}

#[test]
fn reading_an_alert_does_not_resurrect_it() {
    let conn = setup();
    seed_budget_with_spend(&conn, 1000, 900);
    let now = date("2025-08-20").and_hms_opt(9, 0, 0).unwrap();

    let statuses = evaluate_all(&conn, 1, now.date()).unwrap();
    assert!(statuses[0].is_threshold_crossed);
    let totals = engine::AggregateResult {
        total_income: Decimal::from(5000),
        total_expense: Decimal::from(900),
        per_category: Default::default(),
    };
    let events = engine::derive(1, now, &statuses, &totals, &[]);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, NotificationKind::BudgetThreshold);
    store::insert_notifications(&conn, &events).unwrap();

    let id = store::list_unread_notifications(&conn, 1).unwrap()[0].id;
    store::mark_notification_read(&conn, 1, id).unwrap();

    // same status, next day: the read event still holds the dedup slot
    let next = date("2025-08-21").and_hms_opt(9, 0, 0).unwrap();
    let statuses = evaluate_all(&conn, 1, next.date()).unwrap();
    let existing = store::list_notifications(&conn, 1).unwrap();
    let events = engine::derive(1, next, &statuses, &totals, &existing);
    assert!(events.is_empty());
}

#[test]
fn notify_check_command_runs_end_to_end() {
    let conn = setup();
    seed_budget_with_spend(&conn, 1000, 1200);

    let matches = cli::build_cli().get_matches_from([
        "spendwatch",
        "notify",
        "check",
        "--as-of",
        "2025-08-20",
        "--user",
        "1",
    ]);
    if let Some(("notify", sub)) = matches.subcommand() {
        commands::notifications::handle(&conn, sub).unwrap();
    } else {
        panic!("notify command not parsed");
    }

    let unread = store::list_unread_notifications(&conn, 1).unwrap();
    assert_eq!(unread.len(), 2);
    assert!(unread
        .iter()
        .any(|e| e.kind == NotificationKind::BudgetExceeded));
    assert!(unread
        .iter()
        .any(|e| e.kind == NotificationKind::Overspending));
}
