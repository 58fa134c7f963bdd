// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendwatch::engine::Window;
use spendwatch::error::Error;
use spendwatch::models::{BudgetPeriod, NotificationEvent, NotificationKind, TransactionKind};
use spendwatch::store::{self, NewBudget, NewTransaction};
use spendwatch::{db, utils};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_tx(amount: i64, day: &str, category_id: Option<i64>) -> NewTransaction {
    NewTransaction {
        category_id,
        amount: Decimal::from(amount),
        kind: TransactionKind::Expense,
        occurred_at: date(day),
        description: None,
        tags: None,
    }
}

fn new_budget(start: &str, end: &str, total: i64, threshold: i64) -> NewBudget {
    NewBudget {
        name: "Test budget".into(),
        total_amount: Decimal::from(total),
        period: BudgetPeriod::Monthly,
        start_date: date(start),
        end_date: date(end),
        alert_threshold_percent: Decimal::from(threshold),
        categories: vec![],
    }
}

fn unread_event(user_id: i64, budget_id: i64, day: &str) -> NotificationEvent {
    NotificationEvent {
        id: 0,
        user_id,
        kind: NotificationKind::BudgetExceeded,
        title: "Budget exceeded".into(),
        message: "over".into(),
        budget_id: Some(budget_id),
        is_read: false,
        created_at: date(day).and_hms_opt(9, 0, 0).unwrap(),
    }
}

#[test]
fn non_positive_amounts_are_rejected_at_creation() {
    let conn = setup();
    let err = store::create_transaction(&conn, 1, &new_tx(0, "2025-08-10", None)).unwrap_err();
    assert!(matches!(err, Error::Validation { field: "amount", .. }));

    let err = store::create_transaction(&conn, 1, &new_tx(-5, "2025-08-10", None)).unwrap_err();
    assert!(matches!(err, Error::Validation { field: "amount", .. }));
}

#[test]
fn budget_window_must_be_forward() {
    let conn = setup();
    let err = store::create_budget(&conn, 1, &new_budget("2025-08-01", "2025-08-01", 100, 80))
        .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "end_date", .. }));

    let err = store::create_budget(&conn, 1, &new_budget("2025-09-01", "2025-08-01", 100, 80))
        .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "end_date", .. }));
}

#[test]
fn threshold_outside_bounds_is_rejected() {
    let conn = setup();
    let err = store::create_budget(&conn, 1, &new_budget("2025-08-01", "2025-09-01", 100, 101))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation {
            field: "alert_threshold_percent",
            ..
        }
    ));

    // zero-amount budgets are allowed; the evaluator copes with them
    store::create_budget(&conn, 1, &new_budget("2025-08-01", "2025-09-01", 0, 80)).unwrap();
}

#[test]
fn default_categories_are_shared_and_read_only() {
    let conn = setup();
    let cats = store::list_categories(&conn, 1).unwrap();
    let groceries = cats
        .iter()
        .find(|c| c.name == "Groceries")
        .expect("seeded default");
    assert!(groceries.is_default());

    // visible to another user too
    assert!(store::list_categories(&conn, 2)
        .unwrap()
        .iter()
        .any(|c| c.id == groceries.id));

    // but not deletable by anyone
    let err = store::delete_category(&conn, 1, groceries.id).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn reads_are_scoped_by_user() {
    let conn = setup();
    store::create_transaction(&conn, 1, &new_tx(100, "2025-08-10", None)).unwrap();
    let own = store::create_category(&conn, 1, "Hobbies").unwrap();

    assert_eq!(store::list_transactions(&conn, 2, None, None).unwrap().len(), 0);
    assert!(!store::list_categories(&conn, 2)
        .unwrap()
        .iter()
        .any(|c| c.id == own));

    let err = store::delete_transaction(&conn, 2, 1).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn window_filter_is_half_open_in_sql() {
    let conn = setup();
    for day in ["2025-07-31", "2025-08-01", "2025-08-31", "2025-09-01"] {
        store::create_transaction(&conn, 1, &new_tx(10, day, None)).unwrap();
    }
    let window = Window::new(date("2025-08-01"), date("2025-09-01"));
    let txs = store::list_transactions(&conn, 1, Some(&window), None).unwrap();
    let days: Vec<String> = txs.iter().map(|t| t.occurred_at.to_string()).collect();
    assert_eq!(days, vec!["2025-08-01", "2025-08-31"]);
}

#[test]
fn unread_unique_index_swallows_duplicate_inserts() {
    let conn = setup();
    let budget_id =
        store::create_budget(&conn, 1, &new_budget("2025-08-01", "2025-09-01", 100, 80)).unwrap();

    let first = store::insert_notifications(&conn, &[unread_event(1, budget_id, "2025-08-20")])
        .unwrap();
    assert_eq!(first, 1);

    // a racing second evaluation produces the same event; the insert is ignored
    let second = store::insert_notifications(&conn, &[unread_event(1, budget_id, "2025-08-20")])
        .unwrap();
    assert_eq!(second, 0);
    assert_eq!(store::list_unread_notifications(&conn, 1).unwrap().len(), 1);

    // once read, the slot frees up for a genuinely new unread event
    let id = store::list_unread_notifications(&conn, 1).unwrap()[0].id;
    store::mark_notification_read(&conn, 1, id).unwrap();
    let third = store::insert_notifications(&conn, &[unread_event(1, budget_id, "2025-08-21")])
        .unwrap();
    assert_eq!(third, 1);
}

#[test]
fn mark_read_is_scoped_and_terminal() {
    let conn = setup();
    let budget_id =
        store::create_budget(&conn, 1, &new_budget("2025-08-01", "2025-09-01", 100, 80)).unwrap();
    store::insert_notifications(&conn, &[unread_event(1, budget_id, "2025-08-20")]).unwrap();
    let id = store::list_unread_notifications(&conn, 1).unwrap()[0].id;

    let err = store::mark_notification_read(&conn, 2, id).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    store::mark_notification_read(&conn, 1, id).unwrap();
    assert!(store::list_unread_notifications(&conn, 1).unwrap().is_empty());

    // marking again is a no-op state-wise but still finds the row
    store::mark_notification_read(&conn, 1, id).unwrap();
    let all = store::list_notifications(&conn, 1).unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].is_read);

    let err = store::mark_notification_read(&conn, 1, 9999).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn active_user_setting_round_trips() {
    let conn = setup();
    assert_eq!(utils::get_active_user(&conn).unwrap(), 1);
    utils::set_active_user(&conn, 42).unwrap();
    assert_eq!(utils::get_active_user(&conn).unwrap(), 42);
}

#[test]
fn deactivated_budgets_drop_out_of_evaluation() {
    let conn = setup();
    let id =
        store::create_budget(&conn, 1, &new_budget("2025-08-01", "2025-09-01", 100, 80)).unwrap();
    assert_eq!(store::list_active_budgets(&conn, 1).unwrap().len(), 1);
    store::deactivate_budget(&conn, 1, id).unwrap();
    assert!(store::list_active_budgets(&conn, 1).unwrap().is_empty());
    // the record survives for history
    assert!(!store::get_budget(&conn, 1, id).unwrap().is_active);
}
