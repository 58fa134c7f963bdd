// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwatch::engine::{aggregate, Window};
use spendwatch::models::{Transaction, TransactionKind};
use std::collections::BTreeSet;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(id: i64, amount: i64, kind: TransactionKind, day: &str, category: Option<i64>) -> Transaction {
    Transaction {
        id,
        user_id: 1,
        category_id: category,
        amount: Decimal::from(amount),
        kind,
        occurred_at: date(day),
        description: None,
        tags: None,
    }
}

fn august() -> Window {
    Window::new(date("2025-08-01"), date("2025-09-01"))
}

#[test]
fn totals_split_by_kind() {
    let txs = vec![
        tx(1, 5000, TransactionKind::Income, "2025-08-05", None),
        tx(2, 1200, TransactionKind::Expense, "2025-08-10", Some(1)),
        tx(3, 800, TransactionKind::Expense, "2025-08-12", Some(2)),
    ];
    let agg = aggregate(&txs, &august(), None);
    assert_eq!(agg.total_income, Decimal::from(5000));
    assert_eq!(agg.total_expense, Decimal::from(2000));
    assert_eq!(agg.net(), Decimal::from(3000));
}

#[test]
fn per_category_sums_match_total_expense() {
    // every expense carries a category, so the bucket sum equals the total
    let txs = vec![
        tx(1, 300, TransactionKind::Expense, "2025-08-03", Some(1)),
        tx(2, 200, TransactionKind::Expense, "2025-08-04", Some(1)),
        tx(3, 500, TransactionKind::Expense, "2025-08-05", Some(2)),
    ];
    let agg = aggregate(&txs, &august(), None);
    let bucket_sum: Decimal = agg.per_category.values().map(|ct| ct.amount).sum();
    assert_eq!(bucket_sum, agg.total_expense);
    assert_eq!(agg.per_category[&1].amount, Decimal::from(500));
    assert_eq!(agg.per_category[&1].percentage_of_total, Decimal::from(50));
    assert_eq!(agg.per_category[&2].percentage_of_total, Decimal::from(50));
}

#[test]
fn window_is_half_open() {
    let txs = vec![
        tx(1, 100, TransactionKind::Expense, "2025-08-01", Some(1)), // at start: in
        tx(2, 100, TransactionKind::Expense, "2025-08-31", Some(1)), // last day: in
        tx(3, 100, TransactionKind::Expense, "2025-09-01", Some(1)), // at end: out
        tx(4, 100, TransactionKind::Expense, "2025-07-31", Some(1)), // before: out
    ];
    let agg = aggregate(&txs, &august(), None);
    assert_eq!(agg.total_expense, Decimal::from(200));
}

#[test]
fn zero_expense_total_yields_zero_percentages() {
    // no divide-by-zero: income-only input leaves every percentage at 0
    let txs = vec![tx(1, 1000, TransactionKind::Income, "2025-08-05", Some(1))];
    let agg = aggregate(&txs, &august(), None);
    assert_eq!(agg.total_expense, Decimal::ZERO);
    assert!(agg.per_category.is_empty());

    let empty = aggregate(&[], &august(), None);
    assert_eq!(empty.total_income, Decimal::ZERO);
    assert_eq!(empty.total_expense, Decimal::ZERO);
}

#[test]
fn uncategorized_expense_counts_in_total_but_no_bucket() {
    let txs = vec![
        tx(1, 400, TransactionKind::Expense, "2025-08-05", None),
        tx(2, 600, TransactionKind::Expense, "2025-08-06", Some(3)),
    ];
    let agg = aggregate(&txs, &august(), None);
    assert_eq!(agg.total_expense, Decimal::from(1000));
    assert_eq!(agg.per_category.len(), 1);
    assert_eq!(agg.per_category[&3].percentage_of_total, Decimal::from(60));
}

#[test]
fn category_filter_restricts_all_totals() {
    let txs = vec![
        tx(1, 100, TransactionKind::Expense, "2025-08-05", Some(1)),
        tx(2, 200, TransactionKind::Expense, "2025-08-06", Some(2)),
        tx(3, 900, TransactionKind::Income, "2025-08-07", Some(1)),
        tx(4, 50, TransactionKind::Expense, "2025-08-08", None),
    ];
    let filter = BTreeSet::from([1]);
    let agg = aggregate(&txs, &august(), Some(&filter));
    assert_eq!(agg.total_expense, Decimal::from(100));
    assert_eq!(agg.total_income, Decimal::from(900));
    assert!(!agg.per_category.contains_key(&2));
}
