// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{AggregateResult, CategoryTotal, Window};
use crate::models::{Transaction, TransactionKind};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Sums income, expense, and per-category expense totals over `window`.
///
/// The input need not be pre-filtered: anything dated outside the half-open
/// window, or outside `category_filter` when one is given, is skipped here.
/// Transactions without a category count toward `total_expense` but appear
/// in no `per_category` bucket (unless a filter is set, in which case they
/// are skipped entirely).
pub fn aggregate(
    transactions: &[Transaction],
    window: &Window,
    category_filter: Option<&BTreeSet<i64>>,
) -> AggregateResult {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut per_category: BTreeMap<i64, Decimal> = BTreeMap::new();

    for tx in transactions {
        if !window.contains(tx.occurred_at) {
            continue;
        }
        if let Some(filter) = category_filter {
            match tx.category_id {
                Some(cid) if filter.contains(&cid) => {}
                _ => continue,
            }
        }
        match tx.kind {
            TransactionKind::Income => total_income += tx.amount,
            TransactionKind::Expense => {
                total_expense += tx.amount;
                if let Some(cid) = tx.category_id {
                    *per_category.entry(cid).or_insert(Decimal::ZERO) += tx.amount;
                }
            }
        }
    }

    let per_category = per_category
        .into_iter()
        .map(|(category_id, amount)| {
            // 0 on an empty expense total, never NaN/Infinity
            let percentage_of_total = if total_expense.is_zero() {
                Decimal::ZERO
            } else {
                amount / total_expense * HUNDRED
            };
            (
                category_id,
                CategoryTotal {
                    category_id,
                    amount,
                    percentage_of_total,
                },
            )
        })
        .collect();

    AggregateResult {
        total_income,
        total_expense,
        per_category,
    }
}
