// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure budget evaluation: aggregation over a date window, per-budget
//! status, and notification derivation. Nothing in here touches storage;
//! callers materialize inputs, persist outputs.

pub mod aggregate;
pub mod evaluate;
pub mod notify;

pub use aggregate::aggregate;
pub use evaluate::evaluate;
pub use notify::derive;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Half-open date interval `[start, end)`. A transaction dated exactly at
/// `end` belongs to the next window, never to this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Window { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Per-category expense total, recomputed on every evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category_id: i64,
    pub amount: Decimal,
    pub percentage_of_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub per_category: BTreeMap<i64, CategoryTotal>,
}

impl AggregateResult {
    pub fn net(&self) -> Decimal {
        self.total_income - self.total_expense
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget_id: i64,
    pub budget_name: String,
    pub spent_amount: Decimal,
    pub percentage: Decimal,
    pub is_threshold_crossed: bool,
    pub is_exceeded: bool,
}
