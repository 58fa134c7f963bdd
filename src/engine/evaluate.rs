// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{AggregateResult, BudgetStatus};
use crate::models::Budget;
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Evaluates one budget against an aggregate computed over its own window.
///
/// Total over valid inputs: budgets with `end_date <= start_date` are
/// rejected at the creation boundary and never reach this function. A
/// budget whose window does not contain `as_of` evaluates to zero spend
/// with both flags down, so stale budgets never feed alert derivation.
pub fn evaluate(budget: &Budget, agg: &AggregateResult, as_of: chrono::NaiveDate) -> BudgetStatus {
    let in_window = as_of >= budget.start_date && as_of < budget.end_date;
    if !in_window {
        return BudgetStatus {
            budget_id: budget.id,
            budget_name: budget.name.clone(),
            spent_amount: Decimal::ZERO,
            percentage: Decimal::ZERO,
            is_threshold_crossed: false,
            is_exceeded: false,
        };
    }

    let spent_amount = if budget.categories.is_empty() {
        agg.total_expense
    } else {
        budget
            .categories
            .iter()
            .filter_map(|cid| agg.per_category.get(cid))
            .map(|ct| ct.amount)
            .sum()
    };

    // A zero-amount budget cannot yield a percentage; any spend against it
    // is surfaced as exceeded rather than producing NaN.
    let (percentage, is_threshold_crossed, is_exceeded) = if budget.total_amount.is_zero() {
        (Decimal::ZERO, false, spent_amount > Decimal::ZERO)
    } else {
        let pct = spent_amount / budget.total_amount * HUNDRED;
        let exceeded = pct >= HUNDRED;
        let crossed = pct >= budget.alert_threshold_percent && !exceeded;
        (pct, crossed, exceeded)
    };

    BudgetStatus {
        budget_id: budget.id,
        budget_name: budget.name.clone(),
        spent_amount,
        percentage,
        is_threshold_crossed,
        is_exceeded,
    }
}
