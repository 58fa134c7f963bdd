// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{AggregateResult, BudgetStatus};
use crate::models::{NotificationEvent, NotificationKind};
use chrono::NaiveDateTime;

/// Derives new notification events from evaluated budget statuses and
/// account-level totals. Returns only events not already represented in
/// `existing`; the caller persists them and owns the `existing` snapshot.
///
/// Dedup policy: budget events are keyed by `(budget_id, kind)` against
/// every supplied event, read or unread, so a budget record announces each
/// kind at most once in its lifetime. Recurring budgets are distinct
/// records and alert afresh each period. Overspending is keyed by calendar
/// day: at most one per user per day.
///
/// Emission order: all `BudgetExceeded` (statuses by ascending budget id),
/// then all `BudgetThreshold`, then `Overspending`.
pub fn derive(
    user_id: i64,
    now: NaiveDateTime,
    statuses: &[BudgetStatus],
    totals: &AggregateResult,
    existing: &[NotificationEvent],
) -> Vec<NotificationEvent> {
    let mut ordered: Vec<&BudgetStatus> = statuses.iter().collect();
    ordered.sort_by_key(|s| s.budget_id);

    let already = |budget_id: i64, kind: NotificationKind| {
        existing
            .iter()
            .any(|e| e.budget_id == Some(budget_id) && e.kind == kind)
    };

    let mut events = Vec::new();

    for status in ordered.iter().filter(|s| s.is_exceeded) {
        if already(status.budget_id, NotificationKind::BudgetExceeded) {
            continue;
        }
        events.push(NotificationEvent {
            id: 0,
            user_id,
            kind: NotificationKind::BudgetExceeded,
            title: "Budget exceeded".into(),
            message: format!(
                "'{}' is over its limit: spent {} ({}% of budget)",
                status.budget_name,
                status.spent_amount,
                status.percentage.round_dp(1)
            ),
            budget_id: Some(status.budget_id),
            is_read: false,
            created_at: now,
        });
    }

    // Exceeded takes precedence: a budget past 100% never also gets a
    // threshold event in the same evaluation.
    for status in ordered
        .iter()
        .filter(|s| s.is_threshold_crossed && !s.is_exceeded)
    {
        if already(status.budget_id, NotificationKind::BudgetThreshold) {
            continue;
        }
        events.push(NotificationEvent {
            id: 0,
            user_id,
            kind: NotificationKind::BudgetThreshold,
            title: "Budget alert".into(),
            message: format!(
                "'{}' reached {}% of its limit (spent {})",
                status.budget_name,
                status.percentage.round_dp(1),
                status.spent_amount
            ),
            budget_id: Some(status.budget_id),
            is_read: false,
            created_at: now,
        });
    }

    if totals.total_expense > totals.total_income {
        let emitted_today = existing.iter().any(|e| {
            e.kind == NotificationKind::Overspending && e.created_at.date() == now.date()
        });
        if !emitted_today {
            let deficit = totals.total_expense - totals.total_income;
            events.push(NotificationEvent {
                id: 0,
                user_id,
                kind: NotificationKind::Overspending,
                title: "Overspending".into(),
                message: format!(
                    "Expenses exceed income by {} this period (spent {}, earned {})",
                    deficit, totals.total_expense, totals.total_income
                ),
                budget_id: None,
                is_read: false,
                created_at: now,
            });
        }
    }

    events
}
