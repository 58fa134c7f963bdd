// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Owner sentinel for system-provided default categories: readable by every
/// user, writable by none.
pub const DEFAULT_OWNER: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Quarterly => "quarterly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(BudgetPeriod::Monthly),
            "quarterly" => Some(BudgetPeriod::Quarterly),
            "yearly" => Some(BudgetPeriod::Yearly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
}

impl Category {
    pub fn is_default(&self) -> bool {
        self.user_id == DEFAULT_OWNER
    }
}

/// A single money movement. `amount` is always positive; direction is
/// carried by `kind`, never by sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub occurred_at: NaiveDate,
    pub description: Option<String>,
    pub tags: Option<String>,
}

/// A spending ceiling over one evaluation window. Recurring budgets are
/// distinct records, not a recurrence rule. `categories` empty means the
/// budget covers all expense spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub total_amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold_percent: Decimal,
    pub is_active: bool,
    pub categories: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotificationKind {
    BudgetThreshold,
    BudgetExceeded,
    Overspending,
    Suggestion,
    Achievement,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BudgetThreshold => "budget_threshold",
            NotificationKind::BudgetExceeded => "budget_exceeded",
            NotificationKind::Overspending => "overspending",
            NotificationKind::Suggestion => "suggestion",
            NotificationKind::Achievement => "achievement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "budget_threshold" => Some(NotificationKind::BudgetThreshold),
            "budget_exceeded" => Some(NotificationKind::BudgetExceeded),
            "overspending" => Some(NotificationKind::Overspending),
            "suggestion" => Some(NotificationKind::Suggestion),
            "achievement" => Some(NotificationKind::Achievement),
            _ => None,
        }
    }
}

/// Content is immutable after creation; the only state transition is
/// `is_read: false -> true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub budget_id: Option<i64>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}
