//! Payables and receivables.
//!
//! Amounts are integer cents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sisprof_core::serde::empty_string_as_none;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{PayableId, ReceivableId, StudentId};

text_enum! {
    pub enum PayableCategory {
        Payroll => "payroll",
        Water => "water",
        Electricity => "electricity",
        Internet => "internet",
        Maintenance => "maintenance",
        Other => "other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payable {
    pub id: PayableId,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub category: PayableCategory,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub paid: bool,
    pub note: Option<String>,
}

impl Payable {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.paid && self.due_date < today
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePayableDto {
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    pub category: PayableCategory,
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePayableDto {
    #[validate(length(min = 1, max = 200))]
    pub description: Option<String>,
    pub category: Option<PayableCategory>,
    #[validate(range(min = 1))]
    pub amount_cents: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Receivable {
    pub id: ReceivableId,
    pub student_id: StudentId,
    pub description: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub received_date: Option<NaiveDate>,
    pub received: bool,
    pub note: Option<String>,
}

impl Receivable {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.received && self.due_date < today
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReceivableDto {
    pub student_id: StudentId,
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReceivableDto {
    #[validate(length(min = 1, max = 200))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub amount_cents: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Marks a payable paid or a receivable received.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SettleDto {
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LedgerFilterParams {
    /// Paid payables / received receivables
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub settled: Option<bool>,
    /// Only open items past their due date
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub overdue: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<PayableCategory>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<StudentId>,
}

impl LedgerFilterParams {
    pub fn matches_payable(&self, payable: &Payable, today: NaiveDate) -> bool {
        self.settled.is_none_or(|settled| payable.paid == settled)
            && self
                .overdue
                .is_none_or(|overdue| payable.is_overdue(today) == overdue)
            && self.category.is_none_or(|category| payable.category == category)
    }

    pub fn matches_receivable(&self, receivable: &Receivable, today: NaiveDate) -> bool {
        self.settled
            .is_none_or(|settled| receivable.received == settled)
            && self
                .overdue
                .is_none_or(|overdue| receivable.is_overdue(today) == overdue)
            && self.student_id.is_none_or(|id| receivable.student_id == id)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LedgerSummary {
    pub payables_open_cents: i64,
    pub payables_paid_cents: i64,
    pub payables_overdue: usize,
    pub receivables_open_cents: i64,
    pub receivables_received_cents: i64,
    pub receivables_overdue: usize,
    /// Received minus paid.
    pub balance_cents: i64,
}

impl LedgerSummary {
    pub fn compute(payables: &[Payable], receivables: &[Receivable], today: NaiveDate) -> Self {
        let mut summary = LedgerSummary::default();

        for payable in payables {
            if payable.paid {
                summary.payables_paid_cents += payable.amount_cents;
            } else {
                summary.payables_open_cents += payable.amount_cents;
            }
            if payable.is_overdue(today) {
                summary.payables_overdue += 1;
            }
        }

        for receivable in receivables {
            if receivable.received {
                summary.receivables_received_cents += receivable.amount_cents;
            } else {
                summary.receivables_open_cents += receivable.amount_cents;
            }
            if receivable.is_overdue(today) {
                summary.receivables_overdue += 1;
            }
        }

        summary.balance_cents = summary.receivables_received_cents - summary.payables_paid_cents;
        summary
    }
}
