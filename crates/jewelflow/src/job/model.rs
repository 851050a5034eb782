//! The job record and the rules for changing it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::job::kind::{JobKind, Stage};

/// A custom design or repair ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Ticket number, e.g. `C-1001`.
    pub id: String,
    pub kind: JobKind,
    pub customer_name: String,
    pub stage: Stage,
    pub total_price: Decimal,
    pub deposit_amount: Decimal,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
    /// What the piece is ("Engagement ring").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Repairs only ("Resizing", "Prong retip").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Promised completion date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Job {
    /// Remaining unpaid amount. Never negative for a job built through
    /// [`NewJob::into_job`] and changed only through [`Job::advance`] and
    /// [`Job::apply_payment`].
    pub fn balance_due(&self) -> Decimal {
        self.total_price - self.deposit_amount
    }

    pub fn is_paid(&self) -> bool {
        self.balance_due().is_zero()
    }

    pub fn is_completed(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Past its due date and not yet completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.is_completed() {
            return false;
        }
        matches!(self.due_date, Some(due) if due < today)
    }

    /// Waiting at the counter.
    pub fn is_ready_for_pickup(&self) -> bool {
        self.stage == self.kind.pickup_stage()
    }

    /// Moves to the next stage of the kind's sequence.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Stage, StoreError> {
        let next = self
            .kind
            .next_stage(self.stage)
            .ok_or_else(|| StoreError::InvalidTransition {
                id: self.id.clone(),
                stage: self.stage,
            })?;

        self.stage = next;
        self.updated_at = now;
        Ok(next)
    }

    /// Adds `amount` to the deposit.
    pub fn apply_payment(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<(), StoreError> {
        if self.is_completed() {
            return Err(StoreError::InvalidTransition {
                id: self.id.clone(),
                stage: self.stage,
            });
        }
        if amount <= Decimal::ZERO {
            return Err(StoreError::InvalidInput(format!(
                "payment must be positive, got {}",
                amount
            )));
        }

        let new_deposit = self
            .deposit_amount
            .checked_add(amount)
            .ok_or_else(|| StoreError::InvalidInput("payment amount is too large".to_string()))?;
        if new_deposit > self.total_price {
            return Err(StoreError::InvalidInput(format!(
                "payment of {} exceeds balance due of {} on job {}",
                amount,
                self.balance_due(),
                self.id
            )));
        }

        self.deposit_amount = new_deposit;
        self.updated_at = now;
        Ok(())
    }
}

/// Checks the price/deposit pair of a job.
pub fn validate_amounts(total_price: Decimal, deposit_amount: Decimal) -> Result<(), String> {
    if total_price < Decimal::ZERO {
        return Err(format!("total price cannot be negative, got {}", total_price));
    }
    if deposit_amount < Decimal::ZERO {
        return Err(format!(
            "deposit cannot be negative, got {}",
            deposit_amount
        ));
    }
    if deposit_amount > total_price {
        return Err(format!(
            "deposit of {} exceeds total price of {}",
            deposit_amount, total_price
        ));
    }
    Ok(())
}

/// Intake form for a new job.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub kind: JobKind,
    pub customer_name: String,
    pub total_price: Decimal,
    pub deposit_amount: Decimal,
    pub item: Option<String>,
    pub repair_type: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewJob {
    pub fn new(
        kind: JobKind,
        customer_name: impl Into<String>,
        total_price: Decimal,
        deposit_amount: Decimal,
    ) -> Self {
        Self {
            kind,
            customer_name: customer_name.into(),
            total_price,
            deposit_amount,
            item: None,
            repair_type: None,
            assigned_to: None,
            due_date: None,
            notes: None,
        }
    }

    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn repair_type(mut self, repair_type: impl Into<String>) -> Self {
        self.repair_type = Some(repair_type.into());
        self
    }

    pub fn assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validates the form and builds the job at its kind's initial stage.
    pub fn into_job(self, id: String, now: DateTime<Utc>) -> Result<Job, StoreError> {
        let customer_name = self.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(StoreError::InvalidInput(
                "customer name is required".to_string(),
            ));
        }
        validate_amounts(self.total_price, self.deposit_amount).map_err(StoreError::InvalidInput)?;

        let repair_type = non_blank(self.repair_type);
        if repair_type.is_some() && self.kind != JobKind::Repair {
            return Err(StoreError::InvalidInput(
                "repair type only applies to repair jobs".to_string(),
            ));
        }

        Ok(Job {
            id,
            kind: self.kind,
            customer_name,
            stage: self.kind.initial_stage(),
            total_price: self.total_price,
            deposit_amount: self.deposit_amount,
            created_at: now,
            updated_at: now,
            item: non_blank(self.item),
            repair_type,
            assigned_to: non_blank(self.assigned_to),
            due_date: self.due_date,
            notes: non_blank(self.notes),
        })
    }
}

/// Trims optional text, collapsing blank values to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
