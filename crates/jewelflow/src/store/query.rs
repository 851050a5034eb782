//! Filters for listing jobs.

use chrono::NaiveDate;

use crate::job::{Job, JobKind, Stage};

/// Payment state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaidFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

/// Overdue state filter, evaluated against the given date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverdueFilter {
    #[default]
    All,
    Only(NaiveDate),
    Not(NaiveDate),
}

/// Query parameters for job listing. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobQuery {
    pub kind: Option<JobKind>,
    /// Matches jobs in any of these stages.
    pub stages: Vec<Stage>,
    pub paid: PaidFilter,
    pub overdue: OverdueFilter,
    pub assigned_to: Option<String>,
    /// Case-insensitive substring of id, customer, item or repair type.
    pub search: Option<String>,
}

impl JobQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: JobKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn paid(mut self, paid: PaidFilter) -> Self {
        self.paid = paid;
        self
    }

    pub fn overdue(mut self, overdue: OverdueFilter) -> Self {
        self.overdue = overdue;
        self
    }

    pub fn assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn matches(&self, job: &Job) -> bool {
        if let Some(kind) = self.kind {
            if job.kind != kind {
                return false;
            }
        }

        if !self.stages.is_empty() && !self.stages.contains(&job.stage) {
            return false;
        }

        let paid_ok = match self.paid {
            PaidFilter::All => true,
            PaidFilter::Paid => job.is_paid(),
            PaidFilter::Unpaid => !job.is_paid(),
        };
        if !paid_ok {
            return false;
        }

        let overdue_ok = match self.overdue {
            OverdueFilter::All => true,
            OverdueFilter::Only(today) => job.is_overdue(today),
            OverdueFilter::Not(today) => !job.is_overdue(today),
        };
        if !overdue_ok {
            return false;
        }

        if let Some(ref assignee) = self.assigned_to {
            if job.assigned_to.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => matches_search(job, &text.to_lowercase()),
        }
    }
}

fn matches_search(job: &Job, needle: &str) -> bool {
    let fields = [
        Some(job.id.as_str()),
        Some(job.customer_name.as_str()),
        job.item.as_deref(),
        job.repair_type.as_deref(),
    ];

    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}
