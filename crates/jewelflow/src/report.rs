//! Front-desk reports over a snapshot of jobs.
//!
//! All functions are pure: they take whatever [`crate::store::JobStore::query`]
//! returned and never touch the store.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::job::{Job, JobKind, Stage};

/// Label used for jobs nobody is assigned to.
pub const UNASSIGNED: &str = "Unassigned";

/// Headline numbers for a set of jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_jobs: usize,
    pub open_jobs: usize,
    pub completed_jobs: usize,
    pub overdue_jobs: usize,
    pub ready_unpaid_jobs: usize,
    /// Sum of total prices.
    pub listed_revenue: Decimal,
    /// Sum of deposits.
    pub collected: Decimal,
    /// Sum of balances due.
    pub outstanding: Decimal,
}

/// Number of jobs sitting in one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: Stage,
    pub count: usize,
}

/// Open jobs held by one assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeLoad {
    pub assignee: String,
    pub open_jobs: usize,
}

/// Money totals saturate at [`Decimal::MAX`] instead of overflowing.
pub fn summary(jobs: &[Job], today: NaiveDate) -> Summary {
    let mut summary = Summary {
        total_jobs: jobs.len(),
        open_jobs: 0,
        completed_jobs: 0,
        overdue_jobs: 0,
        ready_unpaid_jobs: 0,
        listed_revenue: Decimal::ZERO,
        collected: Decimal::ZERO,
        outstanding: Decimal::ZERO,
    };

    for job in jobs {
        if job.is_completed() {
            summary.completed_jobs += 1;
        } else {
            summary.open_jobs += 1;
        }
        if job.is_overdue(today) {
            summary.overdue_jobs += 1;
        }
        if job.is_ready_for_pickup() && !job.is_paid() {
            summary.ready_unpaid_jobs += 1;
        }
        summary.listed_revenue = summary.listed_revenue.saturating_add(job.total_price);
        summary.collected = summary.collected.saturating_add(job.deposit_amount);
        summary.outstanding = summary.outstanding.saturating_add(job.balance_due());
    }

    summary
}

/// Per-stage counts for one kind, in workflow order, including empty stages.
/// Jobs of other kinds are ignored.
pub fn pipeline(jobs: &[Job], kind: JobKind) -> Vec<StageCount> {
    kind.stages()
        .iter()
        .map(|stage| StageCount {
            stage: *stage,
            count: jobs
                .iter()
                .filter(|job| job.kind == kind && job.stage == *stage)
                .count(),
        })
        .collect()
}

/// Jobs that still owe money, largest balance first.
pub fn outstanding_balances(jobs: &[Job]) -> Vec<Job> {
    let mut owed: Vec<Job> = jobs.iter().filter(|job| !job.is_paid()).cloned().collect();
    owed.sort_by(|a, b| b.balance_due().cmp(&a.balance_due()));
    owed
}

/// Pieces waiting at the counter whose balance is not settled.
pub fn ready_unpaid(jobs: &[Job]) -> Vec<Job> {
    jobs.iter()
        .filter(|job| job.is_ready_for_pickup() && !job.is_paid())
        .cloned()
        .collect()
}

/// Open jobs past their due date, most overdue first.
pub fn overdue(jobs: &[Job], today: NaiveDate) -> Vec<Job> {
    let mut late: Vec<Job> = jobs
        .iter()
        .filter(|job| job.is_overdue(today))
        .cloned()
        .collect();
    late.sort_by_key(|job| job.due_date);
    late
}

/// Open jobs per assignee, busiest first; ties sorted by name.
pub fn workload(jobs: &[Job]) -> Vec<AssigneeLoad> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for job in jobs.iter().filter(|job| !job.is_completed()) {
        let assignee = job.assigned_to.as_deref().unwrap_or(UNASSIGNED);
        *counts.entry(assignee).or_default() += 1;
    }

    let mut loads: Vec<AssigneeLoad> = counts
        .into_iter()
        .map(|(assignee, open_jobs)| AssigneeLoad {
            assignee: assignee.to_string(),
            open_jobs,
        })
        .collect();
    loads.sort_by(|a, b| {
        b.open_jobs
            .cmp(&a.open_jobs)
            .then_with(|| a.assignee.cmp(&b.assignee))
    });
    loads
}
