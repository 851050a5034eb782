//! Command handlers for the `jewelflow` binary.
//!
//! Commands are organized by area:
//! - `jobs`: intake, stage changes, payments and lookups
//! - `reports`: dashboard metrics and follow-up lists
//! - `data`: export and reset of the jobs file
//!
//! Every handler returns the text to print so it can be tested without a
//! terminal.

pub mod data;
pub mod jobs;
pub mod reports;

use std::fmt::Write;

use jewelflow::Job;
use rust_decimal::Decimal;
use serde::Serialize;

/// How results are rendered.
#[derive(Debug, Clone)]
pub struct Output {
    pub json: bool,
    pub currency_symbol: String,
}

impl Output {
    pub fn new(json: bool, currency_symbol: impl Into<String>) -> Self {
        Self {
            json,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Two decimal places with the configured symbol, e.g. `$1,200.00`.
    pub fn money(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp(2);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let text = format!("{:.2}", rounded.abs());
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!(
            "{}{}{}.{}",
            sign,
            self.currency_symbol,
            group_thousands(whole),
            cents
        )
    }

    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// A job as shown to callers, with its derived balance.
#[derive(Debug, Serialize)]
pub struct JobView<'a> {
    #[serde(flatten)]
    pub job: &'a Job,
    pub balance_due: Decimal,
}

impl<'a> From<&'a Job> for JobView<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            job,
            balance_due: job.balance_due(),
        }
    }
}

pub fn job_views(jobs: &[Job]) -> Vec<JobView<'_>> {
    jobs.iter().map(JobView::from).collect()
}

/// One line per job, or a placeholder when there are none.
pub fn job_table(jobs: &[Job], out: &Output) -> String {
    if jobs.is_empty() {
        return "No jobs.\n".to_string();
    }

    let mut text = String::new();
    let _ = writeln!(
        text,
        "{:<8} {:<7} {:<22} {:<17} {:>12} {:>12}  {:<12} {}",
        "ID", "KIND", "CUSTOMER", "STAGE", "TOTAL", "BALANCE", "ASSIGNED", "DUE"
    );
    for job in jobs {
        let _ = writeln!(
            text,
            "{:<8} {:<7} {:<22} {:<17} {:>12} {:>12}  {:<12} {}",
            job.id,
            job.kind.to_string(),
            truncate(&job.customer_name, 22),
            job.stage.to_string(),
            out.money(job.total_price),
            out.money(job.balance_due()),
            job.assigned_to.as_deref().unwrap_or("-"),
            job.due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    text
}

/// Every field of one job.
pub fn job_detail(job: &Job, out: &Output) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{} ({})", job.id, job.kind);
    let _ = writeln!(text, "  Customer:    {}", job.customer_name);
    let _ = writeln!(text, "  Stage:       {}", job.stage);
    if let Some(ref item) = job.item {
        let _ = writeln!(text, "  Item:        {}", item);
    }
    if let Some(ref repair_type) = job.repair_type {
        let _ = writeln!(text, "  Repair:      {}", repair_type);
    }
    let _ = writeln!(text, "  Total:       {}", out.money(job.total_price));
    let _ = writeln!(text, "  Deposit:     {}", out.money(job.deposit_amount));
    let _ = writeln!(text, "  Balance due: {}", out.money(job.balance_due()));
    if let Some(ref assignee) = job.assigned_to {
        let _ = writeln!(text, "  Assigned to: {}", assignee);
    }
    if let Some(due) = job.due_date {
        let _ = writeln!(text, "  Due:         {}", due);
    }
    if let Some(ref notes) = job.notes {
        let _ = writeln!(text, "  Notes:       {}", notes);
    }
    let _ = writeln!(
        text,
        "  Created:     {}",
        job.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        text,
        "  Updated:     {}",
        job.updated_at.format("%Y-%m-%d %H:%M UTC")
    );
    text
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
