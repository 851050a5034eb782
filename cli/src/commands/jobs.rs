//! Intake, stage changes, payments and lookups.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;
use jewelflow::{
    JobKind, JobQuery, JobStore, NewJob, OverdueFilter, PaidFilter, Stage, StoreError,
};
use rust_decimal::Decimal;

use super::{job_detail, job_table, job_views, JobView, Output};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// custom or repair
    pub kind: JobKind,

    #[arg(long)]
    pub customer: String,

    /// Quoted price
    #[arg(long)]
    pub total: Decimal,

    /// Amount paid at intake
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub deposit: Decimal,

    #[arg(long)]
    pub item: Option<String>,

    /// Repairs only
    #[arg(long)]
    pub repair_type: Option<String>,

    #[arg(long)]
    pub assigned_to: Option<String>,

    /// Promised date, YYYY-MM-DD
    #[arg(long)]
    pub due: Option<NaiveDate>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub kind: Option<JobKind>,

    /// Repeat to match any of several stages
    #[arg(long = "stage")]
    pub stages: Vec<Stage>,

    #[arg(long, conflicts_with = "unpaid")]
    pub paid: bool,

    #[arg(long)]
    pub unpaid: bool,

    #[arg(long, conflicts_with = "not_overdue")]
    pub overdue: bool,

    #[arg(long)]
    pub not_overdue: bool,

    #[arg(long)]
    pub assigned_to: Option<String>,

    /// Text to find in id, customer, item or repair type
    #[arg(long)]
    pub search: Option<String>,
}

impl ListArgs {
    fn to_query(&self, today: NaiveDate) -> JobQuery {
        let mut query = JobQuery::new();
        query.kind = self.kind;
        query.stages = self.stages.clone();
        query.paid = match (self.paid, self.unpaid) {
            (true, _) => PaidFilter::Paid,
            (_, true) => PaidFilter::Unpaid,
            _ => PaidFilter::All,
        };
        query.overdue = match (self.overdue, self.not_overdue) {
            (true, _) => OverdueFilter::Only(today),
            (_, true) => OverdueFilter::Not(today),
            _ => OverdueFilter::All,
        };
        query.assigned_to = self.assigned_to.clone();
        query.search = self.search.clone();
        query
    }
}

pub fn add(store: &mut JobStore, args: AddArgs, out: &Output) -> Result<String> {
    let mut new_job = NewJob::new(args.kind, args.customer, args.total, args.deposit);
    new_job.item = args.item;
    new_job.repair_type = args.repair_type;
    new_job.assigned_to = args.assigned_to;
    new_job.due_date = args.due;
    new_job.notes = args.notes;

    let job = store.create_job(new_job)?;

    if out.json {
        return out.to_json(&JobView::from(&job));
    }
    Ok(format!(
        "Created {} for {} ({}), balance due {}\n",
        job.id,
        job.customer_name,
        job.stage,
        out.money(job.balance_due())
    ))
}

pub fn advance(store: &mut JobStore, id: &str, out: &Output) -> Result<String> {
    let job = store.advance_status(id)?;

    if out.json {
        return out.to_json(&JobView::from(&job));
    }
    let mut text = format!("{} is now {}\n", job.id, job.stage);
    if job.is_ready_for_pickup() && !job.is_paid() {
        text.push_str(&format!(
            "Collect {} at pickup\n",
            out.money(job.balance_due())
        ));
    }
    Ok(text)
}

pub fn pay(store: &mut JobStore, id: &str, amount: Decimal, out: &Output) -> Result<String> {
    let job = store.record_payment(id, amount)?;

    if out.json {
        return out.to_json(&JobView::from(&job));
    }
    if job.is_paid() {
        Ok(format!(
            "Recorded {} on {}, paid in full\n",
            out.money(amount),
            job.id
        ))
    } else {
        Ok(format!(
            "Recorded {} on {}, balance due {}\n",
            out.money(amount),
            job.id,
            out.money(job.balance_due())
        ))
    }
}

pub fn show(store: &JobStore, id: &str, out: &Output) -> Result<String> {
    let job = store
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    if out.json {
        return out.to_json(&JobView::from(&job));
    }
    Ok(job_detail(&job, out))
}

pub fn list(store: &JobStore, args: &ListArgs, out: &Output) -> Result<String> {
    let today = Utc::now().date_naive();
    let jobs = store.query(&args.to_query(today));

    if out.json {
        return out.to_json(&job_views(&jobs));
    }
    Ok(job_table(&jobs, out))
}
