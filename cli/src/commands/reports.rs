//! Dashboard metrics and follow-up lists.

use std::fmt::Write;

use anyhow::Result;
use chrono::NaiveDate;
use jewelflow::report::{self, AssigneeLoad, StageCount, Summary};
use jewelflow::{JobKind, JobStore};
use serde::Serialize;

use super::{job_table, job_views, Output};

#[derive(Debug, Serialize)]
struct Pipeline {
    kind: JobKind,
    stages: Vec<StageCount>,
}

#[derive(Debug, Serialize)]
struct SummaryReport {
    summary: Summary,
    pipelines: Vec<Pipeline>,
}

/// Headline numbers plus stage counts for one kind or both.
pub fn summary(
    store: &JobStore,
    kind: Option<JobKind>,
    today: NaiveDate,
    out: &Output,
) -> Result<String> {
    let jobs = store.list(None, kind);
    let kinds: Vec<JobKind> = match kind {
        Some(kind) => vec![kind],
        None => vec![JobKind::Custom, JobKind::Repair],
    };

    let report = SummaryReport {
        summary: report::summary(&jobs, today),
        pipelines: kinds
            .into_iter()
            .map(|kind| Pipeline {
                kind,
                stages: report::pipeline(&jobs, kind),
            })
            .collect(),
    };

    if out.json {
        return out.to_json(&report);
    }

    let s = &report.summary;
    let mut text = String::new();
    let _ = writeln!(text, "Open jobs:        {}", s.open_jobs);
    let _ = writeln!(text, "Completed:        {}", s.completed_jobs);
    let _ = writeln!(text, "Overdue:          {}", s.overdue_jobs);
    let _ = writeln!(text, "Ready, unpaid:    {}", s.ready_unpaid_jobs);
    let _ = writeln!(text, "Listed revenue:   {}", out.money(s.listed_revenue));
    let _ = writeln!(text, "Collected:        {}", out.money(s.collected));
    let _ = writeln!(text, "Outstanding:      {}", out.money(s.outstanding));
    for pipeline in &report.pipelines {
        let _ = writeln!(text);
        let _ = writeln!(text, "{} pipeline", pipeline.kind);
        for count in &pipeline.stages {
            let _ = writeln!(text, "  {:<18} {}", count.stage.to_string(), count.count);
        }
    }
    Ok(text)
}

pub fn outstanding(store: &JobStore, out: &Output) -> Result<String> {
    let jobs = report::outstanding_balances(&store.all());
    if out.json {
        return out.to_json(&job_views(&jobs));
    }
    Ok(job_table(&jobs, out))
}

pub fn ready(store: &JobStore, out: &Output) -> Result<String> {
    let jobs = report::ready_unpaid(&store.all());
    if out.json {
        return out.to_json(&job_views(&jobs));
    }
    Ok(job_table(&jobs, out))
}

pub fn overdue(store: &JobStore, today: NaiveDate, out: &Output) -> Result<String> {
    let jobs = report::overdue(&store.all(), today);
    if out.json {
        return out.to_json(&job_views(&jobs));
    }
    Ok(job_table(&jobs, out))
}

pub fn workload(store: &JobStore, out: &Output) -> Result<String> {
    let loads: Vec<AssigneeLoad> = report::workload(&store.all());
    if out.json {
        return out.to_json(&loads);
    }
    if loads.is_empty() {
        return Ok("No open jobs.\n".to_string());
    }

    let mut text = String::new();
    for load in &loads {
        let _ = writeln!(text, "{:<20} {}", load.assignee, load.open_jobs);
    }
    Ok(text)
}
