//! Flat CSV file holding one row per job.
//!
//! The file is always rewritten as a whole: rows go to a temporary file in the
//! same directory, which is synced and then renamed over the target. A failed
//! write therefore never leaves a half-written jobs file behind.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::PersistenceError;
use crate::job::model::non_blank;
use crate::job::{validate_amounts, Job, JobKind, Stage};
use crate::sanitize::redact_path;

/// Column order of the jobs file.
pub const HEADERS: &[&str] = &[
    "id",
    "kind",
    "customer_name",
    "stage",
    "total_price",
    "deposit_amount",
    "balance_due",
    "created_at",
    "updated_at",
    "item",
    "repair_type",
    "assigned_to",
    "due_date",
    "notes",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A raw row of the jobs file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub kind: String,
    pub customer_name: String,
    pub stage: String,
    pub total_price: String,
    pub deposit_amount: String,
    #[serde(default)]
    pub balance_due: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub repair_type: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub notes: String,
}

impl JobRecord {
    pub fn from_job(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            kind: job.kind.as_str().to_string(),
            customer_name: job.customer_name.clone(),
            stage: job.stage.as_str().to_string(),
            total_price: job.total_price.to_string(),
            deposit_amount: job.deposit_amount.to_string(),
            balance_due: job.balance_due().to_string(),
            created_at: format_timestamp(job.created_at),
            updated_at: format_timestamp(job.updated_at),
            item: job.item.clone().unwrap_or_default(),
            repair_type: job.repair_type.clone().unwrap_or_default(),
            assigned_to: job.assigned_to.clone().unwrap_or_default(),
            due_date: job
                .due_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            notes: job.notes.clone().unwrap_or_default(),
        }
    }

    /// Parses and validates the row. The stored `balance_due` is only
    /// informational; a mismatch is logged and the computed value wins.
    pub fn into_job(self) -> Result<Job, String> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err("missing job id".to_string());
        }

        let kind = JobKind::from_str(&self.kind)?;
        let stage = Stage::from_str(&self.stage)?;
        if !kind.has_stage(stage) {
            return Err(format!("stage '{}' is not valid for {} jobs", stage, kind));
        }

        let customer_name = self.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(format!("job {} has no customer name", id));
        }

        let total_price = parse_amount("total_price", &self.total_price)?;
        let deposit_amount = parse_amount("deposit_amount", &self.deposit_amount)?;
        validate_amounts(total_price, deposit_amount)?;

        let stored_balance = self.balance_due.trim();
        if !stored_balance.is_empty() {
            match Decimal::from_str(stored_balance) {
                Ok(balance) if balance == total_price - deposit_amount => {}
                _ => log::warn!(
                    "Job {} has stale balance_due '{}', recomputing",
                    id,
                    stored_balance
                ),
            }
        }

        let created_at = parse_timestamp("created_at", &self.created_at)?;
        let updated_at = parse_timestamp("updated_at", &self.updated_at)?;

        let due_date = match self.due_date.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|e| format!("invalid due_date '{}': {}", raw, e))?,
            ),
        };

        Ok(Job {
            id,
            kind,
            customer_name,
            stage,
            total_price,
            deposit_amount,
            created_at,
            updated_at,
            item: non_blank(Some(self.item)),
            repair_type: non_blank(Some(self.repair_type)),
            assigned_to: non_blank(Some(self.assigned_to)),
            due_date,
            notes: non_blank(Some(self.notes)),
        })
    }
}

fn parse_amount(column: &str, raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|e| format!("invalid {} '{}': {}", column, raw, e))
}

fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid {} '{}': {}", column, raw, e))
}

fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Reads every job from `path`, in file order.
pub fn read_jobs(path: &Path) -> Result<Vec<Job>, PersistenceError> {
    let _span = tracing::info_span!("store.read", file = %redact_path(path)).entered();

    let file = std::fs::File::open(path).map_err(|e| PersistenceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(file);

    let csv_error = |e: csv::Error| PersistenceError::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut jobs = Vec::new();
    let mut seen = HashSet::new();
    for result in reader.records() {
        // Malformed rows (wrong field count, invalid UTF-8) carry a position.
        let record = result.map_err(|e| match e.position() {
            Some(pos) => PersistenceError::Corrupt {
                line: pos.line(),
                reason: e.to_string(),
            },
            None => csv_error(e),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let row: JobRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| PersistenceError::Corrupt {
                line,
                reason: e.to_string(),
            })?;
        let job = row
            .into_job()
            .map_err(|reason| PersistenceError::Corrupt { line, reason })?;

        if !seen.insert(job.id.clone()) {
            return Err(PersistenceError::Corrupt {
                line,
                reason: format!("duplicate job id '{}'", job.id),
            });
        }
        jobs.push(job);
    }

    log::debug!("Read {} jobs from {}", jobs.len(), redact_path(path));
    Ok(jobs)
}

/// Replaces `path` with the given jobs. Either the whole new file lands or
/// the old one stays untouched.
pub fn write_jobs<'a, I>(path: &Path, jobs: I) -> Result<(), PersistenceError>
where
    I: IntoIterator<Item = &'a Job>,
{
    let _span = tracing::info_span!("store.write", file = %redact_path(path)).entered();

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !directory.exists() {
        std::fs::create_dir_all(directory).map_err(|e| PersistenceError::CreateDirectory {
            path: directory.to_path_buf(),
            source: e,
        })?;
    }

    let write_error = |e: std::io::Error| PersistenceError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    let csv_error = |e: csv::Error| PersistenceError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut temp = NamedTempFile::new_in(directory).map_err(write_error)?;
    let mut count = 0usize;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file_mut());
        writer.write_record(HEADERS).map_err(csv_error)?;
        for job in jobs {
            writer.serialize(JobRecord::from_job(job)).map_err(csv_error)?;
            count += 1;
        }
        writer.flush().map_err(write_error)?;
    }
    temp.as_file_mut().flush().map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;

    log::debug!("Wrote {} jobs to {}", count, redact_path(path));
    Ok(())
}
