//! Job store backed by a flat CSV file.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rust_decimal::Decimal;

use crate::config::{load_or_default, Config};
use crate::error::StoreError;
use crate::job::{Job, JobKind, NewJob, Stage};
use crate::sanitize::{redact_name, redact_path};
use crate::store::csv_file;
use crate::store::query::JobQuery;

/// Store behaviour that comes from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreOptions {
    /// Write the demo records when the jobs file does not exist yet.
    pub seed_demo_data: bool,
    /// Allowed assignees. Empty means any name is accepted.
    pub team: Vec<String>,
}

impl StoreOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            seed_demo_data: config.seed_demo_data,
            team: config.team.clone(),
        }
    }
}

/// Registry of every custom and repair job.
///
/// The store exclusively owns its jobs: readers get clones, and the only way
/// to change a job is through [`JobStore::advance_status`] and
/// [`JobStore::record_payment`]. Every mutation rewrites the jobs file and is
/// applied in memory only once that write succeeded.
#[derive(Debug)]
pub struct JobStore {
    path: PathBuf,
    options: StoreOptions,
    /// Insertion order, which is also `created_at` order for jobs created
    /// by this store.
    jobs: Vec<Job>,
}

impl JobStore {
    /// Opens the store at `path` with default options. A missing file is an
    /// empty store; the file is created on the first mutation.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Opens the jobs file named by the configuration.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        Self::open_with(config.jobs_path(), StoreOptions::from_config(config))
    }

    /// Loads the configuration (see [`load_or_default`]) and opens its jobs
    /// file, or `data_override` when given.
    pub fn open_configured(
        config_path: Option<&Path>,
        data_override: Option<&Path>,
    ) -> crate::Result<(Config, Self)> {
        let config = load_or_default(config_path)?;
        let store = match data_override {
            Some(path) => Self::open_with(path, StoreOptions::from_config(&config))?,
            None => Self::from_config(&config)?,
        };
        Ok((config, store))
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let jobs = if path.exists() {
            csv_file::read_jobs(&path)?
        } else if options.seed_demo_data {
            let jobs = demo_jobs();
            csv_file::write_jobs(&path, &jobs)?;
            log::info!("Seeded demo jobs into {}", redact_path(&path));
            jobs
        } else {
            Vec::new()
        };

        log::info!("Loaded {} jobs from {}", jobs.len(), redact_path(&path));

        Ok(Self {
            path,
            options,
            jobs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Takes in a new job at the initial stage of its kind.
    pub fn create(
        &mut self,
        kind: JobKind,
        customer_name: &str,
        total_price: Decimal,
        deposit_amount: Decimal,
    ) -> Result<Job, StoreError> {
        self.create_job(NewJob::new(kind, customer_name, total_price, deposit_amount))
    }

    /// Takes in a new job with its full intake details.
    pub fn create_job(&mut self, new_job: NewJob) -> Result<Job, StoreError> {
        if let Some(ref assignee) = new_job.assigned_to {
            self.check_assignee(assignee.trim())?;
        }

        let id = self.next_id(new_job.kind)?;
        let job = new_job.into_job(id, Utc::now())?;

        self.jobs.push(job.clone());
        if let Err(e) = csv_file::write_jobs(&self.path, &self.jobs) {
            self.jobs.pop();
            return Err(e.into());
        }

        log::info!(
            "Created {} job {} for {}",
            job.kind,
            job.id,
            redact_name(&job.customer_name)
        );
        Ok(job)
    }

    /// Moves a job to the next stage of its kind's sequence.
    pub fn advance_status(&mut self, id: &str) -> Result<Job, StoreError> {
        let index = self.index_of(id)?;
        let mut updated = self.jobs[index].clone();
        let previous = updated.stage;
        updated.advance(Utc::now())?;

        let job = self.commit(index, updated)?;
        log::info!("Job {} advanced from {} to {}", job.id, previous, job.stage);
        Ok(job)
    }

    /// Adds a payment to a job's deposit.
    pub fn record_payment(&mut self, id: &str, amount: Decimal) -> Result<Job, StoreError> {
        let index = self.index_of(id)?;
        let mut updated = self.jobs[index].clone();
        updated.apply_payment(amount, Utc::now())?;

        let job = self.commit(index, updated)?;
        log::info!(
            "Recorded payment of {} on job {}, balance due {}",
            amount,
            job.id,
            job.balance_due()
        );
        Ok(job)
    }

    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs.iter().find(|job| job.id == id).cloned()
    }

    /// Snapshot of the jobs matching the optional stage and kind, ordered by
    /// creation time.
    pub fn list(&self, stage: Option<Stage>, kind: Option<JobKind>) -> Vec<Job> {
        let mut query = JobQuery::new();
        if let Some(stage) = stage {
            query = query.stage(stage);
        }
        if let Some(kind) = kind {
            query = query.kind(kind);
        }
        self.query(&query)
    }

    /// Snapshot of the jobs matching `query`, ordered by creation time.
    pub fn query(&self, query: &JobQuery) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|job| query.matches(job))
            .cloned()
            .collect();
        // Stable, so jobs created in the same instant keep insertion order.
        jobs.sort_by_key(|job| job.created_at);
        jobs
    }

    /// Snapshot of every job, ordered by creation time.
    pub fn all(&self) -> Vec<Job> {
        self.query(&JobQuery::new())
    }

    /// Drops every job, optionally putting the demo records back.
    pub fn reset(&mut self, seed_demo_data: bool) -> Result<(), StoreError> {
        let jobs = if seed_demo_data { demo_jobs() } else { Vec::new() };
        csv_file::write_jobs(&self.path, &jobs)?;

        log::warn!(
            "Reset {} ({} jobs dropped, {} seeded)",
            redact_path(&self.path),
            self.jobs.len(),
            jobs.len()
        );
        self.jobs = jobs;
        Ok(())
    }

    /// Writes the current snapshot to another CSV file.
    pub fn export_to<P: AsRef<Path>>(&self, path: P) -> Result<usize, StoreError> {
        let jobs = self.all();
        csv_file::write_jobs(path.as_ref(), &jobs)?;
        log::info!("Exported {} jobs to {}", jobs.len(), redact_path(path.as_ref()));
        Ok(jobs.len())
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.jobs
            .iter()
            .position(|job| job.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Swaps `updated` in at `index` and persists; restores the previous
    /// version if the write fails.
    fn commit(&mut self, index: usize, updated: Job) -> Result<Job, StoreError> {
        let previous = std::mem::replace(&mut self.jobs[index], updated);
        if let Err(e) = csv_file::write_jobs(&self.path, &self.jobs) {
            self.jobs[index] = previous;
            return Err(e.into());
        }
        Ok(self.jobs[index].clone())
    }

    fn check_assignee(&self, assignee: &str) -> Result<(), StoreError> {
        if assignee.is_empty() || self.options.team.is_empty() {
            return Ok(());
        }
        if self.options.team.iter().any(|member| member == assignee) {
            Ok(())
        } else {
            Err(StoreError::InvalidInput(format!(
                "'{}' is not on the team (expected one of: {})",
                assignee,
                self.options.team.join(", ")
            )))
        }
    }

    /// Next ticket number for `kind`: one past the highest issued so far.
    fn next_id(&self, kind: JobKind) -> Result<String, StoreError> {
        let prefix = format!("{}-", kind.id_prefix());
        let highest = self
            .jobs
            .iter()
            .filter_map(|job| job.id.strip_prefix(&prefix))
            .filter_map(|number| number.parse::<u32>().ok())
            .max();

        let next = match highest {
            Some(n) => n
                .checked_add(1)
                .ok_or_else(|| {
                    StoreError::InvalidInput(format!(
                        "no ticket numbers left for {} jobs after {}{}",
                        kind.as_str(),
                        prefix,
                        n
                    ))
                })?
                .max(kind.first_ticket()),
            None => kind.first_ticket(),
        };
        Ok(format!("{}{}", prefix, next))
    }
}

/// One custom and one repair record, matching what a fresh install shows.
fn demo_jobs() -> Vec<Job> {
    let now = Utc::now();
    let custom = Job {
        id: format!("{}-{}", JobKind::Custom.id_prefix(), JobKind::Custom.first_ticket()),
        kind: JobKind::Custom,
        customer_name: "Example Client".to_string(),
        stage: JobKind::Custom.initial_stage(),
        total_price: Decimal::new(120_000, 2),
        deposit_amount: Decimal::new(20_000, 2),
        created_at: now,
        updated_at: now,
        item: Some("Engagement ring".to_string()),
        repair_type: None,
        assigned_to: Some("CAD Team".to_string()),
        due_date: None,
        notes: Some("Demo record".to_string()),
    };
    let repair = Job {
        id: format!("{}-{}", JobKind::Repair.id_prefix(), JobKind::Repair.first_ticket()),
        kind: JobKind::Repair,
        customer_name: "Example Client".to_string(),
        stage: JobKind::Repair.initial_stage(),
        total_price: Decimal::new(12_000, 2),
        deposit_amount: Decimal::new(0, 2),
        created_at: now,
        updated_at: now,
        item: Some("Ring".to_string()),
        repair_type: Some("Resizing".to_string()),
        assigned_to: Some("Bench".to_string()),
        due_date: None,
        notes: Some("Demo record".to_string()),
    };
    vec![custom, repair]
}
