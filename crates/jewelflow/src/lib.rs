pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod report;
pub mod sanitize;
pub mod store;

pub use config::{load_config, load_or_default, Config};
pub use error::{ConfigError, JewelflowError, PersistenceError, Result, StoreError};
pub use job::{Job, JobKind, NewJob, Stage};
pub use logging::LogFormat;
pub use store::{JobQuery, JobStore, OverdueFilter, PaidFilter, StoreOptions};
