//! Job storage: the in-memory registry and its CSV file.

pub mod csv_file;
pub mod job_store;
pub mod query;

pub use job_store::{JobStore, StoreOptions};
pub use query::{JobQuery, OverdueFilter, PaidFilter};
