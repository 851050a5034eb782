//! Job data model: kinds, stage sequences and the job record.

pub mod kind;
pub mod model;

pub use kind::{JobKind, Stage};
pub use model::{validate_amounts, Job, NewJob};
