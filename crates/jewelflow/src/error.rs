use std::path::PathBuf;
use thiserror::Error;

use crate::job::Stage;

#[derive(Error, Debug)]
pub enum JewelflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Errors returned by [`crate::store::JobStore`] operations.
///
/// Everything except `Persistence` is a caller mistake and leaves the store
/// untouched. `Persistence` also leaves the store untouched: the in-memory
/// state only changes after the file was rewritten.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job {id} is {stage} and cannot be changed")]
    InvalidTransition { id: String, stage: Stage },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read jobs file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write jobs file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Corrupt record at line {line}: {reason}")]
    Corrupt { line: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, JewelflowError>;
