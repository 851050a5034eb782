//! Shared test utilities for jewelflow integration tests.
//!
//! This module provides:
//! - `TestHarness` for store tests against an isolated temp directory
//! - `ConfigBuilder` for writing config files programmatically

pub mod builders;
pub mod harness;

pub use builders::ConfigBuilder;
pub use harness::TestHarness;
