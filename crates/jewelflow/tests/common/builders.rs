//! Builders for config files used in tests.

#![allow(dead_code)]

use serde_json::{json, Value};

/// Builds config JSON documents field by field.
pub struct ConfigBuilder {
    value: Value,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            value: json!({ "version": "1.0" }),
        }
    }

    pub fn data_directory(self, dir: &str) -> Self {
        self.set("data_directory", json!(dir))
    }

    pub fn jobs_file(self, name: &str) -> Self {
        self.set("jobs_file", json!(name))
    }

    pub fn seed_demo_data(self, seed: bool) -> Self {
        self.set("seed_demo_data", json!(seed))
    }

    pub fn team(self, members: &[&str]) -> Self {
        self.set("team", json!(members))
    }

    /// Sets any field, including ones the schema rejects.
    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.value[key] = value;
        self
    }

    pub fn build(&self) -> String {
        self.value.to_string()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
