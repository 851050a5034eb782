use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_data_directory")]
    pub data_directory: String,
    #[serde(default = "default_jobs_file")]
    pub jobs_file: String,
    #[serde(default)]
    pub seed_demo_data: bool,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Staff names accepted as `assigned_to`. Empty accepts any name.
    #[serde(default)]
    pub team: Vec<String>,
}

fn default_data_directory() -> String {
    "~/.jewelflow/data".to_string()
}

fn default_jobs_file() -> String {
    "jobs.csv".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            data_directory: default_data_directory(),
            jobs_file: default_jobs_file(),
            seed_demo_data: false,
            currency_symbol: default_currency_symbol(),
            team: Vec::new(),
        }
    }
}

impl Config {
    /// Data directory with a leading `~` expanded.
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.data_directory)
    }

    /// Full path of the jobs CSV file.
    pub fn jobs_path(&self) -> PathBuf {
        self.data_dir().join(&self.jobs_file)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_path_joins_directory_and_file() {
        let config = Config {
            data_directory: "/srv/store".to_string(),
            jobs_file: "jobs_rick.csv".to_string(),
            ..Config::default()
        };
        assert_eq!(config.jobs_path(), PathBuf::from("/srv/store/jobs_rick.csv"));
    }

    #[test]
    fn test_default_data_dir_expands_home() {
        let config = Config::default();
        let data_dir = config.data_dir();
        assert!(!data_dir.to_string_lossy().starts_with('~'));
        assert!(data_dir.ends_with(".jewelflow/data"));
    }

    #[test]
    fn test_tilde_only_in_leading_position() {
        assert_eq!(expand_home("data/~/jobs"), PathBuf::from("data/~/jobs"));
    }
}
