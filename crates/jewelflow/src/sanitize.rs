//! Helpers for keeping customer data out of logs and span attributes.
//!
//! Logs are safe to share when asking for help; these functions ensure no
//! customer names or full data paths end up in them.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Keeps the first letter of each word of a customer name.
///
/// - `Jane Doe` → `J*** D***`
/// - `Ó'Brien` → `Ó***`
pub fn redact_name(name: &str) -> String {
    let words: Vec<String> = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .map(|first| format!("{}***", first))
        .collect();

    if words.is_empty() {
        "<empty>".to_string()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_redact_path_returns_filename() {
        assert_eq!(
            redact_path(&PathBuf::from("/home/store/.jewelflow/data/jobs.csv")),
            "jobs.csv"
        );
    }

    #[test]
    fn test_redact_path_root() {
        assert_eq!(redact_path(Path::new("/")), "<unknown>");
    }

    #[test]
    fn test_redact_name() {
        assert_eq!(redact_name("Jane Doe"), "J*** D***");
        assert_eq!(redact_name("  Cher "), "C***");
        assert_eq!(redact_name("Ó'Brien"), "Ó***");
    }

    #[test]
    fn test_redact_empty_name() {
        assert_eq!(redact_name("   "), "<empty>");
    }
}
