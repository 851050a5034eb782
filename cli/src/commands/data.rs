//! Export and reset of the jobs file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use jewelflow::JobStore;
use serde_json::json;

use super::Output;

pub fn export(store: &JobStore, path: &Path, out: &Output) -> Result<String> {
    if same_file(path, store.path()) {
        bail!("refusing to export over the live jobs file");
    }

    let count = store.export_to(path)?;

    if out.json {
        return out.to_json(&json!({ "exported": count, "path": path }));
    }
    Ok(format!("Exported {} jobs to {}\n", count, path.display()))
}

/// Compares paths after resolving their parent directories, so `./jobs.csv`
/// matches `jobs.csv`. Falls back to a plain comparison when a parent does
/// not exist yet.
fn same_file(a: &Path, b: &Path) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(full) = path.canonicalize() {
        return Some(full);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Some(parent.canonicalize().ok()?.join(name))
}

pub fn reset(store: &mut JobStore, seed: bool, out: &Output) -> Result<String> {
    let dropped = store.len();
    store.reset(seed)?;

    if out.json {
        return out.to_json(&json!({ "dropped": dropped, "seeded": store.len() }));
    }
    Ok(format!(
        "Removed {} jobs, {} demo jobs seeded\n",
        dropped,
        store.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{json, store, text};
    use jewelflow::JobKind;
    use rust_decimal::Decimal;

    #[test]
    fn test_export_writes_copy() {
        let (dir, mut store) = store();
        store
            .create(JobKind::Repair, "Sam Lee", Decimal::from(80), Decimal::ZERO)
            .unwrap();

        let target = dir.path().join("backup.csv");
        let output = export(&store, &target, &text()).unwrap();
        assert!(output.starts_with("Exported 1 jobs to "));

        let copy = JobStore::open(&target).unwrap();
        assert_eq!(copy.all(), store.all());
    }

    #[test]
    fn test_export_refuses_live_file() {
        let (_dir, store) = store();
        let live = store.path().to_path_buf();
        assert!(export(&store, &live, &text()).is_err());
    }

    #[test]
    fn test_export_refuses_live_file_by_another_name() {
        let (dir, mut store) = store();
        store
            .create(JobKind::Repair, "Sam Lee", Decimal::from(80), Decimal::ZERO)
            .unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let dotted = dir.path().join(".").join("jobs.csv");
        let roundabout = dir.path().join("sub").join("..").join("jobs.csv");
        for alias in [dotted, roundabout] {
            assert!(export(&store, &alias, &text()).is_err(), "{}", alias.display());
        }
        assert_eq!(JobStore::open(store.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_same_file_before_live_file_exists() {
        let (dir, store) = store();
        assert!(!store.path().exists());
        assert!(same_file(&dir.path().join(".").join("jobs.csv"), store.path()));
        assert!(!same_file(&dir.path().join("other.csv"), store.path()));
    }

    #[test]
    fn test_reset_with_seed() {
        let (_dir, mut store) = store();
        store
            .create(JobKind::Repair, "Sam Lee", Decimal::from(80), Decimal::ZERO)
            .unwrap();

        let output = reset(&mut store, true, &json()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["dropped"], 1);
        assert_eq!(value["seeded"], 2);
        assert!(store.get("C-1001").is_some());
    }

    #[test]
    fn test_reset_empty() {
        let (_dir, mut store) = store();
        let output = reset(&mut store, false, &text()).unwrap();
        assert_eq!(output, "Removed 0 jobs, 0 demo jobs seeded\n");
        assert!(store.is_empty());
    }
}
