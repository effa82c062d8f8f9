use crate::error::Result;
use crate::types::{RawRow, Record};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, instrument};

/// Result of writing the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOutcome {
    /// The new text differs from what was on disk before
    pub changed: bool,
    /// SHA-256 of the written text, hex encoded
    pub digest: String,
    pub records: usize,
}

/// Canonical snapshot text: pretty-printed JSON array, two-space indent,
/// non-ASCII written as-is, fields in sheet column order.
pub fn render_snapshot(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write the snapshot to `path`, always overwriting, and report whether it changed.
///
/// A missing previous file counts as empty content, so the first run always reports a change.
#[instrument(skip(records), fields(path = %path.display()))]
pub fn export_snapshot(records: &[Record], path: &Path) -> Result<SnapshotOutcome> {
    let previous = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let text = render_snapshot(records)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, &text)?;

    let changed = previous != text.as_bytes();
    let digest = hex::encode(Sha256::digest(text.as_bytes()));
    if changed {
        info!(
            "✅ Exported {} wines to {} (changes detected)",
            records.len(),
            path.display()
        );
    } else {
        info!("ℹ️ {} unchanged, no need to push", path.display());
    }

    Ok(SnapshotOutcome {
        changed,
        digest,
        records: records.len(),
    })
}

/// Read a persisted snapshot back as raw rows, ready to go through ingestion again.
/// Cells may be any JSON value, so hand-edited snapshots still load.
pub fn load_snapshot_rows(path: &Path) -> Result<Vec<RawRow>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Read a persisted snapshot as records, exactly as written.
pub fn load_snapshot(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let fields: IndexMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Record::from_fields(fields)
    }

    fn field_lists(records: &[Record]) -> Vec<Vec<(String, String)>> {
        records
            .iter()
            .map(|r| r.fields().map(|(k, v)| (k.to_string(), v.to_string())).collect())
            .collect()
    }

    #[test]
    fn test_first_export_reports_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wines.json");
        let outcome = export_snapshot(&[record(&[("ID", "W1"), ("Name", "Malbec")])], &path).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.records, 1);
        assert_eq!(outcome.digest.len(), 64);
    }

    #[test]
    fn test_second_identical_export_is_unchanged_but_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wines.json");
        let records = vec![record(&[("ID", "W1"), ("Name", "Malbec")])];

        let first = export_snapshot(&records, &path).unwrap();
        let second = export_snapshot(&records, &path).unwrap();
        assert!(!second.changed);
        assert_eq!(first.digest, second.digest);

        let changed = export_snapshot(&[record(&[("ID", "W1"), ("Name", "Merlot")])], &path).unwrap();
        assert!(changed.changed);
        assert!(fs::read_to_string(&path).unwrap().contains("Merlot"));
    }

    #[test]
    fn test_empty_collection_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wines.json");
        let outcome = export_snapshot(&[], &path).unwrap();
        assert!(outcome.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_pretty_printed_with_unicode_kept() {
        let text = render_snapshot(&[record(&[("ID", "W2"), ("Region", "Côtes du Rhône")])]).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"ID\": \"W2\",\n    \"Region\": \"Côtes du Rhône\"\n  }\n]"
        );
    }

    #[test]
    fn test_round_trip_preserves_records_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wines.json");
        let records = vec![
            record(&[("ID", "W9"), ("Name", "Barolo"), ("Vintage", "2016")]),
            record(&[("ID", "W1"), ("Name", "Cava"), ("Notes", "")]),
        ];
        export_snapshot(&records, &path).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(field_lists(&loaded), field_lists(&records));

        let rows = load_snapshot_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], serde_json::json!("Barolo"));
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("wines.json");
        export_snapshot(&[], &path).unwrap();
        assert!(path.exists());
    }
}
