use crate::constants::{FIELD_ID, FIELD_NAME, ID_PREFIX};
use crate::pipeline::processing::sanitize::clean_value;
use crate::pipeline::render::page_file_name;
use crate::types::{RawRow, Record};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Why a source row was left out of the record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// `ID` does not start with the required prefix letter
    InvalidId,
    /// `Name` is empty after cleaning
    MissingName,
    /// An earlier admitted row already used this `ID`
    DuplicateId,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InvalidId => write!(f, "ID does not start with '{ID_PREFIX}'"),
            RejectReason::MissingName => write!(f, "Name is empty"),
            RejectReason::DuplicateId => write!(f, "duplicate ID"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// 1-based position among the data rows (header excluded)
    pub row: usize,
    pub id: String,
    pub reason: RejectReason,
}

/// Admitted records plus the bookkeeping of what was dropped.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub raw_rows: usize,
    pub records: Vec<Record>,
    pub rejections: Vec<Rejection>,
}

/// Trim column names and clean every cell of a raw row.
pub fn clean_row(row: &RawRow) -> IndexMap<String, String> {
    let mut cleaned = IndexMap::with_capacity(row.len());
    for (key, value) in row {
        cleaned.insert(key.trim().to_string(), clean_value(value));
    }
    cleaned
}

/// True when `id` starts with the ID prefix letter, ignoring case.
pub fn has_valid_id(id: &str) -> bool {
    id.to_uppercase().starts_with(ID_PREFIX)
}

/// Key used to detect duplicate IDs: the page file name, case folded.
/// Two IDs share a key exactly when their pages would land on the same file,
/// including on case-insensitive filesystems.
fn dedupe_key(id: &str) -> String {
    page_file_name(id).to_ascii_uppercase()
}

/// Turn raw sheet rows into the admitted, deduplicated record set.
///
/// Source order is preserved and the first occurrence of an ID wins. Rows that
/// fail a check are recorded in `rejections`; nothing here is fatal.
#[instrument(skip(rows))]
pub fn admit_rows<I>(rows: I) -> IngestOutcome
where
    I: IntoIterator<Item = RawRow>,
{
    let mut outcome = IngestOutcome::default();
    let mut seen_ids = HashSet::new();

    for (index, raw) in rows.into_iter().enumerate() {
        outcome.raw_rows += 1;
        let row_number = index + 1;
        let fields = clean_row(&raw);
        let id = fields.get(FIELD_ID).map(String::as_str).unwrap_or("");
        let name = fields.get(FIELD_NAME).map(String::as_str).unwrap_or("");

        let rejection = if !has_valid_id(id) {
            debug!("Row {}: skipping, ID '{}' does not start with '{}'", row_number, id, ID_PREFIX);
            Some(RejectReason::InvalidId)
        } else if name.is_empty() {
            debug!("Row {}: skipping '{}', Name is empty", row_number, id);
            Some(RejectReason::MissingName)
        } else if !seen_ids.insert(dedupe_key(id)) {
            warn!("⚠️ Duplicate ID '{}' at row {}, skipping", id, row_number);
            Some(RejectReason::DuplicateId)
        } else {
            None
        };

        match rejection {
            Some(reason) => outcome.rejections.push(Rejection {
                row: row_number,
                id: id.to_string(),
                reason,
            }),
            None => outcome.records.push(Record::from_fields(fields)),
        }
    }

    info!(
        "✅ Admitted {} of {} rows ({} rejected)",
        outcome.records.len(),
        outcome.raw_rows,
        outcome.rejections.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn ids(outcome: &IngestOutcome) -> Vec<&str> {
        outcome.records.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_mixed_rows_scenario() {
        let rows = vec![
            row(&[("ID", json!("W1")), ("Name", json!("Malbec"))]),
            row(&[("ID", json!("w1")), ("Name", json!("Dup"))]),
            row(&[("ID", json!("X1")), ("Name", json!("Skip"))]),
            row(&[("ID", json!("W2")), ("Name", json!(""))]),
        ];

        let outcome = admit_rows(rows);

        assert_eq!(outcome.raw_rows, 4);
        assert_eq!(ids(&outcome), vec!["W1"]);
        assert_eq!(outcome.records[0].name(), "Malbec");
        let reasons: Vec<_> = outcome.rejections.iter().map(|r| r.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                RejectReason::DuplicateId,
                RejectReason::InvalidId,
                RejectReason::MissingName
            ]
        );
        assert_eq!(outcome.rejections[0].row, 2);
    }

    #[test]
    fn test_lowercase_prefix_is_admitted() {
        let outcome = admit_rows(vec![row(&[("ID", json!("w9")), ("Name", json!("Cava"))])]);
        assert_eq!(ids(&outcome), vec!["w9"]);
    }

    #[test]
    fn test_first_duplicate_wins_and_order_is_kept() {
        let rows = vec![
            row(&[("ID", json!("W3")), ("Name", json!("First"))]),
            row(&[("ID", json!("W1")), ("Name", json!("Other"))]),
            row(&[("ID", json!("W3")), ("Name", json!("Second"))]),
        ];
        let outcome = admit_rows(rows);
        assert_eq!(ids(&outcome), vec!["W3", "W1"]);
        assert_eq!(outcome.records[0].name(), "First");
    }

    #[test]
    fn test_rejected_rows_do_not_reserve_ids() {
        let rows = vec![
            row(&[("ID", json!("W5")), ("Name", json!("  "))]),
            row(&[("ID", json!("W5")), ("Name", json!("Barolo"))]),
        ];
        let outcome = admit_rows(rows);
        assert_eq!(ids(&outcome), vec!["W5"]);
        assert_eq!(outcome.records[0].name(), "Barolo");
    }

    #[test]
    fn test_ids_sharing_a_page_file_are_duplicates() {
        let rows = vec![
            row(&[("ID", json!("W 1")), ("Name", json!("Malbec"))]),
            row(&[("ID", json!("W_1")), ("Name", json!("Rioja"))]),
            row(&[("ID", json!("Wé")), ("Name", json!("Cava"))]),
            row(&[("ID", json!("Wè")), ("Name", json!("Barolo"))]),
        ];
        let outcome = admit_rows(rows);
        assert_eq!(ids(&outcome), vec!["W 1", "Wé"]);
        let rejected: Vec<(&str, RejectReason)> = outcome
            .rejections
            .iter()
            .map(|r| (r.id.as_str(), r.reason.clone()))
            .collect();
        assert_eq!(
            rejected,
            vec![("W_1", RejectReason::DuplicateId), ("Wè", RejectReason::DuplicateId)]
        );
    }

    #[test]
    fn test_keys_trimmed_and_values_cleaned() {
        let rows = vec![row(&[
            (" ID ", json!("\u{200B}W4 ")),
            ("Name\t", json!("Sancerre\r\nBlanc")),
            ("Vintage", json!(2020)),
            ("Notes", Value::Null),
        ])];
        let outcome = admit_rows(rows);
        let record = &outcome.records[0];
        assert_eq!(record.id(), "W4");
        assert_eq!(record.name(), "Sancerre Blanc");
        assert_eq!(record.vintage(), "2020");
        assert_eq!(record.notes(), "");
        let keys: Vec<&str> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ID", "Name", "Vintage", "Notes"]);
    }

    #[test]
    fn test_missing_columns_reject_without_panicking() {
        let outcome = admit_rows(vec![row(&[("Name", json!("No id column"))])]);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.rejections[0].reason, RejectReason::InvalidId);
    }

    #[test]
    fn test_admission_matches_predicate() {
        let cases = [
            ("W1", "a", true),
            ("w1", "a", true),
            ("W", "a", true),
            ("", "a", false),
            (" W2", "a", true),
            ("XW", "a", false),
            ("W3", "", false),
            ("W4", "\u{200B}", false),
        ];
        for (id, name, admitted) in cases {
            let outcome = admit_rows(vec![row(&[("ID", json!(id)), ("Name", json!(name))])]);
            assert_eq!(outcome.records.len() == 1, admitted, "id={:?} name={:?}", id, name);
        }
    }
}
