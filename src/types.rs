use crate::constants::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One sheet row before cleaning: column name to raw cell value, in sheet order.
/// Cells past the end of a short row are `Null`.
pub type RawRow = IndexMap<String, serde_json::Value>;

/// An admitted, cleaned catalogue entry.
///
/// Keeps every column of the source row in sheet order so the snapshot mirrors
/// the sheet. Serializes transparently as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn from_fields(fields: IndexMap<String, String>) -> Self {
        Self { fields }
    }

    /// Value of `field`, or `""` when the column is absent.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn id(&self) -> &str {
        self.get(FIELD_ID)
    }

    pub fn name(&self) -> &str {
        self.get(FIELD_NAME)
    }

    pub fn vintage(&self) -> &str {
        self.get(FIELD_VINTAGE)
    }

    pub fn wine_type(&self) -> &str {
        self.get(FIELD_TYPE)
    }

    pub fn region(&self) -> &str {
        self.get(FIELD_REGION)
    }

    pub fn purchased_at(&self) -> &str {
        self.get(FIELD_PURCHASED_AT)
    }

    pub fn notes(&self) -> &str {
        self.get(FIELD_NOTES)
    }

    /// `Name (Vintage)`, the heading used on pages and labels.
    pub fn title(&self) -> String {
        format!("{} ({})", self.name(), self.vintage())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Outcome of a full sync run, printed by the CLI.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub raw_rows: usize,
    pub admitted: usize,
    pub rejected: usize,
    pub snapshot_changed: bool,
    pub snapshot_digest: String,
    pub pages_written: usize,
    pub label_pages: usize,
    pub published: bool,
}
