// Pipeline ingestion: fetching the sheet and splitting it into raw rows

use crate::app::ports::SheetSourcePort;
use crate::error::Result;
use crate::types::RawRow;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Split CSV text (header row first) into raw rows keyed by column name.
///
/// Short rows get `Null` for their missing cells; cells beyond the header are dropped.
pub fn parse_sheet_csv(text: &str) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            debug!(
                "Row {}: ignoring {} cell(s) past the last column",
                index + 1,
                record.len() - headers.len()
            );
        }
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = record
                    .get(i)
                    .map(|cell| Value::String(cell.to_string()))
                    .unwrap_or(Value::Null);
                (header.to_string(), value)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Download the sheet and split it into rows. Any failure here is fatal for the run.
#[instrument(skip(source))]
pub fn fetch_rows(source: &dyn SheetSourcePort) -> Result<Vec<RawRow>> {
    let text = source.fetch_csv()?;
    let rows = parse_sheet_csv(&text)?;
    info!("Raw rows fetched from sheet: {}", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use serde_json::json;

    struct FixedSource(&'static str);

    impl SheetSourcePort for FixedSource {
        fn fetch_csv(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct DownSource;

    impl SheetSourcePort for DownSource {
        fn fetch_csv(&self) -> Result<String> {
            Err(SyncError::Status {
                status: 503,
                url: "https://sheet.example".into(),
            })
        }
    }

    #[test]
    fn test_parses_header_and_rows() {
        let rows = parse_sheet_csv("ID, Name ,Vintage\nW1,Malbec,2019\nW2,\"Rioja, Reserva\",2015\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ID"], json!("W1"));
        // keys are trimmed later, during cleaning
        assert_eq!(rows[1][" Name "], json!("Rioja, Reserva"));
    }

    #[test]
    fn test_short_rows_pad_with_null_and_long_rows_truncate() {
        let rows = parse_sheet_csv("ID,Name,Notes\nW1,Malbec\nW2,Cava,dry,extra\n").unwrap();
        assert_eq!(rows[0]["Notes"], Value::Null);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[1]["Notes"], json!("dry"));
    }

    #[test]
    fn test_quoted_cells_keep_line_breaks_for_the_sanitizer() {
        let rows = parse_sheet_csv("ID,Name,Notes\nW1,Malbec,\"line one\nline two\"\n").unwrap();
        assert_eq!(rows[0]["Notes"], json!("line one\nline two"));
    }

    #[test]
    fn test_header_only_sheet_has_no_rows() {
        assert!(parse_sheet_csv("ID,Name\n").unwrap().is_empty());
    }

    #[test]
    fn test_fetch_rows_uses_source() {
        let rows = fetch_rows(&FixedSource("ID,Name\nW1,Malbec\n")).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_transport_failure_propagates() {
        let err = fetch_rows(&DownSource).unwrap_err();
        assert!(matches!(err, SyncError::Status { status: 503, .. }));
    }
}
