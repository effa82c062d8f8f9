use crate::constants::{PAGE_FILE_EXT, PAGE_FILE_PREFIX};
use crate::error::Result;
use crate::types::Record;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const PAGE_STYLE: &str = "body { font-family: Arial, sans-serif; padding: 20px; max-width: 600px; margin: auto; }
h1 { margin-bottom: 0.5em; }
p { margin: 0.3em 0; }";

/// File name of the detail page for `id`. Also the last path segment of the
/// URL the label's code points at.
///
/// Characters outside `[A-Za-z0-9._-]` become `_` so an ID cannot leave the pages directory.
pub fn page_file_name(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("{PAGE_FILE_PREFIX}{stem}.{PAGE_FILE_EXT}")
}

/// Public URL of the detail page for `id` under `base_url` (which ends in `/`).
pub fn page_url(base_url: &str, id: &str) -> String {
    format!("{}{}", base_url, page_file_name(id))
}

fn labeled(label: &str, value: &str) -> Markup {
    html! {
        p { b { (label) ":" } " " (value) }
    }
}

/// The detail page for one record as a complete HTML document.
pub fn render_page(record: &Record) -> String {
    let title = record.title();
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (PreEscaped(PAGE_STYLE)) }
            }
            body {
                h1 { (title) }
                (labeled("Type", record.wine_type()))
                (labeled("Region", record.region()))
                (labeled("Purchased at", record.purchased_at()))
                (labeled("Notes", record.notes()))
            }
        }
    };
    markup.into_string()
}

/// Write one page per record into `dir`, overwriting what is there.
/// Returns the written paths in record order.
#[instrument(skip(records), fields(dir = %dir.display(), count = records.len()))]
pub fn write_pages(records: &[Record], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(records.len());
    for record in records {
        let path = dir.join(page_file_name(record.id()));
        fs::write(&path, render_page(record))?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    info!("✅ Wrote {} detail pages to {}", written.len(), dir.display());
    Ok(written)
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

    #[test]
    fn test_page_file_name_is_derived_from_id() {
        assert_eq!(page_file_name("W12"), "wine_W12.html");
        assert_eq!(page_file_name("w-3.b"), "wine_w-3.b.html");
        assert_eq!(page_file_name("W/../x y"), "wine_W_.._x_y.html");
    }

    #[test]
    fn test_page_url_joins_base() {
        assert_eq!(
            page_url("https://u.github.io/wine-db/wine_pages/", "W1"),
            "https://u.github.io/wine-db/wine_pages/wine_W1.html"
        );
    }

    #[test]
    fn test_page_contains_heading_and_fields() {
        let html = render_page(&record(&[
            ("ID", "W1"),
            ("Name", "Malbec"),
            ("Vintage", "2019"),
            ("Type", "Red"),
            ("Region", "Mendoza"),
            ("Purchased at", "Corner Shop"),
            ("Notes", "Plum, oak"),
        ]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Malbec (2019)</title>"));
        assert!(html.contains("<h1>Malbec (2019)</h1>"));
        assert!(html.contains("<p><b>Type:</b> Red</p>"));
        assert!(html.contains("<p><b>Region:</b> Mendoza</p>"));
        assert!(html.contains("<p><b>Purchased at:</b> Corner Shop</p>"));
        assert!(html.contains("<p><b>Notes:</b> Plum, oak</p>"));
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let html = render_page(&record(&[("ID", "W1"), ("Name", "Malbec")]));
        assert!(html.contains("<h1>Malbec ()</h1>"));
        assert!(html.contains("<p><b>Notes:</b> </p>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let html = render_page(&record(&[("ID", "W1"), ("Name", "Tom & <Jerry>")]));
        assert!(html.contains("Tom &amp; &lt;Jerry&gt;"));
    }

    #[test]
    fn test_write_pages_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("wine_pages");
        let records = vec![
            record(&[("ID", "W1"), ("Name", "Malbec")]),
            record(&[("ID", "W2"), ("Name", "Cava")]),
        ];
        let written = write_pages(&records, &pages).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[1], pages.join("wine_W2.html"));

        write_pages(&[record(&[("ID", "W1"), ("Name", "Merlot")])], &pages).unwrap();
        let content = fs::read_to_string(pages.join("wine_W1.html")).unwrap();
        assert!(content.contains("Merlot"));
    }
}
