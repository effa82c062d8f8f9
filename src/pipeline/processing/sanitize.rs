use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// Zero-width space/non-joiner/joiner and the BOM / zero-width no-break space
static INVISIBLE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{200B}-\u{200D}\u{FEFF}]").expect("static pattern"));

// A CRLF pair counts as one break
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|[\r\n]").expect("static pattern"));

/// Clean a single text cell: drop invisible characters, turn each line break
/// into one space, trim the ends.
pub fn clean_text(value: &str) -> String {
    let visible = INVISIBLE_CHARS.replace_all(value, "");
    let single_line = LINE_BREAKS.replace_all(&visible, " ");
    single_line.trim().to_string()
}

/// Clean any JSON cell. Non-text values are cleaned through their JSON text form.
pub fn clean_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => clean_text(s),
        other => clean_text(&other.to_string()),
    }
}
