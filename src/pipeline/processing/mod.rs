// Row processing: cell cleaning and admission of records

pub mod filter;
pub mod sanitize;

pub use filter::{admit_rows, IngestOutcome, RejectReason, Rejection};
pub use sanitize::{clean_text, clean_value};
