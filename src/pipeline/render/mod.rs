// Output rendering: per-record detail pages and the printable label sheet

pub mod labels;
pub mod pages;

pub use labels::{draw_sheet, layout_sheet, render_label_sheet, LabelBlock, SheetLayout, SheetPage};
pub use pages::{page_file_name, page_url, render_page, write_pages};
