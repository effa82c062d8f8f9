use crate::app::ports::{CaptionStyle, SheetBackend};
use crate::config::SheetGeometry;
use crate::error::Result;
use crate::pipeline::render::pages::page_url;
use crate::types::Record;
use tracing::{info, instrument};

/// One line of caption text beside a code.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLine {
    pub text: String,
    pub style: CaptionStyle,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
}

/// A placed label: the code square plus its caption.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBlock {
    /// 1-based position of the record in the collection
    pub ordinal: usize,
    pub url: String,
    /// Bottom-left corner of the code square
    pub x: f32,
    pub y: f32,
    pub code_size: f32,
    pub captions: Vec<CaptionLine>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetPage {
    pub blocks: Vec<LabelBlock>,
}

/// The whole sheet, page by page. Always holds at least one page.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub pages: Vec<SheetPage>,
}

fn caption_lines(record: &Record, geometry: &SheetGeometry, x: f32, y: f32) -> Vec<CaptionLine> {
    let text_x = x + geometry.qr_size + geometry.caption_gap;
    let text_y = y + geometry.qr_size - geometry.caption_drop;

    let mut texts = vec![
        format!("Type: {}", record.wine_type()),
        format!("Region: {}", record.region()),
        format!("Purchased at: {}", record.purchased_at()),
    ];
    if geometry.include_notes {
        texts.push(format!("Notes: {}", record.notes()));
    }

    let mut lines = vec![CaptionLine {
        text: record.title(),
        style: CaptionStyle::Title,
        font_size: geometry.title_font_size,
        x: text_x,
        y: text_y,
    }];
    for (i, text) in texts.into_iter().enumerate() {
        lines.push(CaptionLine {
            text,
            style: CaptionStyle::Body,
            font_size: geometry.body_font_size,
            x: text_x,
            y: text_y - (i + 1) as f32 * geometry.line_spacing,
        });
    }
    lines
}

/// Place one block per record.
///
/// Blocks fill left to right, `items_per_row` to a row, then drop one row height
/// back at the left margin. After every `items_per_page` blocks the page is closed
/// and placement restarts at the top-left. Both checks use the record's 1-based
/// ordinal, the row check first.
///
/// `geometry` must already be validated: both per-row and per-page counts at least 1.
pub fn layout_sheet(records: &[Record], geometry: &SheetGeometry, base_url: &str) -> SheetLayout {
    let x_start = geometry.margin_x;
    let y_start = geometry.page_height - geometry.margin_y - geometry.row_height;
    let (mut x, mut y) = (x_start, y_start);

    let mut pages = Vec::new();
    let mut current = SheetPage::default();

    for (index, record) in records.iter().enumerate() {
        let ordinal = index + 1;
        current.blocks.push(LabelBlock {
            ordinal,
            url: page_url(base_url, record.id()),
            x,
            y,
            code_size: geometry.qr_size,
            captions: caption_lines(record, geometry, x, y),
        });

        if ordinal % geometry.items_per_row == 0 {
            x = x_start;
            y -= geometry.row_height;
        } else {
            x += geometry.col_width;
        }

        if ordinal % geometry.items_per_page == 0 {
            pages.push(std::mem::take(&mut current));
            x = x_start;
            y = y_start;
        }
    }

    // Flush the partial last page; an empty sheet still gets one blank page
    if !current.blocks.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    SheetLayout { pages }
}

/// Replay a layout onto a drawing backend.
pub fn draw_sheet<B: SheetBackend + ?Sized>(layout: &SheetLayout, backend: &mut B) -> Result<()> {
    for page in &layout.pages {
        backend.begin_page()?;
        for block in &page.blocks {
            backend.draw_code(&block.url, block.x, block.y, block.code_size)?;
            for line in &block.captions {
                backend.draw_text(&line.text, line.style, line.font_size, line.x, line.y)?;
            }
        }
    }
    Ok(())
}

/// Lay out and draw the label sheet. Returns the number of pages drawn.
#[instrument(skip_all, fields(count = records.len()))]
pub fn render_label_sheet<B: SheetBackend + ?Sized>(
    records: &[Record],
    geometry: &SheetGeometry,
    base_url: &str,
    backend: &mut B,
) -> Result<usize> {
    geometry.validate()?;
    let layout = layout_sheet(records, geometry, base_url);
    draw_sheet(&layout, backend)?;
    info!(
        "✅ Laid out {} labels on {} page(s)",
        records.len(),
        layout.pages.len()
    );
    Ok(layout.pages.len())
}
