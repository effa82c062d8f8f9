use crate::app::ports::{CaptionStyle, SheetBackend};
use crate::error::{Result, SyncError};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Rect, Rgb,
};
use qrcode::QrCode;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Light modules around the symbol, as scanners expect
const QUIET_ZONE: usize = 4;

const LAYER_NAME: &str = "Labels";

fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

fn render_err(e: impl std::fmt::Display) -> SyncError {
    SyncError::Render(e.to_string())
}

/// Label sheet backend writing a PDF with vector QR codes and builtin Helvetica.
pub struct PdfSheetBackend {
    /// Taken by `finish`
    doc: Option<PdfDocumentReference>,
    title_font: IndirectFontRef,
    body_font: IndirectFontRef,
    width: Mm,
    height: Mm,
    /// Page created together with the document, handed out by the first `begin_page`
    initial_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    pages: usize,
}

impl PdfSheetBackend {
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Result<Self> {
        let (width, height) = (mm(page_width), mm(page_height));
        let (doc, page, layer) = PdfDocument::new(title, width, height, LAYER_NAME);
        let title_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_err)?;
        let body_font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_err)?;
        Ok(Self {
            doc: Some(doc),
            title_font,
            body_font,
            width,
            height,
            initial_page: Some((page, layer)),
            layer: None,
            pages: 0,
        })
    }

    fn layer(&self) -> Result<&PdfLayerReference> {
        self.layer
            .as_ref()
            .ok_or_else(|| SyncError::Render("drawing before the first page was started".into()))
    }

    fn doc(&self) -> Result<&PdfDocumentReference> {
        self.doc
            .as_ref()
            .ok_or_else(|| SyncError::Render("document already written".into()))
    }
}

impl SheetBackend for PdfSheetBackend {
    fn begin_page(&mut self) -> Result<()> {
        let initial = self.initial_page.take();
        let doc = self.doc()?;
        let (page, layer) = match initial {
            Some(initial) => initial,
            None => doc.add_page(self.width, self.height, LAYER_NAME),
        };
        let layer = doc.get_page(page).get_layer(layer);
        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer = Some(layer);
        self.pages += 1;
        Ok(())
    }

    fn draw_code(&mut self, payload: &str, x: f32, y: f32, size: f32) -> Result<()> {
        let code = QrCode::new(payload.as_bytes()).map_err(render_err)?;
        let width = code.width();
        let module = size / (width + 2 * QUIET_ZONE) as f32;
        let layer = self.layer()?;

        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color != qrcode::Color::Dark {
                continue;
            }
            let (row, col) = (i / width, i % width);
            let left = x + (col + QUIET_ZONE) as f32 * module;
            // QR rows run top-down, PDF y runs bottom-up
            let bottom = y + size - (row + QUIET_ZONE + 1) as f32 * module;
            layer.add_rect(Rect::new(mm(left), mm(bottom), mm(left + module), mm(bottom + module)));
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, style: CaptionStyle, font_size: f32, x: f32, y: f32) -> Result<()> {
        let font = match style {
            CaptionStyle::Title => &self.title_font,
            CaptionStyle::Body => &self.body_font,
        };
        self.layer()?.use_text(text, font_size, mm(x), mm(y), font);
        Ok(())
    }

    fn finish(&mut self, path: &Path) -> Result<()> {
        let doc = self
            .doc
            .take()
            .ok_or_else(|| SyncError::Render("document already written".into()))?;
        self.layer = None;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        doc.save(&mut writer).map_err(render_err)?;
        writer.flush()?;
        info!("✅ PDF saved: {} ({} page(s))", path.display(), self.pages);
        Ok(())
    }
}
