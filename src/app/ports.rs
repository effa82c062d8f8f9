use crate::error::Result;
use std::path::Path;
use thiserror::Error;

/// Where the sheet comes from: the full delimited text, header row included.
pub trait SheetSourcePort {
    fn fetch_csv(&self) -> Result<String>;
}

/// The three publish steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    Stage,
    Commit,
    Push,
}

impl std::fmt::Display for PublishStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PublishStep::Stage => "stage",
            PublishStep::Commit => "commit",
            PublishStep::Push => "push",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("could not run {step} step: {source}")]
    Spawn {
        step: PublishStep,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} step failed: {detail}")]
    Failed { step: PublishStep, detail: String },
}

/// Version-control capability used to publish the snapshot.
pub trait PublisherPort {
    fn stage(&mut self, path: &Path) -> std::result::Result<(), PublishError>;
    fn commit(&mut self, message: &str) -> std::result::Result<(), PublishError>;
    fn push(&mut self) -> std::result::Result<(), PublishError>;

    /// True when the steps only log and nothing reaches the remote.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Caption typefaces used on the label sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionStyle {
    Title,
    Body,
}

/// Drawing primitives for the label sheet. Coordinates are PDF points with the
/// origin at the page's bottom-left corner.
pub trait SheetBackend {
    /// Start a new page; called once before any drawing on that page.
    fn begin_page(&mut self) -> Result<()>;

    /// Draw a square scannable code for `payload` with its bottom-left at (x, y).
    fn draw_code(&mut self, payload: &str, x: f32, y: f32, size: f32) -> Result<()>;

    /// Draw one line of text with its baseline starting at (x, y).
    fn draw_text(&mut self, text: &str, style: CaptionStyle, font_size: f32, x: f32, y: f32) -> Result<()>;

    /// Write the finished document to `path`, replacing any previous file.
    fn finish(&mut self, path: &Path) -> Result<()>;
}
