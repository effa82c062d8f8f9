use crate::app::ports::{SheetBackend, SheetSourcePort};
use crate::app::publish::PublishUseCase;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::ingestion::fetch_rows;
use crate::pipeline::processing::{admit_rows, IngestOutcome};
use crate::pipeline::render::{render_label_sheet, write_pages};
use crate::pipeline::storage::export_snapshot;
use crate::types::{RunSummary, Record};
use tracing::{info, instrument, warn};

/// What the renderers produced for one record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderCounts {
    pub pages_written: usize,
    pub label_pages: usize,
}

/// Write the detail pages and the label sheet for `records`.
///
/// The renderers run one after the other; if the label sheet fails the pages
/// already written stay on disk.
pub fn render_outputs(
    records: &[Record],
    config: &Config,
    backend: &mut dyn SheetBackend,
) -> Result<RenderCounts> {
    let pages = write_pages(records, &config.output.pages_dir)?;
    let label_pages = render_label_sheet(records, &config.sheet, &config.page_base_url(), backend)?;
    backend.finish(&config.output.label_sheet_path)?;
    Ok(RenderCounts {
        pages_written: pages.len(),
        label_pages,
    })
}

/// One-shot sync: fetch, admit, snapshot, render, publish when the snapshot changed.
pub struct SyncPipeline {
    config: Config,
    source: Box<dyn SheetSourcePort>,
    publisher: Option<PublishUseCase>,
}

impl SyncPipeline {
    /// `publisher` is `None` when publishing is turned off for this run.
    pub fn new(
        config: Config,
        source: Box<dyn SheetSourcePort>,
        publisher: Option<PublishUseCase>,
    ) -> Self {
        Self {
            config,
            source,
            publisher,
        }
    }

    /// Fetch the sheet and admit its rows. Transport failures end the run here,
    /// before anything is written.
    pub fn ingest(&self) -> Result<IngestOutcome> {
        let rows = fetch_rows(self.source.as_ref())?;
        let outcome = admit_rows(rows);
        info!("✅ Final rows to generate labels for: {}", outcome.records.len());
        Ok(outcome)
    }

    #[instrument(skip_all)]
    pub fn run(&mut self, backend: &mut dyn SheetBackend) -> Result<RunSummary> {
        info!("🚀 Starting sheet sync");
        let ingested = self.ingest()?;
        let records = &ingested.records;

        let snapshot = export_snapshot(records, &self.config.output.snapshot_path)?;
        let counts = render_outputs(records, &self.config, backend)?;

        let published = match (snapshot.changed, self.publisher.as_mut()) {
            (true, Some(publisher)) => publisher.publish(&self.config.output.snapshot_path),
            (true, None) => {
                warn!("Snapshot changed but publishing is disabled for this run");
                false
            }
            (false, _) => false,
        };

        Ok(RunSummary {
            raw_rows: ingested.raw_rows,
            admitted: records.len(),
            rejected: ingested.rejections.len(),
            snapshot_changed: snapshot.changed,
            snapshot_digest: snapshot.digest,
            pages_written: counts.pages_written,
            label_pages: counts.label_pages,
            published,
        })
    }
}
