use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use cellar_sync::app::ports::PublisherPort;
use cellar_sync::app::publish::PublishUseCase;
use cellar_sync::config::Config;
use cellar_sync::infra::{DryRunPublisher, GitPublisher, PdfSheetBackend, ReqwestSheetSource};
use cellar_sync::logging;
use cellar_sync::pipeline::processing::admit_rows;
use cellar_sync::pipeline::storage::load_snapshot_rows;
use cellar_sync::pipeline::{render_outputs, SyncPipeline};

const SHEET_TITLE: &str = "Wine labels";

#[derive(Parser)]
#[command(name = "cellar_sync")]
#[command(about = "Sync the wine sheet into a JSON snapshot, detail pages and QR labels")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./cellar_sync.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the sheet, write every output and publish the snapshot if it changed
    Sync {
        /// Write outputs but skip the git publish step
        #[arg(long)]
        no_push: bool,
    },
    /// Fetch and filter the sheet, print what would be admitted, write nothing
    Fetch,
    /// Re-render pages and labels from a saved snapshot, without the network
    Render {
        /// Snapshot to read (defaults to the configured snapshot path)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

fn pdf_backend(config: &Config) -> anyhow::Result<PdfSheetBackend> {
    Ok(PdfSheetBackend::new(
        SHEET_TITLE,
        config.sheet.page_width,
        config.sheet.page_height,
    )?)
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Sync { no_push } => {
            println!("🔄 Syncing wine sheet...");
            let source = ReqwestSheetSource::new(&config.source)?;
            let publisher = if config.publish.enabled {
                let port: Box<dyn PublisherPort> = if no_push {
                    Box::new(DryRunPublisher)
                } else {
                    Box::new(GitPublisher::new(config.publish.repo_dir.clone()))
                };
                Some(PublishUseCase::new(port, config.publish.commit_message.clone()))
            } else {
                None
            };

            let mut backend = pdf_backend(&config)?;
            let mut pipeline = SyncPipeline::new(config, Box::new(source), publisher);
            match pipeline.run(&mut backend) {
                Ok(summary) => {
                    println!("\n📊 Sync results:");
                    println!("   Raw rows: {}", summary.raw_rows);
                    println!("   Admitted: {}", summary.admitted);
                    println!("   Rejected: {}", summary.rejected);
                    println!(
                        "   Snapshot: {} (sha256 {})",
                        if summary.snapshot_changed { "changed" } else { "unchanged" },
                        summary.snapshot_digest
                    );
                    println!("   Detail pages: {}", summary.pages_written);
                    println!("   Label pages: {}", summary.label_pages);
                    let published = match (summary.published, no_push) {
                        (true, _) => "yes",
                        (false, true) => "no (dry run)",
                        (false, false) => "no",
                    };
                    println!("   Published: {}", published);
                }
                Err(e) => {
                    error!("Sync failed: {}", e);
                    println!("❌ Sync failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Fetch => {
            println!("📥 Fetching wine sheet...");
            let source = ReqwestSheetSource::new(&config.source)?;
            let pipeline = SyncPipeline::new(config, Box::new(source), None);
            let outcome = pipeline.ingest()?;
            println!("\n📊 {} of {} rows admitted", outcome.records.len(), outcome.raw_rows);
            for record in &outcome.records {
                println!("   {} {}", record.id(), record.title());
            }
            if !outcome.rejections.is_empty() {
                println!("\n⚠️  Rejected rows:");
                for rejection in &outcome.rejections {
                    println!("   row {} '{}': {}", rejection.row, rejection.id, rejection.reason);
                }
            }
        }
        Commands::Render { snapshot } => {
            let path = snapshot.unwrap_or_else(|| config.output.snapshot_path.clone());
            println!("🔨 Rendering from {}...", path.display());
            let rows = load_snapshot_rows(&path)
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            let outcome = admit_rows(rows);
            let mut backend = pdf_backend(&config)?;
            let counts = render_outputs(&outcome.records, &config, &mut backend)?;
            info!("Rendered {} records", outcome.records.len());
            println!(
                "✅ Wrote {} detail pages and {} label page(s)",
                counts.pages_written, counts.label_pages
            );
        }
    }
    Ok(())
}
