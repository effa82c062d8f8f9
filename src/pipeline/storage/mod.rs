// Persisted JSON snapshot of the admitted records

pub mod snapshot;

pub use snapshot::{export_snapshot, load_snapshot, load_snapshot_rows, render_snapshot, SnapshotOutcome};
