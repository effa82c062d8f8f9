use crate::app::ports::{PublishError, PublisherPort};
use std::path::Path;
use tracing::{error, info, instrument};

/// Use case for publishing the snapshot: stage, commit, push.
pub struct PublishUseCase {
    publisher: Box<dyn PublisherPort>,
    commit_message: String,
}

impl PublishUseCase {
    pub fn new(publisher: Box<dyn PublisherPort>, commit_message: impl Into<String>) -> Self {
        Self {
            publisher,
            commit_message: commit_message.into(),
        }
    }

    /// Run the three steps in order, stopping at the first failure.
    pub fn try_publish(&mut self, snapshot: &Path) -> Result<(), PublishError> {
        self.publisher.stage(snapshot)?;
        self.publisher.commit(&self.commit_message)?;
        self.publisher.push()
    }

    /// Publish and report whether the snapshot reached the remote. Failures are
    /// logged, never propagated. A dry run always reports `false`.
    #[instrument(skip(self, snapshot), fields(snapshot = %snapshot.display()))]
    pub fn publish(&mut self, snapshot: &Path) -> bool {
        match self.try_publish(snapshot) {
            Ok(()) if self.publisher.is_dry_run() => {
                info!("Dry run, {} not pushed", snapshot.display());
                false
            }
            Ok(()) => {
                info!("✅ Successfully pushed {}", snapshot.display());
                true
            }
            Err(e) => {
                error!("❌ Git push failed: {}", e);
                false
            }
        }
    }
}
