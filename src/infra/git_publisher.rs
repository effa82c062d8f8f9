use crate::app::ports::{PublishError, PublishStep, PublisherPort};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Publishes by shelling out to `git` inside a working tree.
pub struct GitPublisher {
    repo_dir: PathBuf,
}

impl GitPublisher {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    fn run(&self, step: PublishStep, args: &[&str]) -> Result<(), PublishError> {
        debug!("git {} (in {})", args.join(" "), self.repo_dir.display());
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|source| PublishError::Spawn { step, source })?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(PublishError::Failed {
            step,
            detail: format!("{} ({})", output.status, stderr.trim()),
        })
    }
}

impl PublisherPort for GitPublisher {
    fn stage(&mut self, path: &Path) -> Result<(), PublishError> {
        // git runs inside repo_dir, so hand it a path that does not depend on our cwd
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let path = path.to_string_lossy();
        self.run(PublishStep::Stage, &["add", path.as_ref()])
    }

    fn commit(&mut self, message: &str) -> Result<(), PublishError> {
        self.run(PublishStep::Commit, &["commit", "-m", message])
    }

    fn push(&mut self) -> Result<(), PublishError> {
        self.run(PublishStep::Push, &["push"])
    }
}

/// Publisher that only logs; used for `--no-push` runs.
pub struct DryRunPublisher;

impl PublisherPort for DryRunPublisher {
    fn stage(&mut self, path: &Path) -> Result<(), PublishError> {
        debug!("dry run: would stage {}", path.display());
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<(), PublishError> {
        debug!("dry run: would commit '{}'", message);
        Ok(())
    }

    fn push(&mut self) -> Result<(), PublishError> {
        debug!("dry run: would push");
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_repo_dir_reports_spawn_failure() {
        let mut publisher = GitPublisher::new("/nonexistent/cellar_sync/repo");
        let err = publisher.stage(Path::new("wines.json")).unwrap_err();
        assert!(matches!(err, PublishError::Spawn { step: PublishStep::Stage, .. }));
    }
}
