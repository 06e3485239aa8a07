//! Stale-output purge: recursive deletion of a prior generation's output.
//!
//! Generators do not clean up after themselves, and a renamed class or a failed
//! prior run would otherwise leave orphans next to fresh output. Purging runs
//! synchronously, immediately before a generator executes (never after), so the
//! generator always writes into a clean target and regeneration is idempotent.
//!
//! There is no rollback: a failure mid-delete leaves a partially cleaned target
//! and surfaces as a fatal [`GenError::Purge`] with the offending path.

use std::path::PathBuf;

use tracing::debug;

use crate::core::{GenError, Result};

/// Deletes each of `paths` (file or regular directory tree) when `enabled`.
///
/// Disabled purging is a no-op. Non-existence of a target is not an error; any
/// other filesystem failure aborts with the path that could not be deleted.
pub async fn purge_outputs(paths: &[PathBuf], enabled: bool) -> Result<()> {
    if !enabled {
        debug!("purge disabled, keeping previous output");
        return Ok(());
    }

    for path in paths {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "purge target does not exist");
                continue;
            }
            Err(source) => return Err(GenError::Purge { path: path.clone(), source }),
        };

        let result = if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        };
        match result {
            Ok(()) => debug!(path = %path.display(), "purged stale output"),
            // Lost a race with another deleter; the target is gone either way.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(GenError::Purge { path: path.clone(), source }),
        }
    }
    Ok(())
}
