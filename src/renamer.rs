use crate::folder_scanner::{scan_media_folders, MediaFolder};
use crate::prompt::InteractiveSelector;
use crate::rename::{self, RenameReport};
use crate::resolve::{is_already_resolved, ResolutionOutcome, ResolutionPipeline};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Path does not exist: {0}")]
    RootMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-run counters, logged once at the end
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub already_named: usize,
    pub renamed: usize,
    /// Dry-run matches that would have been renamed
    pub would_rename: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Walks the root folder one subdirectory at a time: resolve, let the operator
/// choose, rename.
pub struct FolderRenamer {
    pipeline: ResolutionPipeline,
    dry_run: bool,
}

impl FolderRenamer {
    pub fn new(pipeline: ResolutionPipeline, dry_run: bool) -> Self {
        Self { pipeline, dry_run }
    }

    /// Process every folder under `root`. Only a missing or unreadable root is
    /// an error; per-folder failures are logged and counted.
    pub async fn run(
        &self,
        root: &Path,
        selector: &mut dyn InteractiveSelector,
    ) -> Result<RunSummary, RunError> {
        if !root.is_dir() {
            error!("Path does not exist: {}", root.display());
            return Err(RunError::RootMissing(root.to_path_buf()));
        }

        let folders = scan_media_folders(root)?;
        info!(
            "Processing {} folder(s) under {} (dry run: {})",
            folders.len(),
            root.display(),
            self.dry_run
        );

        let mut summary = RunSummary::default();
        for folder in &folders {
            self.process_folder(folder, selector, &mut summary).await;
        }

        info!(
            "Run complete: {} processed, {} already named, {} renamed, {} would rename, {} skipped, {} failed",
            summary.processed,
            summary.already_named,
            summary.renamed,
            summary.would_rename,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    async fn process_folder(
        &self,
        folder: &MediaFolder,
        selector: &mut dyn InteractiveSelector,
        summary: &mut RunSummary,
    ) {
        if is_already_resolved(&folder.name) {
            info!("Skipping already properly named folder: {}", folder.name);
            summary.already_named += 1;
            return;
        }

        println!("\nProcessing folder: {}", folder.name);
        info!("Processing folder: {}", folder.name);
        summary.processed += 1;

        let outcome = match self.pipeline.resolve(&folder.name, selector).await {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("Catalog lookup failed for '{}': {}", folder.name, e);
                error!("Aborting folder '{}': {}", folder.name, e);
                summary.failed += 1;
                return;
            }
        };

        let Some(target_name) = rename::target_name_for(&outcome) else {
            if outcome == ResolutionOutcome::Exhausted {
                println!("No match found. Skipping folder: {}", folder.name);
            }
            info!("Skipped folder: {} ({:?})", folder.name, outcome);
            summary.skipped += 1;
            return;
        };

        match rename::apply(&folder.path, &target_name, self.dry_run) {
            Ok(RenameReport::DryRun { from, to }) => {
                println!("Would rename '{}' to '{}'", from.display(), to.display());
                summary.would_rename += 1;
            }
            Ok(RenameReport::Renamed { .. }) => {
                println!("Renamed to: {}", target_name);
                summary.renamed += 1;
            }
            Ok(RenameReport::Unchanged(_)) => {
                summary.skipped += 1;
            }
            Err(e) => {
                println!("{}", e);
                warn!("Folder '{}' left unrenamed: {}", folder.name, e);
                summary.failed += 1;
            }
        }
    }
}
