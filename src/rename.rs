use crate::catalog::Candidate;
use crate::resolve::{sanitize_for_filesystem, ResolutionOutcome, CATALOG_TAG};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Target already exists: {0}")]
    Collision(PathBuf),
    #[error("Folder has no parent directory: {0}")]
    NoParent(PathBuf),
    #[error("Failed to rename '{from}' to '{to}': {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What `apply` did (or would have done)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameReport {
    DryRun { from: PathBuf, to: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    /// Folder already has the target name
    Unchanged(PathBuf),
}

/// One decimal, as IMDb publishes ratings
pub fn format_rating(rating: f32) -> String {
    format!("{:.1}", rating)
}

/// `<Title> (<Year>) - IMDb- <Rating>`, made safe for the filesystem
pub fn compute_target_name(candidate: &Candidate) -> String {
    let year = candidate
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown Year".to_string());
    let name = format!(
        "{} ({}) - {}- {}",
        candidate.title,
        year,
        CATALOG_TAG,
        format_rating(candidate.rating)
    );
    sanitize_for_filesystem(&name)
}

/// Target name for a resolution outcome; `None` when the folder stays as is
pub fn target_name_for(outcome: &ResolutionOutcome) -> Option<String> {
    match outcome {
        ResolutionOutcome::Resolved(candidate) => Some(compute_target_name(candidate)),
        ResolutionOutcome::ResolvedCustom(title) => {
            let title = title.trim();
            (!title.is_empty()).then(|| sanitize_for_filesystem(title))
        }
        ResolutionOutcome::Skipped | ResolutionOutcome::Exhausted => None,
    }
}

/// Rename `folder_path` to `target_name` within the same parent directory.
///
/// In dry-run mode nothing touches the filesystem. An existing target is
/// never overwritten.
pub fn apply(folder_path: &Path, target_name: &str, dry_run: bool) -> Result<RenameReport, RenameError> {
    let parent = folder_path
        .parent()
        .ok_or_else(|| RenameError::NoParent(folder_path.to_path_buf()))?;
    let target = parent.join(target_name);

    if target == folder_path {
        info!("'{}' already has its target name", folder_path.display());
        return Ok(RenameReport::Unchanged(target));
    }

    if dry_run {
        info!(
            "Would rename '{}' to '{}'",
            folder_path.display(),
            target.display()
        );
        return Ok(RenameReport::DryRun {
            from: folder_path.to_path_buf(),
            to: target,
        });
    }

    if target.exists() {
        error!(
            "Failed to rename '{}': '{}' already exists",
            folder_path.display(),
            target.display()
        );
        return Err(RenameError::Collision(target));
    }

    std::fs::rename(folder_path, &target).map_err(|source| {
        error!(
            "Failed to rename '{}' to '{}': {}",
            folder_path.display(),
            target.display(),
            source
        );
        RenameError::Io {
            from: folder_path.to_path_buf(),
            to: target.clone(),
            source,
        }
    })?;

    info!("Renamed '{}' to '{}'", folder_path.display(), target.display());
    Ok(RenameReport::Renamed {
        from: folder_path.to_path_buf(),
        to: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::is_already_resolved;
    use tempfile::TempDir;

    fn inception() -> Candidate {
        Candidate {
            title: "Inception".to_string(),
            year: Some(2010),
            rating: 8.8,
            votes: 2_600_000,
            source_id: "tt1375666".to_string(),
        }
    }

    #[test]
    fn test_compute_target_name() {
        assert_eq!(compute_target_name(&inception()), "Inception (2010) - IMDb- 8.8");

        let mut whole = inception();
        whole.rating = 8.0;
        assert_eq!(compute_target_name(&whole), "Inception (2010) - IMDb- 8.0");
    }

    #[test]
    fn test_target_name_is_recognized_as_resolved() {
        assert!(is_already_resolved(&compute_target_name(&inception())));
    }

    #[test]
    fn test_compute_target_name_sanitizes_title() {
        let mut c = inception();
        c.title = "Mission: Impossible / Fallout?".to_string();
        assert_eq!(
            compute_target_name(&c),
            "Mission- Impossible - Fallout- (2010) - IMDb- 8.8"
        );
    }

    #[test]
    fn test_compute_target_name_unknown_year() {
        let mut c = inception();
        c.year = None;
        c.rating = 0.0;
        assert_eq!(compute_target_name(&c), "Inception (Unknown Year) - IMDb- 0.0");
    }

    #[test]
    fn test_target_name_for_outcomes() {
        assert_eq!(
            target_name_for(&ResolutionOutcome::ResolvedCustom("Home Video: 1998".to_string())),
            Some("Home Video- 1998".to_string())
        );
        assert_eq!(target_name_for(&ResolutionOutcome::ResolvedCustom("  ".to_string())), None);
        assert_eq!(target_name_for(&ResolutionOutcome::Skipped), None);
        assert_eq!(target_name_for(&ResolutionOutcome::Exhausted), None);
    }

    #[test]
    fn test_dry_run_does_not_touch_filesystem() {
        let root = TempDir::new().unwrap();
        let folder = root.path().join("Inception.2010.1080p");
        std::fs::create_dir(&folder).unwrap();

        let report = apply(&folder, "Inception (2010) - IMDb- 8.8", true).unwrap();

        assert_eq!(
            report,
            RenameReport::DryRun {
                from: folder.clone(),
                to: root.path().join("Inception (2010) - IMDb- 8.8"),
            }
        );
        assert!(folder.exists());
        assert!(!root.path().join("Inception (2010) - IMDb- 8.8").exists());
    }

    #[test]
    fn test_apply_renames() {
        let root = TempDir::new().unwrap();
        let folder = root.path().join("Inception.2010.1080p");
        std::fs::create_dir(&folder).unwrap();

        let report = apply(&folder, "Inception (2010) - IMDb- 8.8", false).unwrap();

        assert!(matches!(report, RenameReport::Renamed { .. }));
        assert!(!folder.exists());
        assert!(root.path().join("Inception (2010) - IMDb- 8.8").is_dir());
    }

    #[test]
    fn test_apply_refuses_collision() {
        let root = TempDir::new().unwrap();
        let folder = root.path().join("Inception.2010.1080p");
        let existing = root.path().join("Inception (2010) - IMDb- 8.8");
        std::fs::create_dir(&folder).unwrap();
        std::fs::create_dir(&existing).unwrap();

        let err = apply(&folder, "Inception (2010) - IMDb- 8.8", false).unwrap_err();

        assert!(matches!(err, RenameError::Collision(ref p) if p == &existing));
        assert!(folder.exists());
    }
}
