use crate::model::{CleanOutcome, FoundItem, Target};
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    pub dry_run: bool,
    /// Restricts cleaning to these paths. Paths not found among the items are ignored.
    pub selected: Option<Vec<PathBuf>>,
}

/// Deletes every path item independently. A failure is recorded in that
/// item's outcome and never stops the remaining deletions. Process findings
/// are informational and produce no outcome.
pub fn clean(items: &[FoundItem], options: &CleanOptions) -> Vec<CleanOutcome> {
    let selected: Option<HashSet<&Path>> = options
        .selected
        .as_ref()
        .map(|paths| paths.iter().map(PathBuf::as_path).collect());

    items
        .iter()
        .filter_map(|item| match &item.target {
            Target::Path { path } => Some((path.as_path(), item.size)),
            Target::Process { name, .. } => {
                debug!("not cleaning process finding {name}");
                None
            }
        })
        .filter(|(path, _)| selected.as_ref().is_none_or(|s| s.contains(path)))
        .map(|(path, size)| {
            if options.dry_run {
                CleanOutcome::dry_run(path, size)
            } else {
                delete_outcome(path, size)
            }
        })
        .collect()
}

/// Deletes bare paths with no scan metadata; sizes are recorded as zero.
pub fn clean_paths(paths: &[PathBuf]) -> Vec<CleanOutcome> {
    paths.iter().map(|path| delete_outcome(path, 0)).collect()
}

fn delete_outcome(path: &Path, size: u64) -> CleanOutcome {
    match remove_path(path) {
        Ok(()) => {
            debug!("deleted {}", path.display());
            CleanOutcome::deleted(path, size)
        }
        Err(err) => {
            warn!("failed to delete {}: {err}", path.display());
            CleanOutcome::failed(path, size, err.to_string())
        }
    }
}

/// Recursive, forced removal. A path that is already gone counts as removed.
pub fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryType;
    use anyhow::Result;
    use std::fs::File;
    use std::io::Write;
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn item_at(path: &Path, size: u64) -> FoundItem {
        FoundItem::at_path(
            CategoryType::BuildArtifact,
            path.to_path_buf(),
            size,
            SystemTime::now(),
            "test".to_string(),
        )
    }

    fn make_dir(path: &Path) -> Result<()> {
        fs::create_dir_all(path.join("inner"))?;
        let mut f = File::create(path.join("inner/file.bin"))?;
        f.write_all(&[1u8; 64])?;
        Ok(())
    }

    #[test]
    fn dry_run_deletes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        make_dir(&a)?;
        make_dir(&b)?;

        let outcomes = clean(
            &[item_at(&a, 10), item_at(&b, 20)],
            &CleanOptions {
                dry_run: true,
                selected: None,
            },
        );

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.success && o.dry_run));
        assert_eq!(outcomes[0].error.as_deref(), Some("DRY RUN - not actually deleted"));
        assert!(a.exists());
        assert!(b.exists());
        Ok(())
    }

    #[test]
    fn real_clean_removes_directories() -> Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("a");
        make_dir(&a)?;

        let outcomes = clean(&[item_at(&a, 64)], &CleanOptions::default());

        assert_eq!(outcomes, vec![CleanOutcome::deleted(&a, 64)]);
        assert!(!a.exists());
        Ok(())
    }

    #[test]
    fn missing_paths_count_as_success() -> Result<()> {
        let dir = tempdir()?;
        let kept = dir.path().join("kept");
        let gone = dir.path().join("gone");
        make_dir(&kept)?;
        make_dir(&gone)?;
        fs::remove_dir_all(&gone)?;

        let outcomes = clean(&[item_at(&kept, 1), item_at(&gone, 2)], &CleanOptions::default());

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.success && o.error.is_none()));
        assert!(!kept.exists());
        Ok(())
    }

    #[test]
    fn selection_restricts_scope() -> Result<()> {
        let dir = tempdir()?;
        let paths: Vec<PathBuf> = (0..4).map(|i| dir.path().join(format!("d{i}"))).collect();
        for path in &paths {
            make_dir(path)?;
        }
        let items: Vec<FoundItem> = paths.iter().map(|p| item_at(p, 1)).collect();

        let options = CleanOptions {
            dry_run: false,
            selected: Some(vec![
                paths[3].clone(),
                paths[1].clone(),
                dir.path().join("never-scanned"),
            ]),
        };
        let outcomes = clean(&items, &options);

        let cleaned: Vec<&Path> = outcomes.iter().map(|o| o.path.as_path()).collect();
        // item order, not selection order; unknown selections dropped
        assert_eq!(cleaned, vec![paths[1].as_path(), paths[3].as_path()]);
        assert!(paths[0].exists());
        assert!(!paths[1].exists());
        assert!(paths[2].exists());
        assert!(!paths[3].exists());
        Ok(())
    }

    #[test]
    fn failure_is_isolated() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("plain.txt");
        File::create(&file)?;
        let ok = dir.path().join("ok");
        make_dir(&ok)?;
        // a path below a regular file cannot be removed
        let broken = file.join("child");

        let outcomes = clean(&[item_at(&broken, 5), item_at(&ok, 6)], &CleanOptions::default());

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].success);
        assert!(outcomes[0].error.is_some());
        assert_eq!(outcomes[0].size, 5);
        assert!(outcomes[1].success);
        assert!(!ok.exists());
        Ok(())
    }

    #[test]
    fn process_findings_are_ignored() {
        let process = FoundItem {
            category: CategoryType::ThirdPartyTrace,
            target: Target::Process {
                name: "openclaw".to_string(),
                pids: vec![1],
            },
            size: 0,
            last_modified: SystemTime::now(),
            description: String::new(),
        };
        assert!(clean(&[process.clone()], &CleanOptions::default()).is_empty());
        let dry = CleanOptions {
            dry_run: true,
            selected: None,
        };
        assert!(clean(&[process], &dry).is_empty());
    }

    #[test]
    fn clean_paths_records_zero_size() -> Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("a");
        make_dir(&a)?;
        let file = dir.path().join("f.log");
        File::create(&file)?;

        let outcomes = clean_paths(&[a.clone(), file.clone(), dir.path().join("missing")]);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.success && o.size == 0));
        assert!(!a.exists());
        assert!(!file.exists());
        Ok(())
    }
}
