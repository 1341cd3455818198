//! Recursive search for directories with a given name.

use crate::error::{Result, ScanError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use jwalk::WalkDir;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Compiles exclusion globs. Patterns are matched against absolute paths, so
/// `**/Library/**` prunes everything inside any `Library` directory.
pub fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ScanError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ScanError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Finds every directory named `dir_name` at most `max_depth` levels below
/// each root. Excluded entries are neither reported nor descended into, and
/// hidden directories are only reported when their name is `dir_name`.
pub fn search(roots: &[PathBuf], dir_name: &str, max_depth: usize, excludes: &GlobSet) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| search_root(root, dir_name, max_depth, excludes))
        .collect()
}

fn search_root(root: &Path, dir_name: &str, max_depth: usize, excludes: &GlobSet) -> Vec<PathBuf> {
    if let Err(err) = fs::read_dir(root) {
        warn!("cannot search {}: {err}", root.display());
        return vec![];
    }

    let excludes = excludes.clone();
    let target = dir_name.to_string();
    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .max_depth(max_depth)
        .sort(true)
        .parallelism(jwalk::Parallelism::Serial)
        .process_read_dir(move |depth, _path, _state, children| {
            children.retain(|child| match child {
                Ok(entry) => {
                    let name = entry.file_name().to_string_lossy();
                    // Hidden entries only count as matches; tool-owned dot
                    // directories are never walked. The root (no depth yet)
                    // is kept whatever its name.
                    let hidden = depth.is_some() && name.starts_with('.');
                    (!hidden || name == target.as_str()) && !excludes.is_match(entry.path())
                }
                Err(_) => true,
            });
        });

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("skipping unreadable subtree under {}: {err}", root.display());
                None
            }
        })
        .filter(|e| e.depth > 0 && e.file_type().is_dir() && e.file_name().to_string_lossy() == dir_name)
        .map(|e| e.path())
        .collect()
}
