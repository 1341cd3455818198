//! Existence, size and age of a single candidate path.

use crate::constants::MILLIS_PER_DAY;
use crate::model::SizeMode;
use jwalk::WalkDir;
use log::debug;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::process::Command;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStats {
    pub size: u64,
    pub last_modified: SystemTime,
    pub is_dir: bool,
}

#[derive(Debug)]
pub enum Probe {
    Found(PathStats),
    Absent,
    Unreadable(io::Error),
}

/// Stats for `path`, or `None` when it is missing or unreadable.
pub fn probe(path: &Path, mode: SizeMode) -> Option<PathStats> {
    match inspect(path, mode) {
        Probe::Found(stats) => Some(stats),
        Probe::Absent => None,
        Probe::Unreadable(err) => {
            debug!("skipping unreadable {}: {err}", path.display());
            None
        }
    }
}

pub fn inspect(path: &Path, mode: SizeMode) -> Probe {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            return Probe::Absent;
        }
        Err(err) => return Probe::Unreadable(err),
    };

    // Own mtime only, not the newest descendant.
    let last_modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let size = if metadata.is_dir() {
        directory_size(path, mode)
    } else {
        metadata.len()
    };

    Probe::Found(PathStats {
        size,
        last_modified,
        is_dir: metadata.is_dir(),
    })
}

pub fn directory_size(path: &Path, mode: SizeMode) -> u64 {
    if mode == SizeMode::DiskUsage {
        match disk_usage(path) {
            Ok(size) => return size,
            Err(err) => debug!("du failed for {}, walking instead: {err}", path.display()),
        }
    }
    walk_size(path)
}

fn disk_usage(path: &Path) -> io::Result<u64> {
    let output = Command::new("du").arg("-sk").arg(path).output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(io::Error::other(stderr.trim().to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .next()
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb.saturating_mul(1024))
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidData, format!("unexpected du output: {stdout}")))
}

/// Sums the lengths of all regular files below `path`. Unreadable entries
/// are skipped.
pub fn walk_size(path: &Path) -> u64 {
    // Use serial execution for individual item size calculation to avoid resource exhaustion
    WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Whole days between `time` and now, rounded up.
pub fn age_in_days(time: SystemTime) -> u64 {
    let elapsed = match SystemTime::now().duration_since(time) {
        Ok(elapsed) => elapsed,
        Err(err) => err.duration(),
    };
    u64::try_from(elapsed.as_millis())
        .unwrap_or(u64::MAX)
        .div_ceil(MILLIS_PER_DAY)
}
