pub mod browsers;
pub mod caches;
pub mod dev;
pub mod ide;
pub mod openclaw;
pub mod probe;
pub mod search;

use crate::error::Result;
use crate::model::{CategoryType, FoundItem, ScanConfig, ScanSummary, sort_by_size};
use crate::scanner::probe::{age_in_days, probe};
use crate::scanner::search::{build_excludes, search};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

pub trait Scanner {
    fn category(&self) -> CategoryType;
    /// Findings sorted descending by size. Only configuration errors fail.
    fn scan(&self, config: &ScanConfig) -> Result<Vec<FoundItem>>;
}

/// A candidate path relative to the home directory.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub path: &'static str,
    pub description: &'static str,
}

impl Location {
    pub const fn new(path: &'static str, description: &'static str) -> Self {
        Self { path, description }
    }
}

/// Probes a static table of well-known locations.
pub struct FixedLocationScanner {
    pub category: CategoryType,
    pub home: PathBuf,
    pub locations: &'static [Location],
    /// Skip candidates that exist but are not directories.
    pub directories_only: bool,
}

impl Scanner for FixedLocationScanner {
    fn category(&self) -> CategoryType {
        self.category
    }

    fn scan(&self, config: &ScanConfig) -> Result<Vec<FoundItem>> {
        let mut items = Vec::new();

        for location in self.locations {
            let path = self.home.join(location.path);
            if config.allowlist.is_allowed(&path, &self.home) {
                debug!("{} is allowlisted", path.display());
                continue;
            }
            let Some(stats) = probe(&path, config.size_mode) else {
                continue;
            };
            if self.directories_only && !stats.is_dir {
                debug!("{} is not a directory", path.display());
                continue;
            }
            if !config.passes_min_size(stats.size) {
                continue;
            }

            let description = format!(
                "{} - Last modified {} days ago",
                location.description,
                age_in_days(stats.last_modified)
            );
            items.push(FoundItem::at_path(
                self.category,
                path,
                stats.size,
                stats.last_modified,
                description,
            ));
        }

        sort_by_size(&mut items);
        info!("{}: {} items", self.category.name(), items.len());
        Ok(items)
    }
}

/// Searches the configured roots for directories with well-known names.
pub struct PatternScanner {
    pub category: CategoryType,
    pub home: PathBuf,
    pub dir_names: &'static [&'static str],
    pub default_excludes: &'static [&'static str],
    /// Human readable name for a match, derived from its location.
    pub label: fn(&Path) -> String,
}

impl PatternScanner {
    fn resolve_roots(&self, config: &ScanConfig) -> Vec<PathBuf> {
        config
            .search_paths()
            .iter()
            .filter_map(|raw| {
                if raw.trim().is_empty() {
                    warn!("ignoring empty search path");
                    return None;
                }
                let expanded = expand_path(raw, &self.home);
                match std::path::absolute(&expanded) {
                    Ok(root) => Some(root),
                    Err(err) => {
                        warn!("ignoring search path {raw}: {err}");
                        None
                    }
                }
            })
            .collect()
    }
}

impl Scanner for PatternScanner {
    fn category(&self) -> CategoryType {
        self.category
    }

    fn scan(&self, config: &ScanConfig) -> Result<Vec<FoundItem>> {
        let excludes = build_excludes(&config.excludes(self.default_excludes))?;
        let max_depth = config.max_depth();
        let mut items = Vec::new();

        for root in self.resolve_roots(config) {
            for dir_name in self.dir_names {
                for dir in search(std::slice::from_ref(&root), dir_name, max_depth, &excludes) {
                    if config.allowlist.is_allowed(&dir, &self.home) {
                        debug!("{} is allowlisted", dir.display());
                        continue;
                    }
                    let Some(stats) = probe(&dir, config.size_mode) else {
                        continue;
                    };
                    if !config.passes_min_size(stats.size) {
                        continue;
                    }
                    let age = age_in_days(stats.last_modified);
                    if !config.passes_min_age(age) {
                        continue;
                    }

                    let description = format!("{} - Last modified {age} days ago", (self.label)(&dir));
                    items.push(FoundItem::at_path(
                        self.category,
                        dir,
                        stats.size,
                        stats.last_modified,
                        description,
                    ));
                }
            }
        }

        sort_by_size(&mut items);
        info!("{}: {} items", self.category.name(), items.len());
        Ok(items)
    }
}

/// Expands a leading `~` to `home`.
pub fn expand_path(input: &str, home: &Path) -> PathBuf {
    match input.strip_prefix('~') {
        Some(rest) => home.join(rest.trim_start_matches('/')),
        None => PathBuf::from(input),
    }
}

pub fn scanner_for(category: CategoryType, home: &Path) -> Box<dyn Scanner> {
    match category {
        CategoryType::DependencyCache => Box::new(dev::node_modules_scanner(home)),
        CategoryType::PackageCache => Box::new(caches::package_cache_scanner(home)),
        CategoryType::BrowserCache => Box::new(browsers::browser_cache_scanner(home)),
        CategoryType::BuildArtifact => Box::new(dev::build_artifact_scanner(home)),
        CategoryType::IdeCache => Box::new(ide::ide_cache_scanner(home)),
        CategoryType::ThirdPartyTrace => Box::new(openclaw::OpenClawScanner::new(home)),
    }
}

pub fn get_all_scanners(home: &Path) -> Vec<Box<dyn Scanner>> {
    CategoryType::ALL
        .iter()
        .map(|category| scanner_for(*category, home))
        .collect()
}

pub fn run_all(config: &ScanConfig) -> Result<ScanSummary> {
    let home = config.resolve_home()?;
    run_scanners(&get_all_scanners(&home), config)
}

pub fn run_one(category: CategoryType, config: &ScanConfig) -> Result<ScanSummary> {
    let home = config.resolve_home()?;
    run_scanners(&[scanner_for(category, &home)], config)
}

/// Runs each scanner in turn and merges the findings. Overlapping paths
/// reported by two scanners are kept twice.
pub fn run_scanners(scanners: &[Box<dyn Scanner>], config: &ScanConfig) -> Result<ScanSummary> {
    let mut items = Vec::new();
    for scanner in scanners {
        debug!("scanning {}", scanner.category().name());
        items.extend(scanner.scan(config)?);
    }
    Ok(ScanSummary::from_items(items))
}
