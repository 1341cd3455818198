use crate::allowlist::Allowlist;
use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_SEARCH_PATH, DRY_RUN_NOTE};
use crate::error::{Result, ScanError};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryType {
    DependencyCache,
    PackageCache,
    BrowserCache,
    BuildArtifact,
    IdeCache,
    ThirdPartyTrace,
}

impl CategoryType {
    /// Order in which a full scan runs the strategies.
    pub const ALL: [Self; 6] = [
        Self::DependencyCache,
        Self::PackageCache,
        Self::BrowserCache,
        Self::BuildArtifact,
        Self::IdeCache,
        Self::ThirdPartyTrace,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::DependencyCache => "Node Modules",
            Self::PackageCache => "Package Manager Caches",
            Self::BrowserCache => "Browser Caches",
            Self::BuildArtifact => "Build Artifacts",
            Self::IdeCache => "IDE Caches",
            Self::ThirdPartyTrace => "OpenClaw Traces",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::DependencyCache => "node_modules",
            Self::PackageCache => "cache",
            Self::BrowserCache => "browser",
            Self::BuildArtifact => "build",
            Self::IdeCache => "ide",
            Self::ThirdPartyTrace => "openclaw",
        }
    }
}

/// What a finding points at. Only `Path` targets can ever be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Target {
    Path { path: PathBuf },
    Process { name: String, pids: Vec<u32> },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundItem {
    pub category: CategoryType,
    #[serde(flatten)]
    pub target: Target,
    pub size: u64,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_modified: SystemTime,
    pub description: String,
}

impl FoundItem {
    pub fn at_path(
        category: CategoryType,
        path: PathBuf,
        size: u64,
        last_modified: SystemTime,
        description: String,
    ) -> Self {
        Self {
            category,
            target: Target::Path { path },
            size,
            last_modified,
            description,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::Path { path } => Some(path),
            Target::Process { .. } => None,
        }
    }

    /// Path for filesystem findings, `process:<name>` otherwise.
    pub fn label(&self) -> String {
        match &self.target {
            Target::Path { path } => path.display().to_string(),
            Target::Process { name, .. } => format!("process:{name}"),
        }
    }
}

fn serialize_timestamp<S: Serializer>(
    time: &SystemTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    DateTime::<Utc>::from(*time).serialize(serializer)
}

/// Sorts descending by size. Stable, so ties keep emission order.
pub fn sort_by_size(items: &mut [FoundItem]) {
    items.sort_by(|a, b| b.size.cmp(&a.size));
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_found: usize,
    pub total_size: u64,
    pub items: Vec<FoundItem>,
}

impl ScanSummary {
    pub fn from_items(mut items: Vec<FoundItem>) -> Self {
        sort_by_size(&mut items);
        Self {
            total_found: items.len(),
            total_size: items.iter().map(|i| i.size).sum(),
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanOutcome {
    pub path: PathBuf,
    pub size: u64,
    pub success: bool,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CleanOutcome {
    pub fn deleted(path: &Path, size: u64) -> Self {
        Self {
            path: path.to_path_buf(),
            size,
            success: true,
            dry_run: false,
            error: None,
        }
    }

    pub fn dry_run(path: &Path, size: u64) -> Self {
        Self {
            path: path.to_path_buf(),
            size,
            success: true,
            dry_run: true,
            error: Some(DRY_RUN_NOTE.to_string()),
        }
    }

    pub fn failed(path: &Path, size: u64, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            size,
            success: false,
            dry_run: false,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeMode {
    /// Sum of file lengths from a manual walk. Exact byte counts.
    #[default]
    Apparent,
    /// Allocated blocks as reported by `du -sk`, walking only if `du` fails.
    DiskUsage,
}

/// Parameters shared by every scanner. Zero values mean "default" or "no filter".
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    pub search_paths: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub min_size: Option<u64>,
    pub older_than_days: Option<u64>,
    pub size_mode: SizeMode,
    pub allowlist: Allowlist,
    /// Overrides the detected home directory.
    pub home: Option<PathBuf>,
}

impl ScanConfig {
    pub fn search_paths(&self) -> Vec<String> {
        self.search_paths
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_SEARCH_PATH.to_string()])
    }

    /// User supplied excludes replace the scanner defaults entirely.
    pub fn excludes(&self, defaults: &[&str]) -> Vec<String> {
        self.exclude
            .clone()
            .unwrap_or_else(|| defaults.iter().map(ToString::to_string).collect())
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
            .filter(|depth| *depth > 0)
            .unwrap_or(DEFAULT_MAX_DEPTH)
    }

    pub fn passes_min_size(&self, size: u64) -> bool {
        size >= self.min_size.unwrap_or(0)
    }

    pub fn passes_min_age(&self, age_days: u64) -> bool {
        age_days >= self.older_than_days.unwrap_or(0)
    }

    pub fn resolve_home(&self) -> Result<PathBuf> {
        if let Some(home) = &self.home {
            return Ok(home.clone());
        }
        // Under sudo, scan the invoking user's home rather than root's.
        if let Ok(sudo_user) = std::env::var("SUDO_USER")
            && !sudo_user.is_empty()
        {
            return Ok(PathBuf::from("/Users").join(sudo_user));
        }
        dirs::home_dir().ok_or(ScanError::HomeNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn item(size: u64, name: &str) -> FoundItem {
        FoundItem::at_path(
            CategoryType::BuildArtifact,
            PathBuf::from(format!("/tmp/{name}")),
            size,
            SystemTime::UNIX_EPOCH,
            name.to_string(),
        )
    }

    #[test]
    fn summary_totals_and_order() {
        let summary = ScanSummary::from_items(vec![
            item(10, "a"),
            item(300, "b"),
            item(20, "c"),
            item(300, "d"),
        ]);

        assert_eq!(summary.total_found, 4);
        assert_eq!(summary.total_size, 630);
        let sizes: Vec<u64> = summary.items.iter().map(|i| i.size).collect();
        assert_eq!(sizes, vec![300, 300, 20, 10]);
        // ties keep emission order
        assert_eq!(summary.items[0].description, "b");
        assert_eq!(summary.items[1].description, "d");
    }

    #[test]
    fn empty_summary() {
        let summary = ScanSummary::from_items(vec![]);
        assert_eq!(summary.total_found, 0);
        assert_eq!(summary.total_size, 0);
    }

    #[test]
    fn zero_values_mean_defaults() {
        let config = ScanConfig {
            max_depth: Some(0),
            min_size: Some(0),
            older_than_days: Some(0),
            ..ScanConfig::default()
        };
        assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);
        assert!(config.passes_min_size(0));
        assert!(config.passes_min_age(0));
        assert_eq!(config.search_paths(), vec!["~".to_string()]);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let config = ScanConfig {
            min_size: Some(1000),
            older_than_days: Some(7),
            ..ScanConfig::default()
        };
        assert!(!config.passes_min_size(999));
        assert!(config.passes_min_size(1000));
        assert!(!config.passes_min_age(6));
        assert!(config.passes_min_age(7));
    }

    #[test]
    fn custom_excludes_replace_defaults() {
        let mut config = ScanConfig::default();
        assert_eq!(config.excludes(&["**/a/**"]), vec!["**/a/**".to_string()]);

        config.exclude = Some(vec![]);
        assert!(config.excludes(&["**/a/**"]).is_empty());
    }

    #[test]
    fn process_items_have_no_path() {
        let process = FoundItem {
            category: CategoryType::ThirdPartyTrace,
            target: Target::Process {
                name: "openclaw".to_string(),
                pids: vec![42],
            },
            size: 0,
            last_modified: SystemTime::now(),
            description: String::new(),
        };
        assert!(process.path().is_none());
        assert_eq!(process.label(), "process:openclaw");
    }

    #[test]
    fn json_shape() -> anyhow::Result<()> {
        let mut found = item(5, "x");
        found.last_modified = SystemTime::UNIX_EPOCH + Duration::from_secs(86_400);
        let summary = ScanSummary::from_items(vec![found]);

        let value = serde_json::to_value(&summary)?;
        assert_eq!(value["totalFound"], 1);
        assert_eq!(value["totalSize"], 5);
        let first = &value["items"][0];
        assert_eq!(first["category"], "build-artifact");
        assert_eq!(first["kind"], "path");
        assert_eq!(first["path"], "/tmp/x");
        assert_eq!(first["size"], 5);
        assert_eq!(first["lastModified"], "1970-01-02T00:00:00Z");
        Ok(())
    }
}
