use crate::constants::{BUILD_DIRS, BUILD_EXCLUDES, NODE_MODULES, NODE_MODULES_EXCLUDES};
use crate::model::CategoryType;
use crate::scanner::PatternScanner;
use std::path::Path;

pub fn node_modules_scanner(home: &Path) -> PatternScanner {
    PatternScanner {
        category: CategoryType::DependencyCache,
        home: home.to_path_buf(),
        dir_names: &[NODE_MODULES],
        default_excludes: NODE_MODULES_EXCLUDES,
        label: project_label,
    }
}

pub fn build_artifact_scanner(home: &Path) -> PatternScanner {
    PatternScanner {
        category: CategoryType::BuildArtifact,
        home: home.to_path_buf(),
        dir_names: BUILD_DIRS,
        default_excludes: BUILD_EXCLUDES,
        label: artifact_label,
    }
}

/// Name of the directory holding the match, e.g. `my-app`.
fn project_label(dir: &Path) -> String {
    dir.parent()
        .and_then(Path::file_name)
        .map_or_else(|| dir.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// `my-app/dist`
fn artifact_label(dir: &Path) -> String {
    let artifact = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}/{artifact}", project_label(dir))
}
