use crate::model::CategoryType;
use crate::scanner::{FixedLocationScanner, Location};
use std::path::Path;

pub const PACKAGE_CACHES: &[Location] = &[
    Location::new(".npm", "npm cache"),
    Location::new(".yarn/cache", "Yarn cache"),
    Location::new("Library/Caches/pnpm", "pnpm cache"),
    Location::new("Library/Caches/Homebrew", "Homebrew cache"),
    Location::new("Library/Caches/pip", "pip cache"),
    Location::new(".cache/pip", "pip cache (alternative)"),
    Location::new("Library/Caches/turborepo", "Turborepo cache"),
    Location::new("Library/Caches/next.js", "Next.js cache"),
];

pub fn package_cache_scanner(home: &Path) -> FixedLocationScanner {
    FixedLocationScanner {
        category: CategoryType::PackageCache,
        home: home.to_path_buf(),
        locations: PACKAGE_CACHES,
        directories_only: true,
    }
}
