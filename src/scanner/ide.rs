use crate::model::CategoryType;
use crate::scanner::{FixedLocationScanner, Location};
use std::path::Path;

pub const IDE_LOCATIONS: &[Location] = &[
    // AI editors keep caches next to their config
    Location::new(".cursor", "Cursor IDE cache/config"),
    Location::new(".windsurf", "Windsurf IDE cache/config"),
    Location::new(".kiro", "Kiro IDE cache/config"),
    Location::new(".n8n", "n8n workflow automation data"),
    Location::new("Library/Application Support/Cursor", "Cursor IDE Application Support"),
    Location::new("Library/Application Support/Windsurf", "Windsurf IDE Application Support"),
    Location::new("Library/Caches/Cursor", "Cursor IDE cache"),
    Location::new("Library/Caches/Windsurf", "Windsurf IDE cache"),
    // Photos face/object recognition; rebuilt on demand
    Location::new(
        "Library/Containers/com.apple.mediaanalysisd",
        "Apple Media Analysis (face/object recognition cache) - SAFE TO DELETE",
    ),
    Location::new(
        "Library/Containers/com.apple.mediaanalysisd/Data",
        "Apple Media Analysis Data",
    ),
];

pub fn ide_cache_scanner(home: &Path) -> FixedLocationScanner {
    FixedLocationScanner {
        category: CategoryType::IdeCache,
        home: home.to_path_buf(),
        locations: IDE_LOCATIONS,
        directories_only: true,
    }
}
