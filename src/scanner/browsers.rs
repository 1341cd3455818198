use crate::model::CategoryType;
use crate::scanner::{FixedLocationScanner, Location};
use std::path::Path;

pub const BROWSER_CACHES: &[Location] = &[
    // Chrome
    Location::new("Library/Caches/Google/Chrome", "Google Chrome cache"),
    Location::new(
        "Library/Application Support/Google/Chrome/Default/Cache",
        "Chrome Default Profile cache",
    ),
    // Safari
    Location::new("Library/Caches/com.apple.Safari", "Safari cache"),
    // Firefox
    Location::new("Library/Caches/Firefox", "Firefox cache"),
    // Brave
    Location::new("Library/Caches/BraveSoftware/Brave-Browser", "Brave Browser cache"),
    // Edge
    Location::new("Library/Caches/Microsoft Edge", "Microsoft Edge cache"),
    // Arc
    Location::new("Library/Caches/company.thebrowser.Browser", "Arc Browser cache"),
];

pub fn browser_cache_scanner(home: &Path) -> FixedLocationScanner {
    FixedLocationScanner {
        category: CategoryType::BrowserCache,
        home: home.to_path_buf(),
        locations: BROWSER_CACHES,
        directories_only: true,
    }
}
