pub const NODE_MODULES: &str = "node_modules";
pub const BUILD_DIRS: &[&str] = &["dist", "build", ".next", "out", ".turbo", ".cache", "coverage"];

pub const DEFAULT_SEARCH_PATH: &str = "~";
pub const DEFAULT_MAX_DEPTH: usize = 5;

pub const NODE_MODULES_EXCLUDES: &[&str] = &["**/Library/**", "**/System/**", "**/.Trash/**"];
pub const BUILD_EXCLUDES: &[&str] = &[
    "**/Library/**",
    "**/System/**",
    "**/.Trash/**",
    "**/node_modules/**",
];

pub const OPENCLAW_PROCESS: &str = "openclaw";

pub const ALLOWLIST_FILE: &str = "storagecleaner/allowlist.txt";

pub const DRY_RUN_NOTE: &str = "DRY RUN - not actually deleted";

pub const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;
