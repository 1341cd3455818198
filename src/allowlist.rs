use crate::constants::ALLOWLIST_FILE;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths the user never wants reported, loaded from
/// `<config dir>/storagecleaner/allowlist.txt`.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    /// Rules as written; a leading `~` is expanded against the scan home.
    rules: Vec<PathBuf>,
}

impl Allowlist {
    pub fn new(rules: Vec<PathBuf>) -> Self {
        Self { rules }
    }

    /// Loads the allowlist from the default configuration path.
    /// Returns an empty allowlist if the file doesn't exist or errors.
    pub fn load() -> Self {
        let Some(config_dir) = dirs::config_dir() else {
            return Self::default();
        };
        let allowlist_path = config_dir.join(ALLOWLIST_FILE);
        match fs::read_to_string(&allowlist_path) {
            Ok(contents) => {
                let allowlist = Self::parse(&contents);
                log::debug!(
                    "loaded {} allowlist rules from {}",
                    allowlist.rules.len(),
                    allowlist_path.display()
                );
                allowlist
            }
            Err(_) => Self::default(),
        }
    }

    /// One path per line. Blank lines and `#` comments are skipped.
    pub fn parse(contents: &str) -> Self {
        let rules = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(PathBuf::from)
            .collect();
        Self::new(rules)
    }

    /// Checks if a path is allowed (should be ignored): the path itself or
    /// anything beneath it matches a rule. `home` is the home directory the
    /// scan resolved, which differs from `$HOME` under sudo.
    pub fn is_allowed(&self, path: &Path, home: &Path) -> bool {
        self.rules.iter().any(|rule| match rule.strip_prefix("~") {
            Ok(rest) => path.starts_with(home.join(rest)),
            Err(_) => path.starts_with(rule),
        })
    }
}
