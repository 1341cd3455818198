mod allowlist;
mod cleaner;
mod commands;
mod constants;
mod error;
mod model;
mod report;
mod scanner;
mod ui;

use crate::allowlist::Allowlist;
use crate::constants::DEFAULT_MAX_DEPTH;
use crate::model::{CategoryType, ScanConfig, SizeMode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "storagecleaner",
    version,
    about = "Find and remove reclaimable storage",
    long_about = None,
    disable_version_flag = true
)]
struct Cli {
    /// Print version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Log what is skipped and why
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan for storage that can be cleaned
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clean storage
    Clean {
        #[command(flatten)]
        scan: ScanArgs,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,

        /// Show what would be deleted without actually deleting
        #[arg(long)]
        dry_run: bool,

        /// Only clean these paths from the scan results (repeatable)
        #[arg(long = "only", value_name = "PATH")]
        only: Vec<PathBuf>,
    },
    /// Interactive mode - select what to clean
    #[command(alias = "i")]
    Interactive {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Delete the given paths directly, without scanning
    Remove {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Clone)]
struct ScanArgs {
    /// Path to search for node_modules and build artifacts (repeatable)
    #[arg(short, long = "path", value_name = "PATH", default_value = "~")]
    paths: Vec<String>,

    /// What to scan
    #[arg(short = 't', long = "type", value_enum, default_value_t = ScanType::All)]
    scan_type: ScanType,

    /// Only include items older than N days
    #[arg(short, long, default_value_t = 0)]
    days: u64,

    /// Minimum size in MB
    #[arg(short = 's', long, default_value_t = 0)]
    min_size: u64,

    /// Maximum search depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Glob of sub-trees to skip; replaces the built-in excludes (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Report allocated disk usage via `du` instead of summed file sizes
    #[arg(long)]
    disk_usage: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScanType {
    All,
    #[value(name = "node_modules", alias = "dependency-cache")]
    NodeModules,
    #[value(alias = "package-cache")]
    Cache,
    #[value(alias = "browser-cache")]
    Browser,
    #[value(alias = "build-artifact")]
    Build,
    #[value(alias = "ide-cache")]
    Ide,
    #[value(alias = "third-party-trace")]
    Openclaw,
}

impl ScanType {
    fn category(self) -> Option<CategoryType> {
        match self {
            Self::All => None,
            Self::NodeModules => Some(CategoryType::DependencyCache),
            Self::Cache => Some(CategoryType::PackageCache),
            Self::Browser => Some(CategoryType::BrowserCache),
            Self::Build => Some(CategoryType::BuildArtifact),
            Self::Ide => Some(CategoryType::IdeCache),
            Self::Openclaw => Some(CategoryType::ThirdPartyTrace),
        }
    }
}

impl ScanArgs {
    fn to_config(&self) -> ScanConfig {
        ScanConfig {
            search_paths: Some(self.paths.clone()),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            max_depth: Some(self.max_depth),
            min_size: Some(self.min_size.saturating_mul(1024 * 1024)),
            older_than_days: Some(self.days),
            size_mode: if self.disk_usage {
                SizeMode::DiskUsage
            } else {
                SizeMode::Apparent
            },
            allowlist: Allowlist::load(),
            home: None,
        }
    }
}

fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Scan { scan, json } => {
            init_logging(cli.verbose, "warn");
            commands::scan(scan.scan_type.category(), &scan.to_config(), json)
        }
        Command::Clean {
            scan,
            force,
            dry_run,
            only,
        } => {
            init_logging(cli.verbose, "warn");
            let selected = (!only.is_empty()).then_some(only);
            commands::clean(scan.scan_type.category(), &scan.to_config(), force, dry_run, selected)
        }
        Command::Interactive { scan } => {
            // stderr belongs to the TUI
            init_logging(cli.verbose, "off");
            commands::interactive(scan.scan_type.category(), scan.to_config())
        }
        Command::Remove { paths, force } => {
            init_logging(cli.verbose, "warn");
            commands::remove(&paths, force)
        }
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", "Error:".red());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn original_type_names_are_accepted() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["storagecleaner", "scan", "-t", "node_modules", "--min-size", "2"])?;
        let Command::Scan { scan, json } = cli.command else {
            anyhow::bail!("expected scan");
        };
        assert!(!json);
        assert_eq!(scan.scan_type.category(), Some(CategoryType::DependencyCache));

        let config = scan.to_config();
        assert_eq!(config.min_size, Some(2 * 1024 * 1024));
        assert_eq!(config.search_paths(), vec!["~".to_string()]);
        assert!(config.exclude.is_none());
        Ok(())
    }

    #[test]
    fn category_tags_are_aliases() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["storagecleaner", "i", "--type", "third-party-trace"])?;
        let Command::Interactive { scan } = cli.command else {
            anyhow::bail!("expected interactive");
        };
        assert_eq!(scan.scan_type.category(), Some(CategoryType::ThirdPartyTrace));
        Ok(())
    }

    #[test]
    fn clean_collects_selection() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "storagecleaner",
            "clean",
            "--dry-run",
            "--only",
            "/a/node_modules",
            "--only",
            "/b/dist",
            "-x",
            "**/vendor/**",
        ])?;
        let Command::Clean {
            scan, dry_run, only, ..
        } = cli.command
        else {
            anyhow::bail!("expected clean");
        };
        assert!(dry_run);
        assert_eq!(only.len(), 2);
        assert_eq!(scan.to_config().exclude, Some(vec!["**/vendor/**".to_string()]));
        Ok(())
    }
}
