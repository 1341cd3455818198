use crate::constants::OPENCLAW_PROCESS;
use crate::error::Result;
use crate::model::{CategoryType, FoundItem, ScanConfig, Target, sort_by_size};
use crate::scanner::{FixedLocationScanner, Location, Scanner};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::time::SystemTime;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

pub const OPENCLAW_TRACES: &[Location] = &[
    Location::new(".openclaw", "OpenClaw data directory"),
    Location::new(".config/openclaw", "OpenClaw configuration"),
    Location::new(".local/share/openclaw", "OpenClaw local data"),
    Location::new(
        "Library/LaunchAgents/ai.openclaw.gateway.plist",
        "OpenClaw LaunchAgent (Startup file)",
    ),
];

/// Leftover files of OpenClaw plus a check for a still running instance.
pub struct OpenClawScanner {
    pub traces: FixedLocationScanner,
    pub process_pattern: String,
}

impl OpenClawScanner {
    pub fn new(home: &Path) -> Self {
        Self {
            traces: FixedLocationScanner {
                category: CategoryType::ThirdPartyTrace,
                home: home.to_path_buf(),
                locations: OPENCLAW_TRACES,
                // the LaunchAgent entry is a plain file
                directories_only: false,
            },
            process_pattern: OPENCLAW_PROCESS.to_string(),
        }
    }
}

impl Scanner for OpenClawScanner {
    fn category(&self) -> CategoryType {
        CategoryType::ThirdPartyTrace
    }

    fn scan(&self, config: &ScanConfig) -> Result<Vec<FoundItem>> {
        let mut items = self.traces.scan(config)?;

        let pids = find_processes(&self.process_pattern);
        if !pids.is_empty() {
            let list = pids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            log::info!("found running {} processes: {list}", self.process_pattern);
            items.push(FoundItem {
                category: CategoryType::ThirdPartyTrace,
                target: Target::Process {
                    name: self.process_pattern.clone(),
                    pids,
                },
                size: 0,
                last_modified: SystemTime::now(),
                description: format!("OpenClaw process running (PIDs: {list})"),
            });
        }

        sort_by_size(&mut items);
        Ok(items)
    }
}

/// Pids of processes whose name or command line contains `pattern`,
/// excluding this process and its parent.
pub fn find_processes(pattern: &str) -> Vec<u32> {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_cmd(UpdateKind::OnlyIfNotSet),
    );

    let own = sysinfo::get_current_pid().ok();
    let parent = own
        .and_then(|pid| system.process(pid))
        .and_then(sysinfo::Process::parent);

    let mut pids: Vec<u32> = system
        .processes()
        .iter()
        .filter(|(pid, _)| Some(**pid) != own && Some(**pid) != parent)
        .filter(|(_, process)| process.thread_kind().is_none())
        .filter(|(_, process)| process_matches(process.name(), process.cmd(), pattern))
        .map(|(pid, _)| pid.as_u32())
        .collect();
    pids.sort_unstable();
    pids
}

fn process_matches(name: &OsStr, cmd: &[OsString], pattern: &str) -> bool {
    name.to_string_lossy().contains(pattern)
        || cmd.iter().any(|arg| arg.to_string_lossy().contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn process_matching() {
        let cmd = vec![OsString::from("node"), OsString::from("/opt/openclaw/gateway.js")];
        assert!(process_matches(OsStr::new("node"), &cmd, "openclaw"));
        assert!(process_matches(OsStr::new("openclaw-gw"), &[], "openclaw"));
        assert!(!process_matches(OsStr::new("node"), &[OsString::from("server.js")], "openclaw"));
    }

    #[test]
    fn traces_include_files_and_directories() -> Result<()> {
        let dir = tempdir()?;
        let home = dir.path();
        fs::create_dir_all(home.join(".openclaw/sessions"))?;
        File::create(home.join(".openclaw/sessions/log"))?.write_all(&[0u8; 700])?;
        fs::create_dir_all(home.join("Library/LaunchAgents"))?;
        File::create(home.join("Library/LaunchAgents/ai.openclaw.gateway.plist"))?
            .write_all(&[0u8; 50])?;

        let mut scanner = OpenClawScanner::new(home);
        scanner.process_pattern = "storagecleaner-test-no-such-process-7f3a".to_string();
        let items = scanner.scan(&ScanConfig::default())?;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].size, 700);
        assert_eq!(items[1].size, 50);
        assert!(items[1].description.starts_with("OpenClaw LaunchAgent (Startup file)"));
        assert!(items.iter().all(|i| i.path().is_some()));
        Ok(())
    }
}
