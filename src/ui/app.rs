use crate::cleaner::{self, CleanOptions};
use crate::model::{CategoryType, CleanOutcome, FoundItem, ScanConfig, ScanSummary};
use crate::report;
use crate::scanner;
use ratatui::widgets::ListState;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use sysinfo::Disks;

pub enum AppState {
    Scanning,
    Browsing,
    Confirming,
    Cleaning,
    Done(String),
}

pub struct App {
    pub summary: ScanSummary,
    /// Parallel to `summary.items`.
    pub selected: Vec<bool>,
    pub list_state: ListState,
    pub state: AppState,
    pub disks: Disks,
    pub scan_label: String,
    pub scan_rx: Option<mpsc::Receiver<Result<ScanSummary, String>>>,
    pub cleaning_rx: Option<mpsc::Receiver<Vec<CleanOutcome>>>,
}

impl App {
    pub fn new_scanning() -> Self {
        Self {
            summary: ScanSummary::default(),
            selected: Vec::new(),
            list_state: ListState::default(),
            state: AppState::Scanning,
            disks: Disks::new_with_refreshed_list(),
            scan_label: String::new(),
            scan_rx: None,
            cleaning_rx: None,
        }
    }

    pub fn start_scan(&mut self, category: Option<CategoryType>, config: ScanConfig) {
        self.scan_label = category.map_or_else(
            || "all categories".to_string(),
            |c| c.name().to_lowercase(),
        );
        self.state = AppState::Scanning;

        let (tx, rx) = mpsc::channel();
        self.scan_rx = Some(rx);

        thread::spawn(move || {
            let result = match category {
                Some(category) => scanner::run_one(category, &config),
                None => scanner::run_all(&config),
            };
            let _ = tx.send(result.map_err(|e| e.to_string()));
        });
    }

    pub fn check_scan_status(&mut self) {
        let Some(rx) = &self.scan_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(summary)) => {
                self.set_summary(summary);
                self.state = AppState::Browsing;
                self.scan_rx = None;
            }
            Ok(Err(msg)) => {
                self.state = AppState::Done(format!("Scan failed: {msg}"));
                self.scan_rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.state = AppState::Done("Scan stopped unexpectedly".to_string());
                self.scan_rx = None;
            }
        }
    }

    fn set_summary(&mut self, summary: ScanSummary) {
        self.selected = vec![false; summary.items.len()];
        self.summary = summary;
        let selection = (!self.summary.items.is_empty()).then_some(0);
        self.list_state.select(selection);
    }

    pub fn items(&self) -> &[FoundItem] {
        &self.summary.items
    }

    pub fn current(&self) -> Option<&FoundItem> {
        self.list_state.selected().and_then(|i| self.summary.items.get(i))
    }

    pub fn next(&mut self) {
        let len = self.summary.items.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.summary.items.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Running processes are shown but can't be selected.
    pub fn toggle(&mut self) {
        if let Some(i) = self.list_state.selected()
            && let Some(item) = self.summary.items.get(i)
            && item.path().is_some()
        {
            self.selected[i] = !self.selected[i];
        }
    }

    /// Selects every deletable item, or clears the selection if all are selected already.
    pub fn toggle_all(&mut self) {
        let deletable = |i: usize| self.summary.items[i].path().is_some();
        let all_selected = (0..self.selected.len())
            .filter(|i| deletable(*i))
            .all(|i| self.selected[i]);
        let flags: Vec<bool> = (0..self.selected.len())
            .map(|i| deletable(i) && !all_selected)
            .collect();
        self.selected = flags;
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.summary
            .items
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .filter_map(|(item, _)| item.path().map(PathBuf::from))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    pub fn total_selected_size(&self) -> u64 {
        self.summary
            .items
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(item, _)| item.size)
            .sum()
    }

    pub fn clean_selected(&mut self) {
        let paths = self.selected_paths();
        if paths.is_empty() {
            self.state = AppState::Done("Nothing selected to clean.".to_string());
            return;
        }

        self.state = AppState::Cleaning;

        let (tx, rx) = mpsc::channel();
        self.cleaning_rx = Some(rx);

        let items = self.summary.items.clone();
        thread::spawn(move || {
            let options = CleanOptions {
                dry_run: false,
                selected: Some(paths),
            };
            let _ = tx.send(cleaner::clean(&items, &options));
        });
    }

    pub fn check_cleaning_status(&mut self) {
        let Some(rx) = &self.cleaning_rx else {
            return;
        };
        let outcomes = match rx.try_recv() {
            Ok(outcomes) => outcomes,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.cleaning_rx = None;
                self.state = AppState::Done("Cleaning stopped unexpectedly".to_string());
                self.disks.refresh(true);
                return;
            }
        };
        self.cleaning_rx = None;
        self.state = AppState::Done(report::outcome_message(&outcomes));

        // Drop what is gone and keep failures on screen for another try.
        let removed: HashSet<PathBuf> = outcomes
            .into_iter()
            .filter(|o| o.success)
            .map(|o| o.path)
            .collect();
        let remaining: Vec<FoundItem> = self
            .summary
            .items
            .iter()
            .filter(|item| item.path().is_none_or(|p| !removed.contains(p)))
            .cloned()
            .collect();
        self.set_summary(ScanSummary::from_items(remaining));

        self.disks.refresh(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Target;
    use anyhow::Result;
    use std::fs;
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn item(path: PathBuf, size: u64) -> FoundItem {
        FoundItem::at_path(
            CategoryType::BuildArtifact,
            path,
            size,
            SystemTime::now(),
            "test".to_string(),
        )
    }

    fn process_item() -> FoundItem {
        FoundItem {
            category: CategoryType::ThirdPartyTrace,
            target: Target::Process {
                name: "openclaw".to_string(),
                pids: vec![7],
            },
            size: 0,
            last_modified: SystemTime::now(),
            description: "running".to_string(),
        }
    }

    fn browsing(items: Vec<FoundItem>) -> App {
        let mut app = App::new_scanning();
        app.set_summary(ScanSummary::from_items(items));
        app.state = AppState::Browsing;
        app
    }

    #[test]
    fn check_scan_status_moves_to_browsing() -> Result<()> {
        let mut app = App::new_scanning();
        let (tx, rx) = mpsc::channel();
        app.scan_rx = Some(rx);

        app.check_scan_status();
        assert!(matches!(app.state, AppState::Scanning));

        let summary = ScanSummary::from_items(vec![
            item(PathBuf::from("/a"), 1),
            item(PathBuf::from("/b"), 9),
        ]);
        tx.send(Ok(summary))?;
        app.check_scan_status();

        assert!(matches!(app.state, AppState::Browsing));
        assert!(app.scan_rx.is_none());
        assert_eq!(app.items().len(), 2);
        assert_eq!(app.selected, vec![false, false]);
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.current().map(|i| i.size), Some(9));
        Ok(())
    }

    #[test]
    fn scan_failure_is_reported() -> Result<()> {
        let mut app = App::new_scanning();
        let (tx, rx) = mpsc::channel();
        app.scan_rx = Some(rx);
        tx.send(Err("Invalid exclude pattern".to_string()))?;

        app.check_scan_status();
        assert!(matches!(app.state, AppState::Done(ref msg) if msg.contains("Invalid exclude")));
        Ok(())
    }

    #[test]
    fn navigation_wraps() {
        let mut app = browsing(vec![
            item(PathBuf::from("/a"), 3),
            item(PathBuf::from("/b"), 2),
        ]);
        app.previous();
        assert_eq!(app.list_state.selected(), Some(1));
        app.next();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn processes_cannot_be_selected() {
        let mut app = browsing(vec![item(PathBuf::from("/a"), 3), process_item()]);

        app.next();
        app.toggle();
        assert_eq!(app.selected_count(), 0);

        app.toggle_all();
        assert_eq!(app.selected, vec![true, false]);
        assert_eq!(app.selected_paths(), vec![PathBuf::from("/a")]);
        assert_eq!(app.total_selected_size(), 3);

        app.toggle_all();
        assert_eq!(app.selected_count(), 0);
    }

    #[test]
    fn clean_selected_removes_cleaned_items() -> Result<()> {
        let dir = tempdir()?;
        let gone = dir.path().join("dist");
        let kept = dir.path().join("build");
        fs::create_dir_all(&gone)?;
        fs::create_dir_all(&kept)?;

        let mut app = browsing(vec![item(gone.clone(), 20), item(kept.clone(), 10)]);
        app.toggle();
        app.clean_selected();
        assert!(matches!(app.state, AppState::Cleaning));

        let Some(rx) = app.cleaning_rx.take() else {
            anyhow::bail!("cleaning did not start");
        };
        let outcomes = rx.recv()?;
        let (tx, rx) = mpsc::channel();
        tx.send(outcomes)?;
        app.cleaning_rx = Some(rx);
        app.check_cleaning_status();

        assert!(matches!(app.state, AppState::Done(ref msg) if msg.contains("Successfully cleaned: 1 items")));
        assert!(!gone.exists());
        assert!(kept.exists());
        assert_eq!(app.summary.total_found, 1);
        assert_eq!(app.items()[0].path(), Some(kept.as_path()));
        assert_eq!(app.selected, vec![false]);
        Ok(())
    }

    #[test]
    fn dead_clean_worker_leaves_cleaning_state() {
        let mut app = browsing(vec![item(PathBuf::from("/a"), 3)]);
        let (tx, rx) = mpsc::channel::<Vec<CleanOutcome>>();
        app.cleaning_rx = Some(rx);
        app.state = AppState::Cleaning;

        app.check_cleaning_status();
        assert!(matches!(app.state, AppState::Cleaning));

        drop(tx);
        app.check_cleaning_status();
        assert!(matches!(app.state, AppState::Done(ref msg) if msg.contains("stopped unexpectedly")));
        assert!(app.cleaning_rx.is_none());
        assert_eq!(app.items().len(), 1);
    }

    #[test]
    fn empty_selection_does_nothing() {
        let mut app = browsing(vec![item(PathBuf::from("/a"), 3)]);
        app.clean_selected();
        assert!(app.cleaning_rx.is_none());
        assert!(matches!(app.state, AppState::Done(_)));
    }
}
