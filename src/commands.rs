use crate::cleaner::{self, CleanOptions};
use crate::model::{CategoryType, ScanConfig, ScanSummary};
use crate::report::{self, format_bytes};
use crate::scanner;
use crate::ui::{self, app::App};
use anyhow::Result;
use crossterm::{
    execute,
    style::Stylize,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use indicatif::{ProgressBar, ProgressStyle};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

fn spinner(message: &str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message.to_string());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn run_scan(category: Option<CategoryType>, config: &ScanConfig) -> Result<ScanSummary> {
    let label = category.map_or_else(
        || "Scanning all...".to_string(),
        |c| format!("Scanning {}...", c.name().to_lowercase()),
    );
    let progress = spinner(&label);

    let result = match category {
        Some(category) => scanner::run_one(category, config),
        None => scanner::run_all(config),
    };
    match result {
        Ok(summary) => {
            progress.finish_with_message("Scan complete!");
            Ok(summary)
        }
        Err(err) => {
            progress.abandon_with_message("Scan failed");
            Err(err.into())
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn scan(category: Option<CategoryType>, config: &ScanConfig, json: bool) -> Result<()> {
    let summary = run_scan(category, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print!("{}", report::render_scan_report(&summary));
    if !summary.items.is_empty() {
        println!("\n{}", "Run with --json to get full results in JSON format".dim());
        println!(
            "{}\n",
            "Run \"storagecleaner interactive\" to select items to clean".dim()
        );
    }
    Ok(())
}

pub fn clean(
    category: Option<CategoryType>,
    config: &ScanConfig,
    force: bool,
    dry_run: bool,
    selected: Option<Vec<PathBuf>>,
) -> Result<()> {
    let summary = run_scan(category, config)?;

    if summary.items.is_empty() {
        println!("\n{}", "No items found to clean.".yellow());
        return Ok(());
    }

    let options = CleanOptions { dry_run, selected };
    // A dry run of the same selection tells us exactly what will be touched.
    let preview = cleaner::clean(
        &summary.items,
        &CleanOptions {
            dry_run: true,
            selected: options.selected.clone(),
        },
    );
    let preview_size: u64 = preview.iter().map(|o| o.size).sum();

    println!("\n{}\n", "Items to clean".bold().cyan());
    let found = format!(
        "Found {} items - Total size: {}\n",
        summary.total_found,
        format_bytes(summary.total_size)
    );
    println!("{}", found.bold());
    if dry_run {
        println!("{}\n", "DRY RUN MODE - Nothing will be deleted".yellow());
    }
    print!("{}", report::render_category_totals(&summary));

    if preview.is_empty() {
        println!("\n{}", "None of the selected paths were found.".yellow());
        return Ok(());
    }

    if !force && !dry_run {
        let prompt = format!(
            "Are you sure you want to delete {} items ({})?",
            preview.len(),
            format_bytes(preview_size)
        );
        if !confirm(&prompt)? {
            println!("\n{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    let progress = spinner("Cleaning...");
    let outcomes = cleaner::clean(&summary.items, &options);
    progress.finish_with_message("Cleaning complete!");

    print!("{}", report::render_clean_report(&outcomes, dry_run));
    Ok(())
}

pub fn remove(paths: &[PathBuf], force: bool) -> Result<()> {
    if !force {
        for path in paths {
            println!("  {}", path.display());
        }
        let prompt = format!("Permanently delete {} paths?", paths.len());
        if !confirm(&prompt)? {
            println!("\n{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    let outcomes = cleaner::clean_paths(paths);
    print!("{}", report::render_clean_report(&outcomes, false));
    Ok(())
}

pub fn interactive(category: Option<CategoryType>, config: ScanConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new_scanning();
    app.start_scan(category, config);

    let res = ui::run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
