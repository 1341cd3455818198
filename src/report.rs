//! Text rendering of scan summaries and clean outcomes.

use crate::model::{CategoryType, CleanOutcome, FoundItem, ScanSummary};
use chrono::{DateTime, Local};
use crossterm::style::Stylize;
use humansize::{DECIMAL, format_size};
use std::fmt::Write as _;
use std::time::SystemTime;

const TOP_ITEMS: usize = 10;

pub struct CategoryGroup<'a> {
    pub category: CategoryType,
    pub items: Vec<&'a FoundItem>,
    pub total_size: u64,
}

/// Groups items by category, in order of first appearance.
pub fn group_by_category(items: &[FoundItem]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.category == item.category) {
            Some(group) => {
                group.total_size += item.size;
                group.items.push(item);
            }
            None => groups.push(CategoryGroup {
                category: item.category,
                items: vec![item],
                total_size: item.size,
            }),
        }
    }
    groups
}

pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

pub fn format_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%b %-d, %Y").to_string()
}

pub fn render_scan_report(summary: &ScanSummary) -> String {
    let rule = "─".repeat(80);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}\n", "Scan Results".bold().cyan());
    let _ = writeln!(out, "{}", rule.as_str().dark_grey());

    if summary.items.is_empty() {
        let _ = writeln!(out, "{}", "No items found matching criteria.".yellow());
        return out;
    }

    let _ = writeln!(
        out,
        "{}",
        format!(
            "Found {} items - Total size: {}",
            summary.total_found,
            format_bytes(summary.total_size)
        )
        .bold()
    );

    for group in group_by_category(&summary.items) {
        let heading = format!(
            "{} ({} items - {})",
            group.category.short_name().to_uppercase(),
            group.items.len(),
            format_bytes(group.total_size)
        );
        let _ = writeln!(out, "\n{}", heading.bold());
        let _ = writeln!(out, "{}", rule.as_str().dark_grey());

        for item in group.items.iter().take(TOP_ITEMS) {
            let size = format!("{:<12}", format_bytes(item.size));
            let _ = writeln!(out, "{} {}", size.green(), item.label().dark_grey());
            let _ = writeln!(out, "{}{}", " ".repeat(13), item.description.as_str().dim());
        }
        if group.items.len() > TOP_ITEMS {
            let more = format!("... and {} more items", group.items.len() - TOP_ITEMS);
            let _ = writeln!(out, "\n{}", more.dim());
        }
    }

    let _ = writeln!(out, "\n{}", rule.as_str().dark_grey());
    let total = format!("Total recoverable space: {}", format_bytes(summary.total_size));
    let _ = writeln!(out, "\n{}", total.bold().green());
    out
}

/// One line per category, used before asking for confirmation.
pub fn render_category_totals(summary: &ScanSummary) -> String {
    let mut out = String::new();
    for group in group_by_category(&summary.items) {
        let _ = writeln!(
            out,
            "{}",
            format!(
                "{}: {} items - {}",
                group.category.short_name(),
                group.items.len(),
                format_bytes(group.total_size)
            )
            .bold()
        );
    }
    out
}

pub struct CleanTally<'a> {
    pub succeeded: usize,
    pub freed: u64,
    pub failed: Vec<&'a CleanOutcome>,
}

pub fn tally(outcomes: &[CleanOutcome]) -> CleanTally<'_> {
    let succeeded: Vec<&CleanOutcome> = outcomes.iter().filter(|o| o.success).collect();
    CleanTally {
        succeeded: succeeded.len(),
        freed: succeeded.iter().map(|o| o.size).sum(),
        failed: outcomes.iter().filter(|o| !o.success).collect(),
    }
}

/// Plain text summary, shared by the CLI and the TUI popup.
pub fn outcome_message(outcomes: &[CleanOutcome]) -> String {
    let tally = tally(outcomes);
    let mut msg = format!(
        "Successfully cleaned: {} items ({})",
        tally.succeeded,
        format_bytes(tally.freed)
    );
    if !tally.failed.is_empty() {
        let _ = write!(msg, "\nFailed: {} items", tally.failed.len());
        for outcome in &tally.failed {
            let _ = write!(
                msg,
                "\n  {}\n    {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("Unknown error")
            );
        }
    }
    msg
}

pub fn render_clean_report(outcomes: &[CleanOutcome], dry_run: bool) -> String {
    let tally = tally(outcomes);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}\n", "Results".bold().green());
    let cleaned = format!(
        "Successfully cleaned: {} items ({})",
        tally.succeeded,
        format_bytes(tally.freed)
    );
    let _ = writeln!(out, "{}", cleaned.green());

    if !tally.failed.is_empty() {
        let _ = writeln!(out, "{}", format!("Failed: {} items", tally.failed.len()).red());
        let _ = writeln!(out, "\n{}", "Failed items:".bold().red());
        for outcome in &tally.failed {
            let _ = writeln!(out, "{}", format!("  {}", outcome.path.display()).red());
            let detail = format!("    {}", outcome.error.as_deref().unwrap_or("Unknown error"));
            let _ = writeln!(out, "{}", detail.dim());
        }
    }

    if dry_run {
        let _ = writeln!(
            out,
            "\n{}",
            "This was a dry run - nothing was actually deleted".yellow()
        );
    }
    out
}
