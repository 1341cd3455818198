use crate::report::{format_bytes, format_date, group_by_category};
use crate::ui::app::{App, AppState};
use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = concat!("storagecleaner v", env!("CARGO_PKG_VERSION"));
    let disk_info = app
        .disks
        .list()
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"));

    let header_text = if let Some(disk) = disk_info {
        let total = disk.total_space();
        let used = total.saturating_sub(disk.available_space());
        let percent = if total > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                (used as f64 / total as f64) * 100.0
            }
        } else {
            0.0
        };

        format!(
            "{title} | Disk: {} / {} ({percent:.1}% Used) | Found: {} ({})",
            format_bytes(used),
            format_bytes(total),
            app.summary.total_found,
            format_bytes(app.summary.total_size)
        )
    } else {
        format!("{title} | Disk: N/A")
    };

    let header = Paragraph::new(header_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

pub fn render_items_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .items()
        .iter()
        .zip(&app.selected)
        .map(|(item, selected)| {
            let checkbox = match (item.path(), selected) {
                (None, _) => "[-]",
                (Some(_), true) => "[x]",
                (Some(_), false) => "[ ]",
            };
            let content = format!(
                "{checkbox} {:>10}  {:<12} {}",
                format_bytes(item.size),
                item.category.short_name(),
                item.label()
            );
            ListItem::new(content)
        })
        .collect();

    let title = format!("Items ({})", app.summary.total_found);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Yellow),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.list_state);
}

pub fn render_usage_chart(f: &mut Frame, app: &App, area: Rect) {
    let data: Vec<(&str, u64)> = group_by_category(app.items())
        .into_iter()
        .map(|group| (group.category.short_name(), group.total_size / 1_000_000))
        .collect();

    let barchart = BarChart::default()
        .block(
            Block::default()
                .title("Reclaimable by Category (MB)")
                .borders(Borders::ALL),
        )
        .data(&data)
        .bar_width(10)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::White).bg(Color::Cyan));

    f.render_widget(barchart, area);
}

pub fn render_details_text(f: &mut Frame, app: &App, area: Rect) {
    let Some(item) = app.current() else {
        f.render_widget(
            Block::default().borders(Borders::ALL).title("Details"),
            area,
        );
        return;
    };

    let details_text = format!(
        "{}\n\nSize: {}\nLast modified: {}\n\n{}",
        item.label(),
        format_bytes(item.size),
        format_date(item.last_modified),
        item.description
    );

    let details = Paragraph::new(details_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Details: {}", item.category.name())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(details, area);
}

pub fn render_details(f: &mut Frame, app: &App, area: Rect) {
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_usage_chart(f, app, right_chunks[0]);
    render_details_text(f, app, right_chunks[1]);
}

pub fn render_scanning(f: &mut Frame, app: &App, area: Rect) {
    let text = format!("Scanning {}...\n\n[q] Quit", app.scan_label);
    let scanning = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Scanning"))
        .alignment(Alignment::Center);
    f.render_widget(scanning, area);
}

pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let total_selected = format_bytes(app.total_selected_size());
    let footer_text = match app.state {
        AppState::Scanning => "Scanning... [q] Quit".to_string(),
        AppState::Browsing => format!(
            "Selected: {} items ({total_selected}) | [Space] Toggle [a] All [Enter] Clean [q] Quit",
            app.selected_count()
        ),
        AppState::Confirming => format!(
            "PERMANENTLY DELETE {} items ({total_selected})? | [y] Confirm [n/Esc] Cancel",
            app.selected_count()
        ),
        AppState::Cleaning => "Cleaning... (This may take a while)".to_string(),
        AppState::Done(_) => "Done! [Press key to continue]".to_string(),
    };

    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

pub fn render_popup(f: &mut Frame, app: &App) {
    if let AppState::Done(ref msg) = app.state {
        let block = Block::default().title("Results").borders(Borders::ALL);
        let area = centered_rect(60, 30, f.area());
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(msg.as_str())
                .block(block)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
