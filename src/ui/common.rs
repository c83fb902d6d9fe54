//! Common UI components shared across the dashboard.
//!
//! This module contains the header bar, status bar, waiting screen and the
//! help overlay.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the header bar with chip identity and throttle state.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                " POWERWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Waiting for first sample..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let (dot_style, throttle_label) = if data.throttling {
        (app.theme.throttle_style(true), "throttle: yes")
    } else {
        (app.theme.throttle_style(false), "throttle: no")
    };

    let line = Line::from(vec![
        Span::styled(" ● ", dot_style),
        Span::styled(
            "POWERWATCH ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::raw(app.soc.banner()),
        Span::raw(" │ "),
        Span::styled(throttle_label, dot_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows the data source, time since last update, available controls, and
/// any source error.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit", err)
    } else if let Some(ref data) = app.data {
        format!(
            " {} | Updated {:.1}s ago | c:cores ?:help q:quit",
            app.source_description(),
            data.last_updated.elapsed().as_secs_f64(),
        )
    } else {
        format!(" {} | Waiting... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the full-frame waiting screen shown before the first reading.
pub fn render_waiting(frame: &mut Frame, app: &App, area: Rect) {
    let msg = format!(
        "Waiting for first sample from {}...\n\nq to quit",
        app.source_description()
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::DIM));

    let y = area.y + area.height.saturating_sub(3) / 2;
    let centered = Rect::new(area.x, y, area.width, 3u16.min(area.height));
    frame.render_widget(paragraph, centered);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.title)]),
        Line::from(""),
        Line::from("  c         Toggle per-core gauges"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q / Esc   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.accent));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 9u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
