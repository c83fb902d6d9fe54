//! Power charts: CPU and GPU sparklines with instant/average/peak readouts.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Sparkline},
    Frame,
};

use crate::app::App;
use crate::data::PowerReading;

/// Render the power chart block.
///
/// The outer block carries the combined-power readout and the throttle flag;
/// the two inner sparklines chart CPU and GPU power as a percent of each
/// channel's maximum, so the vertical scale is stable across chips.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let throttle = if data.throttling { "yes" } else { "no" };
    let outer = Block::default()
        .title(format!(
            " Combined {} throttle: {} ",
            readout(&data.combined_power),
            throttle
        ))
        .title_style(app.theme.throttle_style(data.throttling))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let halves =
        Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(inner);

    render_chart(
        frame,
        app,
        halves[0],
        format!(" CPU {} ", readout(&data.cpu_power)),
        app.history.cpu().iter().copied().collect(),
    );
    render_chart(
        frame,
        app,
        halves[1],
        format!(" GPU {} ", readout(&data.gpu_power)),
        app.history.gpu().iter().copied().collect(),
    );
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect, title: String, points: Vec<u64>) {
    // Show only the newest points that fit the chart width.
    let width = area.width.saturating_sub(2) as usize;
    let start = points.len().saturating_sub(width.max(1));

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.accent))
        .max(100)
        .data(points[start..].iter().copied());

    frame.render_widget(sparkline, area);
}

fn readout(reading: &PowerReading) -> String {
    format!(
        "{:.2}W (avg: {:.2}W peak: {:.2}W)",
        reading.instant_w, reading.average_w, reading.peak_w
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_format() {
        let reading = PowerReading {
            instant_w: 5.0,
            average_w: 4.25,
            peak_w: 8.125,
        };
        assert_eq!(readout(&reading), "5.00W (avg: 4.25W peak: 8.12W)");
    }
}
