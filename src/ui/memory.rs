//! Memory block: RAM gauge with optional swap readout.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::app::App;
use crate::system::MemoryMetrics;

/// Render the memory usage gauge.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let ratio = if data.memory.total_gb > 0.0 {
        (data.memory.used_gb / data.memory.total_gb).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(title(&data.memory))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .gauge_style(Style::default().fg(app.theme.gauge))
        .ratio(ratio);

    frame.render_widget(gauge, area);
}

fn title(memory: &MemoryMetrics) -> String {
    if memory.swap_inactive() {
        format!(
            " RAM {:.1}/{:.1} GB - swap inactive ",
            memory.used_gb, memory.total_gb
        )
    } else {
        format!(
            " RAM {:.1}/{:.1} GB - swap: {:.1}/{:.1} GB ",
            memory.used_gb, memory.total_gb, memory.swap_used_gb, memory.swap_total_gb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_section_hidden_when_inactive() {
        let metrics = MemoryMetrics {
            used_gb: 12.3,
            total_gb: 32.0,
            free_percent: 61.6,
            swap_used_gb: 0.0,
            swap_total_gb: 0.0,
        };
        assert_eq!(title(&metrics), " RAM 12.3/32.0 GB - swap inactive ");
    }

    #[test]
    fn test_swap_section_shown_when_configured() {
        let metrics = MemoryMetrics {
            used_gb: 12.3,
            total_gb: 32.0,
            free_percent: 61.6,
            swap_used_gb: 0.5,
            swap_total_gb: 2.0,
        };
        assert_eq!(
            title(&metrics),
            " RAM 12.3/32.0 GB - swap: 0.5/2.0 GB "
        );
    }
}
