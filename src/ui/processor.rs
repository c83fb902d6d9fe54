//! Processor block: cluster, per-core, GPU and ANE gauges.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::app::App;
use crate::data::CoreMetrics;
use crate::system::ANE_MAX_POWER_W;
use crate::ui::Theme;

/// Per-core gauges are laid out in rows of at most this many.
const CORES_PER_ROW: usize = 8;

/// Render the processor utilization block.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.soc.banner()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(ref data) = app.data else {
        return;
    };

    let e_title = format!(
        "E-CPU {}% @ {} MHz",
        data.soc.e_cluster.active_percent, data.soc.e_cluster.freq_mhz
    );
    let p_title = format!(
        "P-CPU {}% @ {} MHz",
        data.soc.p_cluster.active_percent, data.soc.p_cluster.freq_mhz
    );
    let gpu_title = format!(
        "GPU {}% @ {} MHz",
        data.soc.gpu_active_percent, data.soc.gpu_freq_mhz
    );

    let ane_percent = (data.ane_w / ANE_MAX_POWER_W * 100.0).clamp(0.0, 100.0) as u32;
    let ane_title = format!("ANE {}% @ {:.1} W", ane_percent, data.ane_w);

    if app.show_cores {
        let p_rows = data.soc.p_cores.chunks(CORES_PER_ROW).count();
        let mut constraints = vec![
            Constraint::Length(3), // E cluster
            Constraint::Length(3), // E cores
            Constraint::Length(3), // P cluster
        ];
        constraints.extend(std::iter::repeat(Constraint::Length(3)).take(p_rows));
        constraints.push(Constraint::Length(3)); // GPU
        constraints.push(Constraint::Length(3)); // ANE
        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(
            gauge(e_title, data.soc.e_cluster.active_percent, &app.theme),
            rows[0],
        );
        render_core_row(frame, &data.soc.e_cores, rows[1], &app.theme);
        frame.render_widget(
            gauge(p_title, data.soc.p_cluster.active_percent, &app.theme),
            rows[2],
        );
        for (i, chunk) in data.soc.p_cores.chunks(CORES_PER_ROW).enumerate() {
            render_core_row(frame, chunk, rows[3 + i], &app.theme);
        }
        frame.render_widget(
            gauge(gpu_title, data.soc.gpu_active_percent, &app.theme),
            rows[3 + p_rows],
        );
        frame.render_widget(gauge(ane_title, ane_percent, &app.theme), rows[4 + p_rows]);
    } else {
        let rows = Layout::vertical([Constraint::Length(3), Constraint::Length(3)]).split(inner);
        let top =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(rows[0]);
        let bottom =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(rows[1]);

        frame.render_widget(
            gauge(e_title, data.soc.e_cluster.active_percent, &app.theme),
            top[0],
        );
        frame.render_widget(
            gauge(p_title, data.soc.p_cluster.active_percent, &app.theme),
            top[1],
        );
        frame.render_widget(
            gauge(gpu_title, data.soc.gpu_active_percent, &app.theme),
            bottom[0],
        );
        frame.render_widget(gauge(ane_title, ane_percent, &app.theme), bottom[1]);
    }
}

/// Render one row of per-core mini gauges, in canonical core order.
fn render_core_row(frame: &mut Frame, cores: &[CoreMetrics], area: Rect, theme: &Theme) {
    if cores.is_empty() {
        return;
    }
    let n = cores.len() as u32;
    let cells = Layout::horizontal(
        cores
            .iter()
            .map(|_| Constraint::Ratio(1, n))
            .collect::<Vec<_>>(),
    )
    .split(area);

    for (core, cell) in cores.iter().zip(cells.iter()) {
        let title = format!("C{} {}%", core.index + 1, core.active_percent);
        frame.render_widget(gauge(title, core.active_percent, theme), *cell);
    }
}

fn gauge(title: String, percent: u32, theme: &Theme) -> Gauge<'static> {
    Gauge::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border)),
        )
        .gauge_style(Style::default().fg(theme.gauge))
        .percent(percent.min(100) as u16)
}
