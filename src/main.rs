// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod data;
mod error;
mod events;
mod source;
mod system;
mod ui;

use app::App;
use data::PowerAggregator;
use source::{FileSource, SampleSource, SamplerSource, StreamSource, DEFAULT_SAMPLER_COMMAND};
use system::SocInfo;

#[derive(Parser, Debug)]
#[command(name = "powerwatch")]
#[command(about = "Terminal dashboard for Apple Silicon power and utilization telemetry")]
struct Args {
    /// Sampling interval in seconds (also passed to the sampler)
    #[arg(short, long, default_value = "1")]
    interval: u64,

    /// Averaging window for power readings, in seconds
    #[arg(short, long, default_value = "30")]
    avg: u64,

    /// Render one mini gauge per core
    #[arg(long)]
    show_cores: bool,

    /// Sampler command to spawn (must emit one JSON sample per line)
    #[arg(long, default_value = DEFAULT_SAMPLER_COMMAND)]
    sampler_cmd: String,

    /// Replay samples from a JSON file instead of spawning the sampler
    #[arg(short, long, conflicts_with = "connect")]
    file: Option<PathBuf>,

    /// Connect to a TCP endpoint emitting newline-delimited JSON samples
    #[arg(short, long)]
    connect: Option<String>,

    /// Write tracing output to this file (honors RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Startup validation keeps impossible aggregator states unreachable
    // at runtime.
    if args.interval == 0 {
        anyhow::bail!("--interval must be at least 1 second");
    }
    if args.avg < args.interval {
        anyhow::bail!("--avg must be at least the sampling interval");
    }

    init_tracing(args.log_file.as_deref())?;

    let sampling_interval = Duration::from_secs(args.interval);
    let aggregator = PowerAggregator::new(Duration::from_secs(args.avg), sampling_interval)?;
    let soc = SocInfo::detect();

    // The runtime drives the source's reader task and the sampler child's
    // I/O; it must outlive the TUI loop.
    let rt = tokio::runtime::Runtime::new()?;
    let source = create_source(&rt, &args, sampling_interval)?;

    let mut app = App::new(source, soc, aggregator, sampling_interval, args.show_cores);

    let result = run_tui(&mut app);

    // Terminal is restored at this point; report the sampler release
    // without re-raising a failure over the loop's own result.
    match app.shutdown() {
        Ok(()) => println!("Stopped powerwatch."),
        Err(e) => eprintln!("Stopped powerwatch, but releasing the sampler failed: {:#}", e),
    }

    result
}

/// Build the sample source selected by the CLI arguments.
fn create_source(
    rt: &tokio::runtime::Runtime,
    args: &Args,
    sampling_interval: Duration,
) -> Result<Box<dyn SampleSource>> {
    if let Some(ref path) = args.file {
        return Ok(Box::new(FileSource::new(path)));
    }

    if let Some(ref addr) = args.connect {
        let addr = addr.clone();
        return rt.block_on(async {
            let stream = tokio::net::TcpStream::connect(&addr)
                .await
                .with_context(|| format!("failed to connect to {}", addr))?;
            Ok(Box::new(StreamSource::from_reader(stream, &addr)) as Box<dyn SampleSource>)
        });
    }

    rt.block_on(async {
        let source = SamplerSource::start(&args.sampler_cmd, sampling_interval)?;
        Ok(Box::new(source) as Box<dyn SampleSource>)
    })
}

/// Run the TUI against the prepared application state.
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5u16.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            if app.data.is_none() {
                ui::common::render_waiting(frame, app, area);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(8),    // Processor gauges
                Constraint::Length(3), // Memory gauge
                Constraint::Length(8), // Power charts
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::processor::render(frame, app, chunks[1]);
            ui::memory::render(frame, app, chunks[2]);
            ui::power::render(frame, app, chunks[3]);
            ui::common::render_status_bar(frame, app, chunks[4]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout; the timeout doubles as the
        // backoff between empty sample polls.
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // One non-blocking dequeue per iteration. A closed source is fatal;
        // everything else (empty queue, stale or malformed samples) keeps
        // the loop going.
        app.tick()?;
    }

    Ok(())
}

/// Install a file-writing tracing subscriber when `--log-file` is given.
///
/// The TUI owns the terminal, so logging stays off unless routed to a file.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
