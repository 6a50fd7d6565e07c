use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use sprintwatch::source::read_table;
use sprintwatch::{events, export, ui, App, FileSource, Overrides, Settings, TableSource, View};
use sprintwatch_core::{analyze_table, normalize, AnalysisConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "sprintwatch=info,sprintwatch_core=info";

#[derive(Parser, Debug)]
#[command(name = "sprintwatch", version)]
#[command(about = "Sprint delivery health: predictability, scope volatility and per-item blame")]
struct Args {
    /// Work item export to analyze (.csv or .json)
    #[arg(short, long, default_value = "sprints.csv")]
    file: PathBuf,

    /// TOML settings file (defaults to ./sprintwatch.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum per-sprint predictability for a Good sprint (e.g. 0.9)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Number of most recent sprints used when no window is given
    #[arg(long)]
    last_n: Option<usize>,

    /// Explicit window as a comma-separated sprint list
    #[arg(short, long)]
    sprints: Option<String>,

    /// File with one curated sprint id per line
    #[arg(long)]
    sprint_list: Option<PathBuf>,

    /// Rewrite coerced point cells in the source CSV with their numeric value
    #[arg(long)]
    coerce_numeric: bool,

    /// Write the JSON report to this file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write the CSV report set into this directory and exit
    #[arg(long)]
    reports: Option<PathBuf>,

    /// Print a text summary to stdout and exit
    #[arg(short, long)]
    print: bool,

    /// Refresh interval in seconds for the interactive viewer
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Write logs to this file (the viewer logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn is_batch(&self) -> bool {
        self.export.is_some() || self.reports.is_some() || self.print
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            threshold: self.threshold,
            last_n: self.last_n,
            sprints: self.sprints.clone(),
            sprint_list: self.sprint_list.clone(),
            coerce_numeric: self.coerce_numeric,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_file.as_deref(), args.is_batch())?;

    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;
    let config = settings.analysis_config()?;
    info!(
        threshold = config.threshold,
        last_n = config.window.last_n,
        explicit = config.window.explicit.is_some(),
        curated = config.window.curated.len(),
        "settings loaded"
    );

    if settings.coerce_numeric {
        coerce_source(&args.file)?;
    }

    if args.is_batch() {
        return run_batch(&args, &config);
    }

    let source = Box::new(FileSource::new(&args.file));
    run_tui(source, config, Duration::from_secs(args.refresh))
}

/// Install the tracing subscriber.
///
/// Batch runs log to stderr. The viewer owns the terminal, so it only logs
/// when a file is given.
fn init_logging(log_file: Option<&Path>, batch: bool) -> Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(filter())
            .init();
    } else if batch {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(filter())
            .init();
    }
    Ok(())
}

/// Rewrite coerced point cells in the source file before analysis.
fn coerce_source(path: &Path) -> Result<()> {
    let table = read_table(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let normalized = normalize(&table)
        .with_context(|| format!("Failed to normalize {}", path.display()))?;
    export::write_back(path, &normalized.coercions)?;
    Ok(())
}

/// Analyze once and write every requested report.
fn run_batch(args: &Args, config: &AnalysisConfig) -> Result<()> {
    let table = read_table(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let analysis = analyze_table(&table, config)
        .with_context(|| format!("Failed to analyze {}", args.file.display()))?;
    let source = format!("file: {}", args.file.display());

    if let Some(ref path) = args.export {
        export::export_json(&analysis, &source, path)?;
        println!("Exported report to: {}", path.display());
    }

    if let Some(ref dir) = args.reports {
        for path in export::write_reports(&analysis, dir)? {
            println!("Wrote {}", path.display());
        }
    }

    if args.print {
        print!("{}", export::render_text(&analysis));
    }

    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn TableSource>,
    config: AnalysisConfig,
    refresh_interval: Duration,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal before printing a panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, config);
    app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

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

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Sprints => ui::summary::render(frame, app, chunks[2]),
                View::Items => ui::items::render(frame, app, chunks[2]),
                View::Kpis => ui::kpis::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                // Table header sits on row 3, below header bar, tabs and border
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, 3),
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
