use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use coldwatch::config::{self, Overrides, Settings};
use coldwatch::logging::{self, LogTarget};
use coldwatch::source::{scheduler, DataSource, RefreshScheduler};
use coldwatch::ui::{self, Theme};
use coldwatch::{events, oneshot, App};
use coldwatch_client::HttpClient;
use coldwatch_types::TimeRange;

#[derive(Parser, Debug)]
#[command(name = "coldwatch")]
#[command(about = "Terminal dashboard for cold-storage warehouse monitoring")]
struct Args {
    /// Path to a TOML/YAML/JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (e.g. http://localhost:5000)
    #[arg(short = 'u', long)]
    endpoint: Option<String>,

    /// Poll interval in seconds while monitoring is active
    #[arg(short, long)]
    interval: Option<u64>,

    /// Initial trends range (1h, 6h, 24h, 7d)
    #[arg(short, long)]
    range: Option<TimeRange>,

    /// Write the log to this file while the dashboard runs
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch one snapshot, export it to a JSON file and exit
    #[arg(short, long, conflicts_with = "set_threshold")]
    export: Option<PathBuf>,

    /// Update a zone threshold and exit: "<zone>=<temp_min>:<temp_max>:<hum_min>:<hum_max>"
    #[arg(long, value_name = "ASSIGNMENT")]
    set_threshold: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    settings.apply_overrides(Overrides {
        endpoint: args.endpoint,
        poll_interval_secs: args.interval,
        time_range: args.range,
        log_file: args.log_file,
    })?;

    let one_shot = args.export.is_some() || args.set_threshold.is_some();
    let target = match &settings.log_file {
        Some(path) => LogTarget::File(path.clone()),
        None if one_shot => LogTarget::Stderr,
        None => LogTarget::Off,
    };
    let _log_guard = logging::init(&settings.log_level, target)?;

    let client = Arc::new(
        HttpClient::builder()
            .endpoint(&settings.endpoint)
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to create HTTP client")?,
    );

    // The UI owns the main thread; fetching needs only a single worker
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    if let Some(assignment) = args.set_threshold {
        return rt.block_on(set_threshold(client, &assignment));
    }

    if let Some(export_path) = args.export {
        return rt.block_on(export_to_file(client, settings.time_range, &export_path));
    }

    info!(
        "Starting dashboard against {} (poll every {}s)",
        settings.endpoint, settings.poll_interval_secs
    );
    let source = {
        let _guard = rt.enter();
        scheduler::spawn(client, settings.poll_interval(), &settings.endpoint)
    };

    let result = run_tui(Box::new(source), settings.time_range);

    // Stop the scheduler without waiting on in-flight requests
    rt.shutdown_timeout(Duration::from_millis(500));
    result
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, time_range: TimeRange) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(source, time_range).with_theme(Theme::auto_detect());

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Apply whatever the scheduler produced since the last frame
        app.poll_source();

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    info!("Dashboard closed");
    Ok(())
}

/// Push one threshold update through the scheduler.
async fn set_threshold(client: Arc<HttpClient>, assignment: &str) -> Result<()> {
    let (zone, threshold) = config::parse_threshold_assignment(assignment)?;
    let mut scheduler = RefreshScheduler::new(client);
    let confirmed = oneshot::update_threshold(&mut scheduler, zone.clone(), threshold).await?;

    println!(
        "{}",
        oneshot::describe_threshold(&zone, &confirmed.unwrap_or(threshold))
    );
    Ok(())
}

/// Fetch thresholds, one snapshot and the trends range, then write the export.
async fn export_to_file(client: Arc<HttpClient>, time_range: TimeRange, path: &Path) -> Result<()> {
    let mut scheduler = RefreshScheduler::new(client);
    oneshot::export_to_file(&mut scheduler, time_range, path).await?;
    println!("Exported dashboard state to: {}", path.display());
    Ok(())
}
