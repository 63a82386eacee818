//! roster - Terminal Student Records
//!
//! A terminal application for keeping a small roster of students with
//! validated create/read/update/delete, live search, sorting and CSV export.
//! Every change is written straight to a JSON data file.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use roster::application::{App, AppMode, DEFAULT_STORE_FILE, StudentStore};
use roster::domain::SortKey;
use roster::presentation::{render_ui, InputHandler};

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "Terminal student records manager")]
#[command(version)]
struct Cli {
    /// JSON data file holding the student records
    #[arg(short, long, env = "ROSTER_FILE", default_value = DEFAULT_STORE_FILE)]
    file: PathBuf,

    /// Initial sort key: id, name, age or grade
    #[arg(short, long, env = "ROSTER_SORT", default_value = "id")]
    sort: SortKey,

    /// Write diagnostic logs to this file (filtered by RUST_LOG)
    #[arg(long, env = "ROSTER_LOG_FILE")]
    log_file: Option<PathBuf>,
}

/// Entry point for the roster terminal application.
///
/// Opens the data file, sets up the terminal interface and runs the event
/// loop until the user quits.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The terminal belongs to the UI, so logs only go to a file
    if let Some(ref path) = cli.log_file {
        init_logging(path)?;
    }

    let (store, load_error) = StudentStore::open(&cli.file);
    info!(path = %cli.file.display(), students = store.len(), "opened student store");
    let mut app = App::new(store, load_error);
    if cli.sort != SortKey::default() {
        app.sort_by(cli.sort);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roster=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Main application event loop.
///
/// Redraws after every key press and runs queued CSV exports, which need the
/// terminal to show progress. Returns when the user presses 'q' in normal mode.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app, None))?;

        if let Some(path) = app.pending_export.take() {
            run_export(terminal, app, &path);
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}

/// Exports to `path`, redrawing the progress gauge after every row.
fn run_export<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, path: &Path) {
    let result = app.store.export_to_csv(path, |percent| {
        if let Err(e) = terminal.draw(|f| render_ui(f, app, Some(percent))) {
            warn!(error = %e, "failed to redraw export progress");
        }
    });
    app.set_csv_export_result(path, result);
}
