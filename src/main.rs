mod app;
mod clipboard;
mod config;
mod dispatch;
mod document;
mod editor;
mod export;
mod fileio;
mod history;
mod input;
mod mode;
mod progress;
mod ui;
mod visibility;

use std::fs::{self, File, OpenOptions};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;
use clipboard::Clipboard;
use config::AppConfig;
use editor::Editor;
use fileio::FileIO;
use ui::style::{Style, Theme};

struct Args {
    file_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    theme: Option<String>,
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        file_path: None,
        config_path: None,
        theme: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                if i + 1 < args.len() {
                    parsed.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
            }
            "--theme" => {
                if i + 1 < args.len() {
                    parsed.theme = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --theme requires an argument");
                    process::exit(1);
                }
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                parsed.file_path = Some(PathBuf::from(&args[i]));
                i += 1;
            }
        }
    }

    parsed
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
}

/// Handle panics gracefully
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        restore_terminal();

        if let Some(location) = info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                "panic occured"
            );
        } else {
            error!("panic occured");
        }

        if let Some(s) = info.payload().downcast_ref::<&str>() {
            error!(message = %s);
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            error!(message = %s);
        }

        default_hook(info);
    }));
}

/// `$FOLIO_LOG_FILE`, else `~/.local/state/folio/folio.log`
fn log_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("FOLIO_LOG_FILE") {
        return Some(PathBuf::from(p));
    }
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("folio")
            .join("folio.log")
    })
}

fn open_log() -> Option<File> {
    let path = log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// The terminal belongs to the UI, so logs go to a file. `FOLIO_LOG`
/// takes an env-filter directive and defaults to `info`.
fn init_logging() {
    let file = match open_log() {
        Some(f) => f,
        None => return,
    };
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn print_help() {
    eprintln!("folio - A terminal page editor with floating text boxes");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    folio [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config <PATH>  Read settings from PATH instead of ~/.config/folio/config.toml");
    eprintln!("    --theme <THEME>      Built-in theme name or theme TOML file");
    eprintln!("    -h, --help           Print this help message");
    eprintln!();
    eprintln!("Documents are stored as JSON. A missing FILE is created on the first :w.");
}

fn main() -> io::Result<()> {
    init_logging();
    info!("Folio started");

    install_panic_hook();

    let args = parse_args();

    let config = match AppConfig::load(args.config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let theme = match Theme::resolve(theme_name) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let file_io = FileIO::new(args.file_path);
    let load_result = match file_io.load() {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to load document");
            eprintln!("Error: {}: {}", file_io.file_name(), e);
            process::exit(1);
        }
    };

    let settings = config.editor_settings();
    let editor = match &load_result.snapshot {
        Some(snapshot) => match Editor::from_snapshot(snapshot, &settings) {
            Ok(editor) => editor,
            Err(e) => {
                error!(error = %e, "Failed to restore document");
                eprintln!("Error: {}: {}", file_io.file_name(), e);
                process::exit(1);
            }
        },
        None => Editor::new(&settings),
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(editor, file_io, config, Style::with_theme(theme), Clipboard::new());

    // Show any warnings from loading (e.g., "New file")
    if !load_result.warnings.is_empty() {
        for w in &load_result.warnings {
            warn!(warning = %w, "load");
        }
        app.warn(load_result.warnings.join("; "));
    }

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;

    if let Err(ref e) = result {
        error!(error = %e, "terminal error");
    }
    info!("Folio exited");
    result
}
