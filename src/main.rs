use std::io::{self, BufRead, Write};
use std::panic;
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use undo_history::{HistoryConfig, Session};

/// Parse command line arguments
/// Returns (config_path, history_length)
fn parse_args() -> (Option<PathBuf>, Option<usize>) {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut history_length: Option<usize> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--history-length" => {
                if i + 1 < args.len() {
                    history_length = Some(parse_history_length(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --history-length requires an argument");
                    std::process::exit(1);
                }
            }
            "-c" | "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --config requires an argument");
                    std::process::exit(1);
                }
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            arg => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
        }
    }

    (config_path, history_length)
}

fn parse_history_length(s: &str) -> usize {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            eprintln!("Invalid history length: '{}'. Use a whole number of at least 1.", s);
            std::process::exit(1);
        }
    }
}

/// Log panics before handing off to the default hook
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        if let Some(location) = info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                "panic occured"
            );
        } else {
            error!("panic occured");
        }
        default_hook(info);
    }));
}

fn print_help() {
    eprintln!("undo-history - edit a line of text with bounded undo/redo");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    undo-history [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -n, --history-length <N>  Maximum number of undo steps (overrides config)");
    eprintln!("    -c, --config <FILE>       Load settings from a TOML file");
    eprintln!("    -h, --help                Print this help message");
    eprintln!();
    eprintln!("COMMANDS (one per line on stdin):");
    eprintln!("    push <text>, undo, redo, show, status, quit");
}

fn load_config(path: Option<PathBuf>, history_length: Option<usize>) -> io::Result<HistoryConfig> {
    let config = match path {
        Some(path) => HistoryConfig::from_file(&path).map_err(|e| {
            error!(error = %e, "Failed to load config");
            io::Error::new(io::ErrorKind::InvalidInput, e)
        })?,
        None => HistoryConfig::default(),
    };

    Ok(match history_length {
        Some(n) => config.with_history_length(n),
        None => config,
    })
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    info!("undo-history started");

    install_panic_hook();

    let (config_path, history_length) = parse_args();
    let config = load_config(config_path, history_length)?;

    let mut session = Session::new(&config).map_err(|e| {
        error!(error = %e, "Failed to start session");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        if let Some(message) = session.handle_line(&line?) {
            writeln!(stdout, "{}", message)?;
        }
        if session.should_quit() {
            break;
        }
    }

    info!(renders = session.renders(), "undo-history finished");
    Ok(())
}
