use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use float_clock_core::constants::{app, intervals};
use float_clock_core::{
    ConfigStore, ControlFlow, DisplayController, HostEvent, LoginItem, Rect, SystemSource,
};

mod terminal_host;
use terminal_host::{parse_command, TerminalMenu, TerminalWindow};

#[derive(Parser, Debug)]
#[command(name = "float_clock", version, about = "Always-on-top clock with timer and system stats")]
struct Args {
    /// Settings document (defaults to the per-user config directory)
    #[arg(long, env = "FLOAT_CLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `float_clock_core=trace`. Falls back to RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long, env = "FLOAT_CLOCK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 1920.0)]
    screen_width: f64,

    #[arg(long, default_value_t = 1080.0)]
    screen_height: f64,

    #[arg(long, default_value_t = intervals::TICK_MS)]
    tick_ms: u64,
}

fn initialize_logging(args: &Args) -> Result<()> {
    use chrono::Local;
    use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};

    let timestamp = Local::now().format("%Y-%m-%d_%H_%M_%S").to_string();

    let log_dir_candidates = [
        args.log_dir.clone(),
        Some(std::env::temp_dir().join(app::APP_NAME)),
    ];
    let log_dir = log_dir_candidates
        .into_iter()
        .flatten()
        .find(|p| {
            std::fs::create_dir_all(p).ok();
            std::fs::metadata(p).map(|m| m.is_dir()).unwrap_or(false)
        })
        .unwrap_or_else(|| PathBuf::from("."));

    let log_spec = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| app::DEFAULT_LOG_LEVEL.to_string());

    Logger::try_with_str(&log_spec)?
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stderr(flexi_logger::colored_opt_format)
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename(format!("{}_{}", app::APP_NAME, timestamp))
                .suffix("log"),
        )
        // stdout carries the widget itself
        .duplicate_to_stderr(Duplicate::Warn)
        .rotate(
            Criterion::Size(app::LOG_FILE_MAX_SIZE),
            Naming::Numbers,
            Cleanup::KeepLogFiles(app::LOG_FILE_MAX_COUNT),
        )
        .start()?;

    info!("Log directory: {}", log_dir.display());
    Ok(())
}

fn spawn_tick_thread(tx: Sender<HostEvent>, period: Duration) {
    thread::spawn(move || loop {
        thread::sleep(period);
        if tx.send(HostEvent::Tick).is_err() {
            break;
        }
    });
}

fn spawn_stdin_thread(tx: Sender<HostEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("[stdin] read error: {}", e);
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Some(event)) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{}", e),
            }
        }
        info!("[stdin] closed, keyboard commands disabled");
    });
}

fn spawn_signal_thread(tx: Sender<HostEvent>) -> Result<()> {
    let term = Arc::new(AtomicBool::new(false));
    flag::register(SIGTERM, Arc::clone(&term)).context("registering SIGTERM")?;
    flag::register(SIGINT, Arc::clone(&term)).context("registering SIGINT")?;

    thread::spawn(move || {
        while !term.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(100));
        }
        info!("[signal] termination requested");
        let _ = tx.send(HostEvent::Quit);
    });
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logging(&args)?;
    info!("Starting {} {}", app::APP_NAME, env!("CARGO_PKG_VERSION"));

    let store = match &args.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::default_location()?,
    };
    info!("Configuration file: {:?}", store.path());

    let login = LoginItem::for_current_user()?;
    let executable = std::env::current_exe().context("resolving executable path")?;
    let screen = Rect::new(0.0, 0.0, args.screen_width, args.screen_height);

    let (tx, rx) = mpsc::channel();
    spawn_tick_thread(tx.clone(), Duration::from_millis(args.tick_ms.max(1)));
    spawn_stdin_thread(tx.clone());
    spawn_signal_thread(tx)?;

    let mut controller = DisplayController::new(
        store,
        TerminalWindow::new(screen),
        TerminalMenu::default(),
        SystemSource::new(),
        login,
        executable,
    );
    controller.start();

    for event in rx {
        if controller.handle_event(event) == ControlFlow::Exit {
            break;
        }
    }

    println!();
    info!("Exiting");
    if let Err(e) = std::io::Write::flush(&mut std::io::stdout()) {
        error!("Failed to flush stdout: {}", e);
    }
    Ok(())
}
