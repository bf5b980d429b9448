mod app;
mod catalog;
mod config;
mod debounce;
mod i18n;
mod network;
mod pipeline;
mod prefs;
mod ui;

use anyhow::Result;
use app::App;
use catalog::CatalogSource;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use prefs::{FileStorage, MemoryStorage, Prefs, Storage};
use ratatui::prelude::*;
use std::{fs, io, time::{Duration, Instant}};
use tokio::sync::mpsc;

fn init_logging() {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("rchapters")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(dir.join("rchapters.log")) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let mut config = config::load_config();
    if let Some(root) = std::env::args().nth(1) {
        config.data_root = root;
    }
    log::info!("starting with data root {}", config.data_root);

    let storage: Box<dyn Storage + Send> = match FileStorage::default_path() {
        Some(path) => Box::new(FileStorage::open(path)),
        None => Box::new(MemoryStorage::default()),
    };
    let prefs = Prefs::load(storage);

    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    tokio::spawn(network::run_network_loop(CatalogSource::new(config.data_root.clone()), action_rx, event_tx.clone()));
    tokio::spawn(network::run_config_watcher(event_tx));
    let mut app = App::new(&config, prefs, action_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let started = Instant::now();
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|f| ui::ui(f, &app)) {
            break Err(e.into());
        }

        let now_ms = started.elapsed().as_millis() as u64;
        let mut timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or(Duration::from_secs(0));
        if let Some(ms) = app.next_deadline(now_ms) {
            timeout = timeout.min(Duration::from_millis(ms));
        }

        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, started.elapsed().as_millis() as u64) {
                        break Ok(());
                    }
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }

        while let Ok(e) = event_rx.try_recv() {
            app.on_network_event(e);
        }
        app.on_tick(started.elapsed().as_millis() as u64);
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::info!("exiting");
    result
}
