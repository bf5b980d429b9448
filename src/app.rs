use crate::catalog::{Catalog, LoadFailure};
use crate::config::Config;
use crate::debounce::CoalescingTimer;
use crate::i18n::{Language, Strings};
use crate::network::{Action, NetworkEvent};
use crate::pipeline::{Pipeline, RenderPlan};
use crate::prefs::Prefs;
use crossterm::event::KeyCode;
use ratatui::style::Color;
use std::process::{Command, Stdio};
use tokio::sync::mpsc;

pub const SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogStatus {
    Pending,
    Ready,
    Failed(LoadFailure),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Searching,
}

pub struct App {
    pub mode: Mode,
    pub input: String,
    pub pipeline: Pipeline,
    pub status: CatalogStatus,
    pub selected_index: usize,
    pub accent: Color,
    pub prefs: Prefs,
    pub notice: Option<String>,

    search_timer: CoalescingTimer<String>,
    generation: u64,
    bilingual: bool,
    detail_base: String,
    open_command: Option<String>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(config: &Config, prefs: Prefs, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let mut app = Self {
            mode: Mode::Browse,
            input: String::new(),
            pipeline: Pipeline::new(prefs.language()),
            status: CatalogStatus::Pending,
            selected_index: 0,
            accent: config.accent,
            prefs,
            notice: None,
            search_timer: CoalescingTimer::new(SEARCH_DEBOUNCE_MS),
            generation: 0,
            bilingual: config.bilingual,
            detail_base: config.detail_base.clone(),
            open_command: config.open_command.clone(),
            action_tx,
        };
        app.request_catalog();
        app
    }

    pub fn language(&self) -> Language {
        self.pipeline.state().language
    }

    pub fn strings(&self) -> &'static Strings {
        self.language().strings()
    }

    pub fn bilingual(&self) -> bool {
        self.bilingual
    }

    /// Drops the current catalog and asks for a fresh one. Responses to
    /// earlier requests are ignored once this runs.
    pub fn request_catalog(&mut self) {
        self.generation += 1;
        self.pipeline.set_catalog(Catalog::default());
        self.status = CatalogStatus::Pending;
        self.selected_index = 0;

        let language = self.bilingual.then_some(self.language());
        log::info!("requesting catalog #{} ({:?})", self.generation, language);
        let _ = self.action_tx.send(Action::LoadCatalog { generation: self.generation, language });
    }

    pub fn on_network_event(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::CatalogLoaded { generation, result } => {
                if generation != self.generation {
                    log::debug!("dropping stale catalog #{} (current #{})", generation, self.generation);
                    return;
                }
                match result {
                    Ok(catalog) => {
                        self.pipeline.set_catalog(catalog);
                        self.status = CatalogStatus::Ready;
                        self.selected_index = 0;
                    }
                    Err(e) => self.status = CatalogStatus::Failed(e),
                }
            }
            NetworkEvent::AccentUpdate(color) => self.accent = color,
        }
    }

    pub fn on_tick(&mut self, now_ms: u64) {
        if let Some(term) = self.search_timer.take_ready(now_ms) {
            self.apply_search(&term);
        }
    }

    /// How long the event loop may sleep before a pending search is due.
    pub fn next_deadline(&self, now_ms: u64) -> Option<u64> {
        self.search_timer.time_until_ready(now_ms)
    }

    pub fn handle_key(&mut self, key: KeyCode, now_ms: u64) -> bool {
        match self.mode {
            Mode::Searching => match key {
                KeyCode::Esc => {
                    self.mode = Mode::Browse;
                    self.search_timer.cancel();
                    if !self.input.is_empty() || !self.pipeline.state().search_term.is_empty() {
                        self.input.clear();
                        self.apply_search("");
                    }
                }
                KeyCode::Enter => {
                    self.mode = Mode::Browse;
                    if self.search_timer.is_pending() {
                        self.search_timer.cancel();
                        let term = self.input.clone();
                        self.apply_search(&term);
                    }
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    self.search_timer.schedule(self.input.clone(), now_ms);
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.search_timer.schedule(self.input.clone(), now_ms);
                }
                _ => {}
            },
            Mode::Browse => match key {
                KeyCode::Char('q') => return true,
                KeyCode::Char('/') => self.mode = Mode::Searching,
                KeyCode::Char('j') | KeyCode::Down => self.move_down(),
                KeyCode::Char('k') | KeyCode::Up => self.move_up(),
                KeyCode::Char('g') | KeyCode::Home => self.selected_index = 0,
                KeyCode::Char('m') => self.reveal_more(),
                KeyCode::Char('t') => self.toggle_theme(),
                KeyCode::Char('l') if self.bilingual => self.toggle_language(),
                KeyCode::Char('r') => self.request_catalog(),
                KeyCode::Enter => self.read_selected(),
                KeyCode::Esc => self.notice = None,
                _ => {}
            },
        }
        false
    }

    pub fn reveal_more(&mut self) {
        self.pipeline.reveal_more();
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.prefs.theme().toggled();
        self.prefs.set_theme(theme);
    }

    pub fn toggle_language(&mut self) {
        let language = self.language().toggled();
        self.prefs.set_language(language);
        self.pipeline.set_language(language);
        self.request_catalog();
    }

    pub fn selected_link(&self) -> Option<String> {
        let id = match self.pipeline.render() {
            RenderPlan::Cards { cards, .. } => cards.get(self.selected_index)?.id,
            RenderPlan::Empty => return None,
        };
        Some(detail_link(&self.detail_base, id, self.bilingual.then_some(self.language())))
    }

    fn read_selected(&mut self) {
        let Some(link) = self.selected_link() else {
            return;
        };
        log::info!("opening {}", link);

        if let Some(cmd) = &self.open_command {
            let spawned = Command::new(cmd)
                .arg(&link)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if let Err(e) = spawned {
                log::warn!("could not run {}: {}", cmd, e);
            }
        }
        self.notice = Some(format!("{}: {}", self.strings().opened, link));
    }

    fn apply_search(&mut self, term: &str) {
        self.pipeline.set_search_term(term);
        self.selected_index = 0;
    }

    fn move_down(&mut self) {
        if self.selected_index + 1 < self.pipeline.displayed_len() {
            self.selected_index += 1;
        }
    }

    fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }
}

/// `<base>?id=<id>[&lang=<tag>]`
pub fn detail_link(base: &str, id: u64, language: Option<Language>) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    match language {
        Some(lang) => format!("{}{}id={}&lang={}", base, sep, id, lang.tag()),
        None => format!("{}{}id={}", base, sep, id),
    }
}
