use crate::catalog::{Catalog, ChapterRecord};
use crate::i18n::Language;

pub const DEFAULT_REVEAL: usize = 6;
pub const PAGE_SIZE: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    /// Already trimmed and lowercased.
    pub search_term: String,
    pub reveal_count: usize,
    pub language: Language,
}

/// Search, paging and the visible subset for one catalog.
///
/// The visible set is recomputed in full whenever the term or the catalog
/// changes, and `render` rebuilds the whole card list from state every time.
#[derive(Debug)]
pub struct Pipeline {
    catalog: Catalog,
    state: ViewState,
    visible: Vec<usize>,
    default_reveal: usize,
    page_size: usize,
    filter_passes: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card<'a> {
    pub id: u64,
    pub number: Option<&'a str>,
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub description: &'a str,
}

impl<'a> From<&'a ChapterRecord> for Card<'a> {
    fn from(record: &'a ChapterRecord) -> Self {
        Card {
            id: record.id,
            number: record.number.as_deref(),
            title: &record.title,
            subtitle: record.subtitle.as_deref(),
            description: &record.description,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderPlan<'a> {
    Empty,
    Cards { cards: Vec<Card<'a>>, show_more: bool },
}

impl Pipeline {
    pub fn new(language: Language) -> Self {
        Self::with_paging(language, DEFAULT_REVEAL, PAGE_SIZE)
    }

    pub fn with_paging(language: Language, default_reveal: usize, page_size: usize) -> Self {
        Self {
            catalog: Catalog::default(),
            state: ViewState {
                search_term: String::new(),
                reveal_count: default_reveal,
                language,
            },
            visible: Vec::new(),
            default_reveal,
            page_size,
            filter_passes: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn set_language(&mut self, language: Language) {
        self.state.language = language;
    }

    /// Swaps in a freshly loaded catalog, keeping the current search term.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.state.reveal_count = self.default_reveal;
        self.apply_filter();
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.state.search_term = normalize(term);
        self.state.reveal_count = self.default_reveal;
        self.apply_filter();
    }

    pub fn reveal_more(&mut self) {
        self.state.reveal_count = self.state.reveal_count.saturating_add(self.page_size);
    }

    pub fn visible(&self) -> impl Iterator<Item = &ChapterRecord> + '_ {
        let chapters = self.catalog.chapters();
        self.visible.iter().map(move |&i| &chapters[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn displayed_len(&self) -> usize {
        self.visible.len().min(self.state.reveal_count)
    }

    /// Number of times the visible set has been recomputed.
    pub fn filter_passes(&self) -> u64 {
        self.filter_passes
    }

    pub fn render(&self) -> RenderPlan<'_> {
        if self.visible.is_empty() {
            return RenderPlan::Empty;
        }

        let cards = self.visible().take(self.state.reveal_count).map(Card::from).collect();
        RenderPlan::Cards {
            cards,
            show_more: self.visible.len() > self.state.reveal_count,
        }
    }

    fn apply_filter(&mut self) {
        let needle = self.state.search_term.as_str();
        self.visible = self
            .catalog
            .chapters()
            .iter()
            .enumerate()
            .filter(|(_, record)| needle.is_empty() || matches(record, needle))
            .map(|(i, _)| i)
            .collect();
        self.filter_passes += 1;
        log::debug!(
            "filter {:?}: {} of {} chapters visible",
            needle,
            self.visible.len(),
            self.catalog.len()
        );
    }
}

fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

fn matches(record: &ChapterRecord, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(&record.title)
        || contains(&record.description)
        || record.subtitle.as_deref().is_some_and(contains)
        || record.number.as_deref().is_some_and(contains)
}
