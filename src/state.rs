//! Application state - single source of truth

use schemars::JsonSchema;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::artwork::Artwork;
use crate::config::DEFAULT_ARTWORK_BASE;

pub const ITEMS_PER_PAGE: u32 = 20;

/// Placeholder shown in the pager until the first page reports a real count.
pub const INITIAL_TOTAL_COUNT: u32 = 10_000;

/// Full-width stat bar; larger values are drawn as full.
pub const MAX_BASE_STAT: u16 = 255;

pub const LOADING_ANIM_TICK_MS: u64 = 90;
const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}

/// One entry of the currently loaded page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntrySummary {
    pub id: u32,
    pub name: String,
    pub source_url: String,
}

/// A page as returned by the listing endpoint, ids already assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogPage {
    pub total_count: u32,
    pub entries: Vec<CatalogEntrySummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AbilitySlot {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BaseStat {
    pub name: String,
    pub base_value: u16,
}

impl BaseStat {
    pub fn bar_percent(&self) -> f64 {
        f64::from(self.base_value.min(MAX_BASE_STAT)) / f64::from(MAX_BASE_STAT) * 100.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntryDetail {
    pub id: u32,
    pub name: String,
    /// Decimetres
    pub height: u32,
    /// Hectograms
    pub weight: u32,
    pub types: Vec<String>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<BaseStat>,
    pub artwork_url: Option<String>,
}

impl CatalogEntryDetail {
    pub fn height_label(&self) -> String {
        format!("{:.1} m", f64::from(self.height) / 10.0)
    }

    pub fn weight_label(&self) -> String {
        format!("{:.1} kg", f64::from(self.weight) / 10.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_count: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_count: INITIAL_TOTAL_COUNT,
        }
    }
}

impl PaginationState {
    pub fn total_pages(&self) -> u32 {
        self.total_count.div_ceil(ITEMS_PER_PAGE)
    }

    /// Highest page the pager may show; at least 1 even for an empty catalog.
    pub fn last_page(&self) -> u32 {
        self.total_pages().max(1)
    }

    pub fn offset(&self) -> u32 {
        (self.current_page - 1) * ITEMS_PER_PAGE
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Move to `page` if it lies in `1..=total_pages`. Returns whether the page changed.
    pub fn jump_to(&mut self, page: i64) -> bool {
        if page < 1 || page > i64::from(self.total_pages()) {
            return false;
        }
        let page = page as u32;
        if page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self) -> bool {
        let target = (self.current_page + 1).min(self.total_pages());
        self.jump_to(i64::from(target))
    }

    pub fn prev(&mut self) -> bool {
        let target = self.current_page.saturating_sub(1).max(1);
        self.jump_to(i64::from(target))
    }

    /// Update the count from a response and pull the current page back in range.
    pub fn set_total_count(&mut self, total_count: u32) {
        self.total_count = total_count;
        self.current_page = self.current_page.clamp(1, self.last_page());
    }
}

/// Which browser widget receives keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FocusArea {
    Search,
    #[default]
    Grid,
    PageJump,
}

impl FocusArea {
    pub fn next(self) -> Self {
        match self {
            FocusArea::Search => FocusArea::Grid,
            FocusArea::Grid => FocusArea::PageJump,
            FocusArea::PageJump => FocusArea::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusArea::Search => FocusArea::PageJump,
            FocusArea::Grid => FocusArea::Search,
            FocusArea::PageJump => FocusArea::Grid,
        }
    }
}

/// Cosmetic key screen. The key is kept only to show it back to the user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GateState {
    pub api_key: String,
    pub configured: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub gate: GateState,

    // --- Catalog browser ---
    pub pagination: PaginationState,
    pub summaries: Vec<CatalogEntrySummary>,
    pub list_loading: bool,
    pub search_term: String,
    /// Text in the page-jump box; mirrors `current_page` unless the user is typing.
    pub page_input: String,
    pub cursor: usize,
    pub focus: FocusArea,
    pub page_token: u64,
    /// Card previews for the loaded page, keyed by entry id.
    pub thumbnails: BTreeMap<u32, Artwork>,

    // --- Detail overlay ---
    pub selected_id: Option<u32>,
    pub detail: DataResource<CatalogEntryDetail>,
    pub artwork: DataResource<Artwork>,
    pub detail_token: u64,

    pub artwork_base: String,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            gate: GateState::default(),
            pagination: PaginationState::default(),
            summaries: Vec::new(),
            list_loading: false,
            search_term: String::new(),
            page_input: "1".to_string(),
            cursor: 0,
            focus: FocusArea::default(),
            page_token: 0,
            thumbnails: BTreeMap::new(),
            selected_id: None,
            detail: DataResource::Empty,
            artwork: DataResource::Empty,
            detail_token: 0,
            artwork_base: DEFAULT_ARTWORK_BASE.to_string(),
            tick: 0,
        }
    }
}

impl AppState {
    pub fn new(artwork_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            artwork_base: artwork_base.into(),
            gate: GateState {
                api_key: api_key.unwrap_or_default(),
                configured: false,
            },
            ..Default::default()
        }
    }

    /// The loaded page narrowed by the search term (case-insensitive substring).
    pub fn visible_summaries(&self) -> Vec<&CatalogEntrySummary> {
        filter_by_name(&self.summaries, &self.search_term)
    }

    pub fn detail_open(&self) -> bool {
        self.selected_id.is_some()
    }

    pub fn current_detail(&self) -> Option<&CatalogEntryDetail> {
        self.detail.data()
    }

    pub fn artwork_url_for(&self, id: u32) -> String {
        artwork_url(&self.artwork_base, id)
    }

    pub fn loading_anim_active(&self) -> bool {
        self.list_loading || self.detail.is_loading() || self.artwork.is_loading()
    }
}

pub fn filter_by_name<'a>(
    entries: &'a [CatalogEntrySummary],
    term: &str,
) -> Vec<&'a CatalogEntrySummary> {
    let term = term.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&term))
        .collect()
}

pub fn artwork_url(base: &str, id: u32) -> String {
    format!("{base}/{id}.png")
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Gate")
                .entry("configured", ron_string(&self.gate.configured))
                .entry("api_key_len", ron_string(&self.gate.api_key.len())),
            DebugSection::new("Catalog")
                .entry("page", ron_string(&self.pagination.current_page))
                .entry("total_pages", ron_string(&self.pagination.total_pages()))
                .entry("total_count", ron_string(&self.pagination.total_count))
                .entry("loaded", ron_string(&self.summaries.len()))
                .entry("visible", ron_string(&self.visible_summaries().len()))
                .entry("search", ron_string(&self.search_term))
                .entry("cursor", ron_string(&self.cursor))
                .entry("focus", ron_string(&self.focus))
                .entry("page_token", ron_string(&self.page_token))
                .entry("thumbnails", ron_string(&self.thumbnails.len())),
            DebugSection::new("Detail")
                .entry("selected", ron_string(&self.selected_id))
                .entry("loading", ron_string(&self.detail.is_loading()))
                .entry("failed", ron_string(&self.detail.is_failed()))
                .entry("artwork", ron_string(&self.artwork.is_loaded()))
                .entry("detail_token", ron_string(&self.detail_token)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u32, name: &str) -> CatalogEntrySummary {
        CatalogEntrySummary {
            id,
            name: name.to_string(),
            source_url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        for (count, pages) in [(0, 0), (1, 1), (20, 1), (21, 2), (1302, 66), (10_000, 500)] {
            let pagination = PaginationState {
                current_page: 1,
                total_count: count,
            };
            assert_eq!(pagination.total_pages(), pages, "count {count}");
        }
    }

    #[test]
    fn empty_catalog_still_has_one_page() {
        let mut pagination = PaginationState {
            current_page: 3,
            total_count: 0,
        };
        pagination.set_total_count(0);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.last_page(), 1);
        assert!(!pagination.has_next());
        assert!(!pagination.has_prev());
        assert!(!pagination.next());
    }

    #[test]
    fn navigation_clamps_at_bounds() {
        let mut pagination = PaginationState {
            current_page: 1,
            total_count: 45,
        };
        assert!(!pagination.prev());
        assert_eq!(pagination.current_page, 1);

        assert!(pagination.next());
        assert!(pagination.next());
        assert!(!pagination.next());
        assert_eq!(pagination.current_page, 3);
    }

    #[test]
    fn jump_ignores_out_of_range() {
        let mut pagination = PaginationState {
            current_page: 4,
            total_count: 200,
        };
        for target in [0, -1, -40, 11, 9999] {
            assert!(!pagination.jump_to(target));
            assert_eq!(pagination.current_page, 4);
        }
        assert!(pagination.jump_to(10));
        assert_eq!(pagination.current_page, 10);
        assert_eq!(pagination.offset(), 180);
    }

    #[test]
    fn shrinking_count_pulls_page_back() {
        let mut pagination = PaginationState {
            current_page: 50,
            total_count: 10_000,
        };
        pagination.set_total_count(100);
        assert_eq!(pagination.current_page, 5);
    }

    #[test]
    fn filter_is_case_insensitive_and_idempotent() {
        let entries = vec![summary(25, "pikachu"), summary(26, "raichu")];

        let lower = filter_by_name(&entries, "pika");
        let upper = filter_by_name(&entries, "PIKA");
        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 1);
        assert_eq!(lower[0].id, 25);

        let owned: Vec<_> = lower.into_iter().cloned().collect();
        assert_eq!(filter_by_name(&owned, "pika").len(), 1);

        assert!(filter_by_name(&entries, "zzz").is_empty());
        assert_eq!(filter_by_name(&entries, "").len(), 2);
    }

    #[test]
    fn unit_conversions_keep_one_decimal() {
        let detail = CatalogEntryDetail {
            id: 1,
            name: "bulbasaur".into(),
            height: 7,
            weight: 690,
            types: vec![],
            abilities: vec![],
            stats: vec![],
            artwork_url: None,
        };
        assert_eq!(detail.height_label(), "0.7 m");
        assert_eq!(detail.weight_label(), "69.0 kg");
    }

    #[test]
    fn stat_bar_spans_full_range() {
        let max = BaseStat {
            name: "hp".into(),
            base_value: 255,
        };
        let min = BaseStat {
            name: "hp".into(),
            base_value: 0,
        };
        assert_eq!(max.bar_percent(), 100.0);
        assert_eq!(min.bar_percent(), 0.0);

        let over = BaseStat {
            name: "hp".into(),
            base_value: 300,
        };
        assert_eq!(over.bar_percent(), 100.0);
    }

    #[test]
    fn artwork_url_uses_template() {
        let state = AppState::default();
        assert_eq!(
            state.artwork_url_for(25),
            format!("{DEFAULT_ARTWORK_BASE}/25.png")
        );
    }

    #[test]
    fn focus_cycles_both_ways() {
        let mut focus = FocusArea::Search;
        for _ in 0..3 {
            focus = focus.next();
        }
        assert_eq!(focus, FocusArea::Search);
        assert_eq!(FocusArea::Search.prev(), FocusArea::PageJump);
    }
}
