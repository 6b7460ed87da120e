pub mod app_shell;
pub mod catalog_browser;
pub mod entry_card;
pub mod entry_detail;
pub mod key_gate;

use ratatui::layout::Rect;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use app_shell::{AppShell, BrowseComponentId, BrowseContext};
pub use catalog_browser::{CatalogBrowser, CatalogBrowserProps};
pub use entry_card::{capitalize, padded_id, EntryCard, EntryCardProps, CARD_HEIGHT, CARD_WIDTH};
pub use entry_detail::{EntryDetail, EntryDetailProps};
pub use key_gate::{KeyGate, KeyGateProps};

/// A `width` x `height` rect centered in `area`, shrunk to fit.
pub fn modal_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
