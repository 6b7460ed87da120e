//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::state::{CatalogEntryDetail, CatalogPage};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Gate category =====
    /// API key text changed (never validated)
    GateKeyChange(String),

    /// Leave the key screen and load the first page
    GateConfirm,

    // ===== Page category =====
    /// Request the current page; sent at startup and ignored until the gate is passed
    PageFetch,

    /// Result: page loaded; ignored unless `token` is the latest page request
    PageDidLoad { token: u64, page: CatalogPage },

    /// Result: page fetch failed
    PageDidError { token: u64, error: String },

    /// Result: card preview decoded; `token` is the page it was requested for
    PageThumbnailDidLoad {
        token: u64,
        id: u32,
        artwork: Artwork,
    },

    /// Result: card preview failed; the card keeps its placeholder
    PageThumbnailDidError { token: u64, id: u32, error: String },

    PageNext,
    PagePrev,

    /// Page-jump box text changed; applied only when it parses into range
    PageJumpInput(String),

    /// Page-jump box lost focus or was submitted; resync it with the page
    PageJumpCommit,

    // ===== Search category =====
    /// Local filter text changed (no fetch)
    SearchChange(String),

    // ===== Grid category =====
    /// Move the grid cursor to a visible index
    GridCursor(usize),

    // ===== Entry category =====
    /// A card was activated
    EntrySelect(u32),

    /// Result: detail record loaded
    EntryDidLoad {
        token: u64,
        detail: CatalogEntryDetail,
    },

    /// Result: detail fetch failed
    EntryDidError { token: u64, error: String },

    /// Result: artwork decoded
    EntryArtworkDidLoad { token: u64, artwork: Artwork },

    /// Result: artwork download or decode failed
    EntryArtworkDidError { token: u64, error: String },

    /// Close the detail overlay and clear the selection
    EntryClose,

    // ===== Focus category =====
    FocusNext,
    FocusPrev,

    // ===== Uncategorized (global) =====
    /// Force a re-render (cursor movement inside text inputs)
    Render,

    /// Spinner animation
    Tick,

    Quit,
}
