//! Reducer - pure function: (state, action) -> DispatchResult

use tracing::debug;
use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, FocusArea, ITEMS_PER_PAGE};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Gate =====
        Action::GateKeyChange(key) => {
            state.gate.api_key = key;
            DispatchResult::changed()
        }

        Action::GateConfirm => {
            if state.gate.configured {
                return DispatchResult::unchanged();
            }
            state.gate.configured = true;
            DispatchResult::changed_with(request_page(state))
        }

        // ===== Catalog pages =====
        Action::PageFetch => {
            if !state.gate.configured {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(request_page(state))
        }

        Action::PageDidLoad { token, page } => {
            if token != state.page_token {
                debug!(token, latest = state.page_token, "dropping stale page response");
                return DispatchResult::unchanged();
            }
            state.list_loading = false;
            state.summaries = page.entries;
            state.thumbnails.clear();
            state.cursor = 0;
            let requested = state.pagination.current_page;
            state.pagination.set_total_count(page.total_count);
            if state.pagination.current_page != requested {
                sync_page_input(state);
                return DispatchResult::changed_with(request_page(state));
            }
            DispatchResult::changed_with_many(request_thumbnails(state))
        }

        Action::PageDidError { token, .. } => {
            if token != state.page_token {
                return DispatchResult::unchanged();
            }
            // Keep whatever was on screen.
            state.list_loading = false;
            DispatchResult::changed()
        }

        Action::PageThumbnailDidLoad { token, id, artwork } => {
            if token != state.page_token {
                return DispatchResult::unchanged();
            }
            state.thumbnails.insert(id, artwork);
            DispatchResult::changed()
        }

        Action::PageThumbnailDidError { token, id, error } => {
            debug!(token, id, %error, "card preview unavailable");
            DispatchResult::unchanged()
        }

        Action::PageNext => {
            if state.pagination.next() {
                page_changed(state)
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::PagePrev => {
            if state.pagination.prev() {
                page_changed(state)
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::PageJumpInput(text) => {
            let target = text.trim().parse::<i64>().ok();
            state.page_input = text;
            match target {
                Some(page) if state.pagination.jump_to(page) => {
                    state.cursor = 0;
                    DispatchResult::changed_with(request_page(state))
                }
                _ => DispatchResult::changed(),
            }
        }

        Action::PageJumpCommit => {
            if state.page_input == state.pagination.current_page.to_string() {
                return DispatchResult::unchanged();
            }
            sync_page_input(state);
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchChange(term) => {
            if term == state.search_term {
                return DispatchResult::unchanged();
            }
            state.search_term = term;
            state.cursor = 0;
            DispatchResult::changed()
        }

        // ===== Grid =====
        Action::GridCursor(index) => {
            if index < state.visible_summaries().len() && index != state.cursor {
                state.cursor = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Entry detail =====
        Action::EntrySelect(id) => {
            state.selected_id = Some(id);
            state.detail = DataResource::Loading;
            state.artwork = DataResource::Empty;
            state.detail_token += 1;
            DispatchResult::changed_with(Effect::FetchDetail {
                token: state.detail_token,
                id,
            })
        }

        Action::EntryDidLoad { token, detail } => {
            if !detail_slot_current(state, token) {
                return DispatchResult::unchanged();
            }
            let artwork_url = detail.artwork_url.clone();
            state.detail = DataResource::Loaded(detail);
            match artwork_url {
                Some(url) => {
                    state.artwork = DataResource::Loading;
                    DispatchResult::changed_with(Effect::FetchArtwork { token, url })
                }
                None => DispatchResult::changed(),
            }
        }

        Action::EntryDidError { token, error } => {
            if !detail_slot_current(state, token) {
                return DispatchResult::unchanged();
            }
            state.detail = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::EntryArtworkDidLoad { token, artwork } => {
            if !detail_slot_current(state, token) {
                return DispatchResult::unchanged();
            }
            state.artwork = DataResource::Loaded(artwork);
            DispatchResult::changed()
        }

        Action::EntryArtworkDidError { token, error } => {
            if !detail_slot_current(state, token) {
                return DispatchResult::unchanged();
            }
            state.artwork = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::EntryClose => {
            if state.selected_id.is_none() {
                return DispatchResult::unchanged();
            }
            state.selected_id = None;
            state.detail = DataResource::Empty;
            state.artwork = DataResource::Empty;
            DispatchResult::changed()
        }

        // ===== Focus =====
        Action::FocusNext => {
            let next = state.focus.next();
            set_focus(state, next);
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            let prev = state.focus.prev();
            set_focus(state, prev);
            DispatchResult::changed()
        }

        // ===== Global =====
        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if state.loading_anim_active() {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn request_page(state: &mut AppState) -> Effect {
    state.page_token += 1;
    state.list_loading = true;
    Effect::FetchPage {
        token: state.page_token,
        offset: state.pagination.offset(),
        limit: ITEMS_PER_PAGE,
    }
}

fn request_thumbnails(state: &AppState) -> Vec<Effect> {
    state
        .summaries
        .iter()
        .map(|summary| Effect::FetchThumbnail {
            token: state.page_token,
            id: summary.id,
            url: state.artwork_url_for(summary.id),
        })
        .collect()
}

fn page_changed(state: &mut AppState) -> DispatchResult<Effect> {
    state.cursor = 0;
    sync_page_input(state);
    DispatchResult::changed_with(request_page(state))
}

fn sync_page_input(state: &mut AppState) {
    state.page_input = state.pagination.current_page.to_string();
}

fn set_focus(state: &mut AppState, focus: FocusArea) {
    if state.focus == FocusArea::PageJump && focus != FocusArea::PageJump {
        sync_page_input(state);
    }
    state.focus = focus;
}

fn detail_slot_current(state: &AppState, token: u64) -> bool {
    let current = state.selected_id.is_some() && token == state.detail_token;
    if !current {
        debug!(token, latest = state.detail_token, "dropping stale detail response");
    }
    current
}
