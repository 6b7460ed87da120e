//! Root of the UI: key gate, header, browser and the detail overlay.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::{EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext};

use super::{
    CatalogBrowser, CatalogBrowserProps, Component, EntryDetail, EntryDetailProps, KeyGate,
    KeyGateProps,
};
use crate::action::Action;
use crate::state::AppState;

const TITLE_FG: Color = Color::Rgb(96, 165, 250);
const SUBTITLE_FG: Color = Color::Rgb(125, 134, 150);

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BrowseComponentId {
    Gate,
    Browser,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowseContext {
    Gate,
    Browser,
    Detail,
}

impl EventRoutingState<BrowseComponentId, BrowseContext> for AppState {
    fn focused(&self) -> Option<BrowseComponentId> {
        Some(self.modal().unwrap_or(BrowseComponentId::Browser))
    }

    fn modal(&self) -> Option<BrowseComponentId> {
        if !self.gate.configured {
            Some(BrowseComponentId::Gate)
        } else if self.detail_open() {
            Some(BrowseComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: BrowseComponentId) -> BrowseContext {
        match id {
            BrowseComponentId::Gate => BrowseContext::Gate,
            BrowseComponentId::Browser => BrowseContext::Browser,
            BrowseComponentId::Detail => BrowseContext::Detail,
        }
    }

    fn default_context(&self) -> BrowseContext {
        BrowseContext::Browser
    }
}

/// Where each component was drawn in the last frame; `None` when hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShellLayout {
    pub gate: Option<Rect>,
    pub browser: Option<Rect>,
    pub detail: Option<Rect>,
}

pub struct AppShell {
    gate: KeyGate,
    browser: CatalogBrowser,
    detail: EntryDetail,
    screen: Rect,
}

impl Default for AppShell {
    fn default() -> Self {
        Self {
            gate: KeyGate::new(),
            browser: CatalogBrowser::new(),
            detail: EntryDetail,
            screen: Rect::default(),
        }
    }
}

impl AppShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the whole screen and report component areas.
    pub fn draw(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        is_focused: bool,
    ) -> ShellLayout {
        self.screen = area;

        if !state.gate.configured {
            let props = KeyGateProps {
                api_key: &state.gate.api_key,
                is_focused,
            };
            self.gate.render(frame, area, props);
            return ShellLayout {
                gate: Some(area),
                ..ShellLayout::default()
            };
        }

        let chunks = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Browser
        ])
        .split(area);
        render_header(frame, chunks[0]);

        let detail_open = state.detail_open();
        let props = CatalogBrowserProps {
            state,
            is_focused: is_focused && !detail_open,
        };
        self.browser.render(frame, chunks[1], props);

        let mut layout = ShellLayout {
            browser: Some(chunks[1]),
            ..ShellLayout::default()
        };
        if detail_open {
            let props = EntryDetailProps {
                state,
                area,
                is_focused,
            };
            self.detail.render(frame, area, props);
            layout.detail = Some(area);
        }
        layout
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<BrowseComponentId>,
    ) {
        let layout = self.draw(frame, area, state, render_ctx.is_focused());
        for (id, rect) in [
            (BrowseComponentId::Gate, layout.gate),
            (BrowseComponentId::Browser, layout.browser),
            (BrowseComponentId::Detail, layout.detail),
        ] {
            match rect {
                Some(rect) => event_ctx.set_component_area(id, rect),
                None => {
                    event_ctx.component_areas.remove(&id);
                }
            }
        }
    }

    pub fn handle_event(
        &mut self,
        id: BrowseComponentId,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        match id {
            BrowseComponentId::Gate => {
                let props = KeyGateProps {
                    api_key: &state.gate.api_key,
                    is_focused: true,
                };
                let actions = self.gate.handle_event(event, props).into_iter().collect();
                modal_response(actions)
            }
            BrowseComponentId::Browser => {
                let props = CatalogBrowserProps {
                    state,
                    is_focused: true,
                };
                let actions = self.browser.handle_event(event, props).into_iter().collect();
                handler_response(actions)
            }
            BrowseComponentId::Detail => {
                let props = EntryDetailProps {
                    state,
                    area: self.screen,
                    is_focused: true,
                };
                let actions = self.detail.handle_event(event, props).into_iter().collect();
                modal_response(actions)
            }
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Pokemon Explorer",
            Style::default().fg(TITLE_FG).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Explore over 10,000 Pokemon",
            Style::default().fg(SUBTITLE_FG),
        )),
    ];
    let area = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(1),
        ..area
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

/// Modals swallow everything, including events they do not act on.
fn modal_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    HandlerResponse {
        actions,
        consumed: true,
        needs_render: false,
    }
}
