use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarProps, StatusBarSection,
    StatusBarStyle, TextInput, TextInputProps, TextInputStyle,
};

use super::{Component, EntryCard, EntryCardProps, CARD_HEIGHT, CARD_WIDTH};
use crate::action::Action;
use crate::state::{spinner_frame, AppState, CatalogEntrySummary, FocusArea};

const ACCENT: Color = Color::Rgb(96, 165, 250);
const TEXT_MAIN: Color = Color::Rgb(220, 225, 235);
const TEXT_DIM: Color = Color::Rgb(110, 118, 135);
const INPUT_BG: Color = Color::Rgb(36, 42, 58);

const DEFAULT_COLUMNS: usize = 4;
const PREV_LABEL: &str = "◀ Previous";
const NEXT_LABEL: &str = "Next ▶";

/// Search box, card grid, pager and page-jump box.
///
/// The grid keeps the card rects from its last render so mouse clicks can be
/// mapped back to entries, and its column count so arrow keys can move by row.
pub struct CatalogBrowser {
    search: TextInput,
    page_jump: TextInput,
    card: EntryCard,
    status_bar: StatusBar,
    card_areas: Vec<(Rect, usize)>,
    prev_area: Rect,
    next_area: Rect,
    columns: usize,
}

pub struct CatalogBrowserProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for CatalogBrowser {
    fn default() -> Self {
        Self {
            search: TextInput::new(),
            page_jump: TextInput::new(),
            card: EntryCard,
            status_bar: StatusBar::new(),
            card_areas: Vec::new(),
            prev_area: Rect::default(),
            next_area: Rect::default(),
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl CatalogBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn input_style(focused: bool) -> TextInputStyle {
        TextInputStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: Some(INPUT_BG),
                fg: Some(if focused { TEXT_MAIN } else { TEXT_DIM }),
            },
            placeholder_style: None,
            cursor_style: None,
        }
    }

    fn handle_grid_key(&mut self, key: &KeyEvent, state: &AppState) -> Vec<Action> {
        let visible = state.visible_summaries();
        let len = visible.len();
        let cols = self.columns.max(1);
        let cursor = state.cursor;

        match key.code {
            KeyCode::Char('[') | KeyCode::PageUp => vec![Action::PagePrev],
            KeyCode::Char(']') | KeyCode::PageDown => vec![Action::PageNext],
            KeyCode::Left => {
                if cursor % cols == 0 {
                    vec![Action::PagePrev]
                } else {
                    vec![Action::GridCursor(cursor - 1)]
                }
            }
            KeyCode::Right => {
                if cursor % cols == cols - 1 || cursor + 1 >= len {
                    vec![Action::PageNext]
                } else {
                    vec![Action::GridCursor(cursor + 1)]
                }
            }
            KeyCode::Up if cursor >= cols => vec![Action::GridCursor(cursor - cols)],
            KeyCode::Down if cursor + cols < len => vec![Action::GridCursor(cursor + cols)],
            KeyCode::Home if len > 0 => vec![Action::GridCursor(0)],
            KeyCode::End if len > 0 => vec![Action::GridCursor(len - 1)],
            KeyCode::Enter => match visible.get(cursor) {
                Some(summary) => self.activate(summary, state, Rect::default(), key),
                None => Vec::new(),
            },
            KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
            _ => Vec::new(),
        }
    }

    fn activate(
        &mut self,
        summary: &CatalogEntrySummary,
        state: &AppState,
        area: Rect,
        key: &KeyEvent,
    ) -> Vec<Action> {
        let artwork_url = state.artwork_url_for(summary.id);
        let props = EntryCardProps {
            summary,
            artwork_url: &artwork_url,
            thumbnail: state.thumbnails.get(&summary.id),
            area,
            is_selected: true,
            on_activate: Action::EntrySelect,
        };
        self.card
            .handle_event(&EventKind::Key(*key), props)
            .into_iter()
            .collect()
    }

    fn handle_click(
        &mut self,
        event: &EventKind,
        column: u16,
        row: u16,
        state: &AppState,
    ) -> Vec<Action> {
        let position = Position::new(column, row);
        if self.prev_area.contains(position) {
            return vec![Action::PagePrev];
        }
        if self.next_area.contains(position) {
            return vec![Action::PageNext];
        }

        let visible = state.visible_summaries();
        let hit = self
            .card_areas
            .iter()
            .find(|(area, _)| area.contains(position))
            .copied();
        let Some((area, index)) = hit else {
            return Vec::new();
        };
        let Some(summary) = visible.get(index) else {
            return Vec::new();
        };
        let artwork_url = state.artwork_url_for(summary.id);
        let props = EntryCardProps {
            summary,
            artwork_url: &artwork_url,
            thumbnail: state.thumbnails.get(&summary.id),
            area,
            is_selected: index == state.cursor,
            on_activate: Action::EntrySelect,
        };
        self.card.handle_event(event, props).into_iter().collect()
    }

    fn render_search(&mut self, frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style(focused))
            .title(" Search ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let props = TextInputProps {
            value: &state.search_term,
            placeholder: "Search Pokemon on this page...",
            is_focused: focused,
            style: Self::input_style(focused),
            on_change: Action::SearchChange,
            on_submit: |_| Action::FocusNext,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.search.render(frame, inner, props);
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
        self.card_areas.clear();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.list_loading {
            let text = format!("{} Loading...", spinner_frame(state.tick));
            render_centered(frame, inner, Span::styled(text, Style::default().fg(ACCENT)));
            return;
        }

        let visible = state.visible_summaries();
        if visible.is_empty() {
            let text = if state.summaries.is_empty() {
                "Nothing loaded yet"
            } else {
                "No Pokemon match your search"
            };
            render_centered(frame, inner, Span::styled(text, Style::default().fg(TEXT_DIM)));
            return;
        }

        let cols = (inner.width / CARD_WIDTH).max(1) as usize;
        let rows_fit = (inner.height / CARD_HEIGHT).max(1) as usize;
        self.columns = cols;

        let cursor_row = state.cursor / cols;
        let first_row = cursor_row.saturating_sub(rows_fit - 1);
        let used_width = (cols as u16 * CARD_WIDTH).min(inner.width);
        let left = inner.x + (inner.width - used_width) / 2;

        for (index, summary) in visible.iter().enumerate() {
            let row = index / cols;
            if row < first_row || row >= first_row + rows_fit {
                continue;
            }
            let card_area = Rect {
                x: left + (index % cols) as u16 * CARD_WIDTH,
                y: inner.y + (row - first_row) as u16 * CARD_HEIGHT,
                width: CARD_WIDTH.min(inner.width),
                height: CARD_HEIGHT.min(inner.height),
            }
            .intersection(inner);
            if card_area.is_empty() {
                continue;
            }

            let artwork_url = state.artwork_url_for(summary.id);
            let props = EntryCardProps {
                summary,
                artwork_url: &artwork_url,
                thumbnail: state.thumbnails.get(&summary.id),
                area: card_area,
                is_selected: index == state.cursor,
                on_activate: Action::EntrySelect,
            };
            self.card.render(frame, card_area, props);
            self.card_areas.push((card_area, index));
        }
    }

    fn render_pager(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let pagination = &state.pagination;
        let label = format!(
            "Page {} of {}",
            pagination.current_page,
            pagination.total_pages()
        );
        let chunks = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(PREV_LABEL.chars().count() as u16 + 2),
            Constraint::Length(label.len() as u16 + 4),
            Constraint::Length(NEXT_LABEL.chars().count() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

        self.prev_area = chunks[1];
        self.next_area = chunks[3];
        frame.render_widget(
            Paragraph::new(pager_button(PREV_LABEL, pagination.has_prev()))
                .alignment(Alignment::Center),
            chunks[1],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(label, Style::default().fg(TEXT_MAIN)))
                .alignment(Alignment::Center),
            chunks[2],
        );
        frame.render_widget(
            Paragraph::new(pager_button(NEXT_LABEL, pagination.has_next()))
                .alignment(Alignment::Center),
            chunks[3],
        );
    }

    fn render_page_jump(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        focused: bool,
    ) {
        let chunks = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(13),
            Constraint::Length(8),
            Constraint::Min(0),
        ])
        .split(area);
        frame.render_widget(
            Paragraph::new(Span::styled("Go to page: ", Style::default().fg(TEXT_DIM))),
            chunks[1],
        );
        let props = TextInputProps {
            value: &state.page_input,
            placeholder: "",
            is_focused: focused,
            style: Self::input_style(focused),
            on_change: Action::PageJumpInput,
            on_submit: |_| Action::PageJumpCommit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.page_jump.render(frame, chunks[2], props);
    }

    fn render_status(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let left = match state.focus {
            FocusArea::Grid => vec![
                StatusBarHint::new("←↑↓→", "Move"),
                StatusBarHint::new("Enter", "Open"),
                StatusBarHint::new("[ ]", "Page"),
            ],
            FocusArea::Search => vec![
                StatusBarHint::new("Type", "Filter"),
                StatusBarHint::new("Enter", "Done"),
            ],
            FocusArea::PageJump => vec![
                StatusBarHint::new("0-9", "Page"),
                StatusBarHint::new("Enter", "Apply"),
            ],
        };
        let right = vec![
            StatusBarHint::new("Tab", "Focus"),
            StatusBarHint::new("q", "Quit"),
        ];
        let style = StatusBarStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: None,
                fg: Some(TEXT_DIM),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };
        let props = StatusBarProps {
            left: StatusBarSection::hints(&left).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::hints(&right).with_separator("  "),
            style,
            is_focused: false,
        };
        <StatusBar as Component<Action>>::render(&mut self.status_bar, frame, area, props);
    }
}

impl Component<Action> for CatalogBrowser {
    type Props<'a> = CatalogBrowserProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let state = props.state;

        let key = match event {
            EventKind::Key(key) => key,
            EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                return self.handle_click(event, mouse.column, mouse.row, state);
            }
            _ => return Vec::new(),
        };

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        match state.focus {
            FocusArea::Grid => self.handle_grid_key(key, state),
            FocusArea::Search => {
                if key.code == KeyCode::Esc {
                    return vec![Action::FocusNext];
                }
                let input_props = TextInputProps {
                    value: &state.search_term,
                    placeholder: "",
                    is_focused: true,
                    style: Self::input_style(true),
                    on_change: Action::SearchChange,
                    on_submit: |_| Action::FocusNext,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.search
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
            FocusArea::PageJump => {
                if key.code == KeyCode::Esc {
                    return vec![Action::PageJumpCommit, Action::FocusPrev];
                }
                let input_props = TextInputProps {
                    value: &state.page_input,
                    placeholder: "",
                    is_focused: true,
                    style: Self::input_style(true),
                    on_change: Action::PageJumpInput,
                    on_submit: |_| Action::PageJumpCommit,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.page_jump
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Length(3), // Search
            Constraint::Min(CARD_HEIGHT + 2),
            Constraint::Length(1), // Pager
            Constraint::Length(1), // Page jump
            Constraint::Length(1), // Status
        ])
        .split(area);

        let focused = |area: FocusArea| props.is_focused && state.focus == area;
        self.render_search(frame, chunks[0], state, focused(FocusArea::Search));
        self.render_grid(frame, chunks[1], state, focused(FocusArea::Grid));
        self.render_pager(frame, chunks[2], state);
        self.render_page_jump(frame, chunks[3], state, focused(FocusArea::PageJump));
        self.render_status(frame, chunks[4], state);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

fn pager_button(label: &str, enabled: bool) -> Span<'_> {
    if enabled {
        Span::styled(
            label,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            label,
            Style::default().fg(TEXT_DIM).add_modifier(Modifier::DIM),
        )
    }
}

fn render_centered(frame: &mut Frame, area: Rect, span: Span<'_>) {
    if area.height == 0 {
        return;
    }
    let row = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(Line::from(span)).alignment(Alignment::Center),
        row,
    );
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyModifiers, MouseEvent};
    use tui_dispatch::testing::*;

    use super::*;

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.gate.configured = true;
        state.pagination.set_total_count(10_000);
        state.summaries = ["bulbasaur", "ivysaur", "venusaur", "charmander", "charmeleon"]
            .iter()
            .enumerate()
            .map(|(i, name)| CatalogEntrySummary {
                id: i as u32 + 1,
                name: name.to_string(),
                source_url: format!("https://pokeapi.co/api/v2/pokemon/{}/", i + 1),
            })
            .collect();
        state
    }

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn collect(browser: &mut CatalogBrowser, event: EventKind, state: &AppState) -> Vec<Action> {
        browser
            .handle_event(
                &event,
                CatalogBrowserProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    fn render(browser: &mut CatalogBrowser, state: &AppState) -> String {
        let mut render = RenderHarness::new(90, 30);
        render.render_to_string_plain(|frame| {
            let area = frame.area();
            browser.render(
                frame,
                area,
                CatalogBrowserProps {
                    state,
                    is_focused: true,
                },
            );
        })
    }

    #[test]
    fn tab_cycles_focus() {
        let state = loaded_state();
        let mut browser = CatalogBrowser::new();
        collect(&mut browser, press(KeyCode::Tab), &state).assert_first(Action::FocusNext);
        collect(&mut browser, press(KeyCode::BackTab), &state).assert_first(Action::FocusPrev);
    }

    #[test]
    fn enter_opens_entry_under_cursor() {
        let mut state = loaded_state();
        state.cursor = 3;
        let mut browser = CatalogBrowser::new();
        collect(&mut browser, press(KeyCode::Enter), &state).assert_first(Action::EntrySelect(4));
    }

    #[test]
    fn arrows_move_cursor_and_page_at_edges() {
        let mut state = loaded_state();
        let mut browser = CatalogBrowser::new();

        collect(&mut browser, press(KeyCode::Right), &state).assert_first(Action::GridCursor(1));
        collect(&mut browser, press(KeyCode::Left), &state).assert_first(Action::PagePrev);
        collect(&mut browser, press(KeyCode::Down), &state).assert_first(Action::GridCursor(4));

        state.cursor = 4;
        collect(&mut browser, press(KeyCode::Right), &state).assert_first(Action::PageNext);
        collect(&mut browser, press(KeyCode::Down), &state).assert_empty();
        collect(&mut browser, press(KeyCode::Char(']')), &state).assert_first(Action::PageNext);
    }

    #[test]
    fn typing_goes_to_focused_input() {
        let mut state = loaded_state();
        state.focus = FocusArea::Search;
        let mut browser = CatalogBrowser::new();
        collect(&mut browser, EventKind::Key(key("q")), &state)
            .assert_first(Action::SearchChange("q".into()));

        state.focus = FocusArea::PageJump;
        state.page_input = String::new();
        collect(&mut browser, EventKind::Key(key("7")), &state)
            .assert_first(Action::PageJumpInput("7".into()));
        collect(&mut browser, press(KeyCode::Enter), &state).assert_first(Action::PageJumpCommit);
    }

    #[test]
    fn click_on_rendered_card_selects_it() {
        let state = loaded_state();
        let mut browser = CatalogBrowser::new();
        render(&mut browser, &state);

        let (area, index) = browser.card_areas[2];
        assert_eq!(index, 2);
        let click = EventKind::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x + 1,
            row: area.y + 1,
            modifiers: KeyModifiers::NONE,
        });
        collect(&mut browser, click, &state).assert_first(Action::EntrySelect(3));
    }

    #[test]
    fn renders_cards_and_pager() {
        let state = loaded_state();
        let mut browser = CatalogBrowser::new();
        let output = render(&mut browser, &state);
        assert!(output.contains("#0001"), "{output}");
        assert!(output.contains("Bulbasaur"), "{output}");
        assert!(output.contains("Page 1 of 500"), "{output}");
        assert!(output.contains("Go to page:"), "{output}");
        assert_eq!(browser.columns(), 4);
    }

    #[test]
    fn loading_replaces_grid() {
        let mut state = loaded_state();
        state.list_loading = true;
        let mut browser = CatalogBrowser::new();
        let output = render(&mut browser, &state);
        assert!(output.contains("Loading..."), "{output}");
        assert!(!output.contains("Bulbasaur"), "{output}");
    }

    #[test]
    fn search_narrows_rendered_cards() {
        let mut state = loaded_state();
        state.search_term = "CHAR".into();
        let mut browser = CatalogBrowser::new();
        let output = render(&mut browser, &state);
        assert!(output.contains("Charmander"), "{output}");
        assert!(!output.contains("Ivysaur"), "{output}");

        state.search_term = "zzz".into();
        let output = render(&mut browser, &state);
        assert!(output.contains("No Pokemon match your search"), "{output}");
    }

    #[test]
    fn empty_page_has_no_cards() {
        let mut state = loaded_state();
        state.summaries.clear();
        let mut browser = CatalogBrowser::new();
        let output = render(&mut browser, &state);
        assert!(output.contains("Nothing loaded yet"), "{output}");
        assert!(browser.card_areas.is_empty());
    }
}
