use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};

use super::{capitalize, modal_rect, padded_id, Component};
use crate::action::Action;
use crate::artwork::ARTWORK_COLS;
use crate::state::{spinner_frame, AppState, BaseStat, CatalogEntryDetail};

pub const DETAIL_WIDTH: u16 = 80;
pub const DETAIL_HEIGHT: u16 = 32;

const PANEL_BG: Color = Color::Rgb(18, 22, 32);
const TEXT_MAIN: Color = Color::Rgb(225, 230, 240);
const TEXT_DIM: Color = Color::Rgb(125, 134, 150);
const BAR_FILL: Color = Color::Rgb(37, 99, 235);
const BAR_EMPTY: Color = Color::Rgb(55, 62, 78);
const HIDDEN_FG: Color = Color::Rgb(192, 132, 252);
const ERROR_FG: Color = Color::Rgb(248, 113, 113);

const STAT_LABEL_WIDTH: usize = 16;

/// Modal overlay with the full record of the selected entry.
#[derive(Default)]
pub struct EntryDetail;

pub struct EntryDetailProps<'a> {
    pub state: &'a AppState,
    /// The whole screen; the panel is centered inside it and everything else is backdrop.
    pub area: Rect,
    pub is_focused: bool,
}

impl EntryDetail {
    pub fn content_rect(area: Rect) -> Rect {
        modal_rect(DETAIL_WIDTH, DETAIL_HEIGHT, area)
    }
}

impl Component<Action> for EntryDetail {
    type Props<'a> = EntryDetailProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('q') => Some(Action::EntryClose),
                _ => None,
            },
            EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let content = Self::content_rect(props.area);
                if content.contains(Position::new(mouse.column, mouse.row)) {
                    None
                } else {
                    Some(Action::EntryClose)
                }
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let panel = Self::content_rect(area);
        frame.render_widget(Clear, panel);

        let title = match &state.detail {
            DataResource::Loaded(detail) => capitalize(&detail.name),
            DataResource::Failed(_) => state.selected_id.map(padded_id).unwrap_or_default(),
            DataResource::Loading | DataResource::Empty => "Loading...".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(TEXT_DIM))
            .title(Span::styled(
                format!(" {title} "),
                Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(" Esc/x close ").right_aligned())
            .style(Style::default().bg(PANEL_BG).fg(TEXT_MAIN));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        match &state.detail {
            DataResource::Loaded(detail) => render_loaded(frame, inner, state, detail),
            DataResource::Failed(_) => render_message(
                frame,
                inner,
                Span::styled(
                    "Failed to load Pokemon details",
                    Style::default().fg(ERROR_FG),
                ),
            ),
            DataResource::Loading | DataResource::Empty => render_message(
                frame,
                inner,
                Span::styled(
                    format!("{} Loading...", spinner_frame(state.tick)),
                    Style::default().fg(BAR_FILL),
                ),
            ),
        }
    }
}

fn render_loaded(frame: &mut Frame, area: Rect, state: &AppState, detail: &CatalogEntryDetail) {
    let chunks = Layout::vertical([
        Constraint::Length(18), // Artwork + identity
        Constraint::Length(1),
        Constraint::Min(0), // Stats + abilities
    ])
    .split(area);
    let top = Layout::horizontal([
        Constraint::Length(ARTWORK_COLS as u16 + 2),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .split(chunks[0]);

    render_artwork(frame, top[0], state, detail);
    frame.render_widget(Paragraph::new(identity_lines(detail)), top[2]);
    frame.render_widget(
        Paragraph::new(stat_and_ability_lines(detail, chunks[2].width)),
        chunks[2],
    );
}

fn render_artwork(frame: &mut Frame, area: Rect, state: &AppState, detail: &CatalogEntryDetail) {
    let lines = match (&state.artwork, detail.artwork_url.as_deref()) {
        (DataResource::Loaded(artwork), _) => artwork.to_lines(),
        (DataResource::Loading, _) => vec![Line::from(Span::styled(
            format!("{} artwork", spinner_frame(state.tick)),
            Style::default().fg(TEXT_DIM),
        ))],
        (_, Some(url)) => vec![
            Line::from(Span::styled("\u{25d3}", Style::default().fg(TEXT_DIM))),
            Line::from(Span::styled(
                url.rsplit('/').next().unwrap_or(url).to_string(),
                Style::default().fg(TEXT_DIM),
            )),
        ],
        (_, None) => vec![Line::from(Span::styled(
            "No artwork",
            Style::default().fg(TEXT_DIM),
        ))],
    };
    let height = (lines.len() as u16).min(area.height);
    let row = Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), row);
}

fn identity_lines(detail: &CatalogEntryDetail) -> Vec<Line<'static>> {
    let label = Style::default().fg(TEXT_DIM);
    let mut badges = Vec::new();
    for name in &detail.types {
        if !badges.is_empty() {
            badges.push(Span::raw(" "));
        }
        badges.push(Span::styled(
            format!(" {} ", capitalize(name)),
            Style::default()
                .bg(type_color(name))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    }

    vec![
        Line::from(""),
        Line::from(Span::styled(padded_id(detail.id), label)),
        Line::from(Span::styled(
            capitalize(&detail.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Type", label)),
        Line::from(badges),
        Line::from(""),
        Line::from(vec![
            Span::styled("Height  ", label),
            Span::raw(detail.height_label()),
        ]),
        Line::from(vec![
            Span::styled("Weight  ", label),
            Span::raw(detail.weight_label()),
        ]),
    ]
}

fn stat_and_ability_lines(detail: &CatalogEntryDetail, width: u16) -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let bar_width = (width as usize).saturating_sub(STAT_LABEL_WIDTH + 6);

    let mut lines = vec![Line::from(Span::styled("Base Stats", heading))];
    lines.extend(detail.stats.iter().map(|stat| stat_line(stat, bar_width)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Abilities", heading)));

    let mut abilities = Vec::new();
    for slot in &detail.abilities {
        if !abilities.is_empty() {
            abilities.push(Span::raw("  "));
        }
        let (text, style) = if slot.is_hidden {
            (
                format!("{} (Hidden)", display_name(&slot.name)),
                Style::default().fg(HIDDEN_FG).add_modifier(Modifier::ITALIC),
            )
        } else {
            (display_name(&slot.name), Style::default().fg(TEXT_MAIN))
        };
        abilities.push(Span::styled(text, style));
    }
    lines.push(Line::from(abilities));
    lines
}

fn stat_line(stat: &BaseStat, bar_width: usize) -> Line<'static> {
    let filled = bar_fill(stat, bar_width);
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", display_name(&stat.name), width = STAT_LABEL_WIDTH),
            Style::default().fg(TEXT_DIM),
        ),
        Span::raw(format!("{:>3}  ", stat.base_value)),
        Span::styled("\u{2588}".repeat(filled), Style::default().fg(BAR_FILL)),
        Span::styled(
            "\u{2591}".repeat(bar_width - filled),
            Style::default().fg(BAR_EMPTY),
        ),
    ])
}

/// Filled cells for a bar `width` cells wide.
pub fn bar_fill(stat: &BaseStat, width: usize) -> usize {
    ((stat.bar_percent() / 100.0 * width as f64).round() as usize).min(width)
}

/// `special-attack` -> `Special Attack`. Only the first hyphen becomes a space.
pub fn display_name(name: &str) -> String {
    name.replacen('-', " ", 1)
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(156, 163, 175),
        "fire" => Color::Rgb(249, 115, 22),
        "water" => Color::Rgb(59, 130, 246),
        "electric" => Color::Rgb(250, 204, 21),
        "grass" => Color::Rgb(34, 197, 94),
        "ice" => Color::Rgb(34, 211, 238),
        "fighting" => Color::Rgb(220, 38, 38),
        "poison" => Color::Rgb(168, 85, 247),
        "ground" => Color::Rgb(202, 138, 4),
        "flying" => Color::Rgb(129, 140, 248),
        "psychic" => Color::Rgb(236, 72, 153),
        "bug" => Color::Rgb(132, 204, 22),
        "rock" => Color::Rgb(161, 98, 7),
        "ghost" => Color::Rgb(126, 34, 206),
        "dragon" => Color::Rgb(79, 70, 229),
        "dark" => Color::Rgb(55, 65, 81),
        "steel" => Color::Rgb(107, 114, 128),
        "fairy" => Color::Rgb(244, 114, 182),
        _ => Color::Rgb(156, 163, 175),
    }
}

fn render_message(frame: &mut Frame, area: Rect, span: Span<'_>) {
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
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use tui_dispatch::testing::*;

    use super::*;
    use crate::state::AbilitySlot;

    fn pikachu() -> CatalogEntryDetail {
        CatalogEntryDetail {
            id: 25,
            name: "pikachu".into(),
            height: 4,
            weight: 60,
            types: vec!["electric".into()],
            abilities: vec![
                AbilitySlot {
                    name: "static".into(),
                    is_hidden: false,
                },
                AbilitySlot {
                    name: "lightning-rod".into(),
                    is_hidden: true,
                },
            ],
            stats: vec![
                BaseStat {
                    name: "hp".into(),
                    base_value: 35,
                },
                BaseStat {
                    name: "special-attack".into(),
                    base_value: 50,
                },
            ],
            artwork_url: Some("https://img/25.png".into()),
        }
    }

    fn render(state: &AppState) -> String {
        let mut render = RenderHarness::new(100, 40);
        let mut detail = EntryDetail;
        render.render_to_string_plain(|frame| {
            let area = frame.area();
            detail.render(
                frame,
                area,
                EntryDetailProps {
                    state,
                    area,
                    is_focused: true,
                },
            );
        })
    }

    fn click(column: u16, row: u16) -> EventKind {
        EventKind::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn names_are_humanized() {
        assert_eq!(display_name("special-attack"), "Special Attack");
        assert_eq!(display_name("hp"), "Hp");
        assert_eq!(display_name("a-b-c"), "A B-c");
    }

    #[test]
    fn stat_bars_scale_to_255() {
        let stat = |base_value| BaseStat {
            name: "hp".into(),
            base_value,
        };
        assert_eq!(bar_fill(&stat(255), 40), 40);
        assert_eq!(bar_fill(&stat(0), 40), 0);
        assert_eq!(bar_fill(&stat(51), 50), 10);
        assert_eq!(bar_fill(&stat(400), 40), 40);
    }

    #[test]
    fn unknown_type_is_gray() {
        assert_eq!(type_color("shadow"), type_color("normal"));
        assert_ne!(type_color("fire"), type_color("normal"));
    }

    #[test]
    fn close_keys_and_backdrop() {
        let state = AppState::default();
        let area = Rect::new(0, 0, 100, 40);
        let mut detail = EntryDetail;
        let mut send = |event: EventKind| -> Vec<Action> {
            detail
                .handle_event(
                    &event,
                    EntryDetailProps {
                        state: &state,
                        area,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect()
        };

        send(EventKind::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
            .assert_first(Action::EntryClose);
        send(EventKind::Key(key("x"))).assert_first(Action::EntryClose);
        send(click(1, 1)).assert_first(Action::EntryClose);

        let content = EntryDetail::content_rect(area);
        send(click(content.x + 3, content.y + 3)).assert_empty();
    }

    #[test]
    fn loading_shows_placeholder_title() {
        let mut state = AppState::default();
        state.selected_id = Some(25);
        state.detail = DataResource::Loading;
        let output = render(&state);
        assert!(output.contains("Loading..."), "{output}");
    }

    #[test]
    fn loaded_record_renders_everything() {
        let mut state = AppState::default();
        state.selected_id = Some(25);
        state.detail = DataResource::Loaded(pikachu());
        let output = render(&state);
        for needle in [
            "Pikachu",
            "#0025",
            "Electric",
            "0.4 m",
            "6.0 kg",
            "Base Stats",
            "Special Attack",
            "Lightning Rod (Hidden)",
            "Static",
            "25.png",
        ] {
            assert!(output.contains(needle), "missing {needle}:\n{output}");
        }
    }

    #[test]
    fn failure_is_terminal_message() {
        let mut state = AppState::default();
        state.selected_id = Some(25);
        state.detail = DataResource::Failed("boom".into());
        let output = render(&state);
        assert!(output.contains("Failed to load Pokemon details"), "{output}");
        assert!(!output.contains("Loading..."), "{output}");
        assert!(output.contains("#0025"), "{output}");
    }
}
