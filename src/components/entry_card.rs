use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::artwork::{Artwork, THUMB_ROWS};
use crate::state::CatalogEntrySummary;

pub const CARD_WIDTH: u16 = 20;
/// Border, preview rows, id and name.
pub const CARD_HEIGHT: u16 = THUMB_ROWS as u16 + 4;

const CARD_BG: Color = Color::Rgb(24, 30, 44);
const CARD_BORDER: Color = Color::Rgb(70, 80, 100);
const CARD_SELECTED: Color = Color::Rgb(96, 165, 250);
const TEXT_DIM: Color = Color::Rgb(140, 150, 165);

/// One grid cell. Stateless; the owner passes the area it was drawn in so
/// clicks can be hit-tested.
#[derive(Default)]
pub struct EntryCard;

pub struct EntryCardProps<'a> {
    pub summary: &'a CatalogEntrySummary,
    pub artwork_url: &'a str,
    /// Decoded preview, once the owner has fetched it.
    pub thumbnail: Option<&'a Artwork>,
    pub area: Rect,
    pub is_selected: bool,
    pub on_activate: fn(u32) -> Action,
}

impl Component<Action> for EntryCard {
    type Props<'a> = EntryCardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let id = props.summary.id;
        match event {
            EventKind::Key(key) if props.is_selected && key.code == KeyCode::Enter => {
                Some((props.on_activate)(id))
            }
            EventKind::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && props.area.contains(Position::new(mouse.column, mouse.row)) =>
            {
                Some((props.on_activate)(id))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_selected {
            Style::default().fg(CARD_SELECTED).bold()
        } else {
            Style::default().fg(CARD_BORDER)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(Style::default().bg(CARD_BG));

        let mut lines = preview_lines(props.thumbnail, props.artwork_url);
        lines.push(Line::from(Span::styled(
            padded_id(props.summary.id),
            Style::default().fg(TEXT_DIM),
        )));
        lines.push(Line::from(Span::styled(
            capitalize(&props.summary.name),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
    }
}

/// `#0025`
pub fn padded_id(id: u32) -> String {
    format!("#{id:04}")
}

/// Upper-case the first letter of the whole name, like CSS `capitalize` on a single word.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Exactly `THUMB_ROWS` lines, bottom-aligned so the labels stay put.
fn preview_lines(thumbnail: Option<&Artwork>, artwork_url: &str) -> Vec<Line<'static>> {
    let mut art = match thumbnail {
        Some(artwork) => artwork.to_lines(),
        None => vec![Line::from(Span::styled(
            artwork_label(artwork_url),
            Style::default().fg(TEXT_DIM),
        ))],
    };
    art.truncate(THUMB_ROWS as usize);
    let mut lines = vec![Line::from(""); THUMB_ROWS as usize - art.len()];
    lines.extend(art);
    lines
}

fn artwork_label(url: &str) -> String {
    let file = url.rsplit('/').next().unwrap_or(url);
    format!("\u{25d3} {file}")
}
