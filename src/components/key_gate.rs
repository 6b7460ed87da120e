use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::{modal_rect, Component};
use crate::action::Action;

const PANEL_BG: Color = Color::Rgb(250, 250, 252);
const PANEL_FG: Color = Color::Rgb(30, 30, 40);
const INPUT_BG: Color = Color::Rgb(228, 231, 238);
const BUTTON_BG: Color = Color::Rgb(37, 99, 235);

const KEY_PLACEHOLDER: &str = "API Key (optional for PokeAPI)";

/// The "enter your API key" screen. Whatever is typed is accepted.
pub struct KeyGate {
    input: TextInput,
}

pub struct KeyGateProps<'a> {
    pub api_key: &'a str,
    pub is_focused: bool,
}

impl Default for KeyGate {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl KeyGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn input_style() -> TextInputStyle {
        TextInputStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: Some(INPUT_BG),
                fg: Some(PANEL_FG),
            },
            placeholder_style: None,
            cursor_style: None,
        }
    }
}

impl Component<Action> for KeyGate {
    type Props<'a> = KeyGateProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Enter => vec![Action::GateConfirm],
            KeyCode::Esc => vec![Action::Quit],
            _ => {
                let input_props = TextInputProps {
                    value: props.api_key,
                    placeholder: KEY_PLACEHOLDER,
                    is_focused: true,
                    style: Self::input_style(),
                    on_change: Action::GateKeyChange,
                    on_submit: |_| Action::GateConfirm,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let panel = modal_rect(56, 13, area);
        frame.render_widget(Clear, panel);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().bg(PANEL_BG).fg(PANEL_FG));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Blurb
            Constraint::Length(1), // Input
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Button
            Constraint::Min(0),
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Pokemon Explorer",
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            chunks[1],
        );
        frame.render_widget(
            Paragraph::new(
                "Enter your API key to get started. If you're using PokeAPI, you can leave this blank.",
            )
            .style(Style::default().fg(Color::Rgb(90, 95, 110)))
            .wrap(Wrap { trim: true }),
            pad_x(chunks[3], 2),
        );
        let input_props = TextInputProps {
            value: props.api_key,
            placeholder: KEY_PLACEHOLDER,
            is_focused: props.is_focused,
            style: Self::input_style(),
            on_change: Action::GateKeyChange,
            on_submit: |_| Action::GateConfirm,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, pad_x(chunks[4], 2), input_props);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "  Start Exploring (Enter)  ",
                Style::default()
                    .bg(BUTTON_BG)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            chunks[6],
        );
    }
}

fn pad_x(area: Rect, amount: u16) -> Rect {
    Rect {
        x: area.x.saturating_add(amount),
        width: area.width.saturating_sub(amount * 2),
        ..area
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    use super::*;

    #[test]
    fn enter_confirms_without_checking_key() {
        let mut gate = KeyGate::new();
        let actions: Vec<_> = gate
            .handle_event(
                &EventKind::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
                KeyGateProps {
                    api_key: "",
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::GateConfirm);
    }

    #[test]
    fn typing_changes_key() {
        let mut gate = KeyGate::new();
        let actions: Vec<_> = gate
            .handle_event(
                &EventKind::Key(key("a")),
                KeyGateProps {
                    api_key: "",
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::GateKeyChange("a".into()));
    }

    #[test]
    fn renders_prompt() {
        let mut render = RenderHarness::new(80, 24);
        let mut gate = KeyGate::new();
        let output = render.render_to_string_plain(|frame| {
            let area = frame.area();
            gate.render(
                frame,
                area,
                KeyGateProps {
                    api_key: "",
                    is_focused: true,
                },
            );
        });
        assert!(output.contains("Pokemon Explorer"));
        assert!(output.contains("Start Exploring"));
    }
}
