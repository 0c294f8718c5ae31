use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Constraint,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::TextInputModal;

use super::helpers::{HelpText, char_cursor, render_cursor_line, render_modal_frame};
use super::{ConfirmedValue, ModalResult};

const MODAL_WIDTH: u16 = 60;
const MODAL_HEIGHT: u16 = 10;

/// Render the text input modal
pub fn render_text_input_modal(frame: &mut Frame, modal: &TextInputModal) {
    let mf = render_modal_frame(
        frame,
        modal.field.label(),
        MODAL_WIDTH,
        MODAL_HEIGHT,
        Color::Cyan,
        &[
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Prompt
            Constraint::Length(1), // Spacing
            Constraint::Length(3), // Input field
            Constraint::Length(1), // Help text
        ],
    );

    let prompt = Paragraph::new(Line::from(Span::styled(
        modal.field.help(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(prompt, mf.chunks[1]);

    let cursor = char_cursor(&modal.value, modal.cursor_pos);
    let input_line = render_cursor_line(&modal.value, cursor, " ");

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let input_inner = input_block.inner(mf.chunks[3]);
    frame.render_widget(input_block, mf.chunks[3]);
    frame.render_widget(Paragraph::new(input_line), input_inner);

    let help = HelpText::new()
        .key("[Enter]", Color::Green, "Confirm")
        .key("[Esc]", Color::Yellow, "Cancel")
        .build();
    frame.render_widget(help, mf.chunks[4]);
}

/// Handle key events for text input modal
pub fn handle_text_input_key(key: KeyEvent, modal: &mut TextInputModal) -> ModalResult {
    match key.code {
        KeyCode::Enter => ModalResult::Confirmed(modal.field, ConfirmedValue::Text(modal.value.clone())),
        KeyCode::Esc => ModalResult::Cancelled,
        KeyCode::Backspace => {
            modal.backspace();
            ModalResult::Continue
        }
        KeyCode::Left => {
            modal.move_cursor_left();
            ModalResult::Continue
        }
        KeyCode::Right => {
            modal.move_cursor_right();
            ModalResult::Continue
        }
        KeyCode::Char(c) => {
            modal.insert_char(c);
            ModalResult::Continue
        }
        _ => ModalResult::Continue,
    }
}
