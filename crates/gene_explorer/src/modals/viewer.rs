use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Constraint,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::state::ViewerModal;

use super::ModalResult;
use super::helpers::{HelpText, render_modal_frame};

const MODAL_WIDTH: u16 = 80;
const MODAL_HEIGHT: u16 = 12;

/// Full-size view of the current plot.
pub fn render_viewer_modal(frame: &mut Frame, modal: &ViewerModal) {
    let mf = render_modal_frame(
        frame,
        "Plot",
        MODAL_WIDTH,
        MODAL_HEIGHT,
        Color::Green,
        &[
            Constraint::Length(1), // Spacing
            Constraint::Min(3),    // Details
            Constraint::Length(1), // Help text
        ],
    );

    let label = Style::default().fg(Color::Cyan);
    let mut lines = vec![
        Line::from(vec![Span::styled("Image:  ", label), Span::raw(modal.url.clone())]),
        Line::from(vec![
            Span::styled("Size:   ", label),
            Span::raw(format!("{} x {} px", modal.size.width, modal.size.height)),
        ]),
    ];
    if let Some(source) = &modal.source_url {
        lines.push(Line::from(vec![
            Span::styled("Source: ", label),
            Span::raw(source.clone()),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), mf.chunks[1]);

    let help = HelpText::new()
        .key("[Enter]", Color::Green, "or")
        .key("[Esc]", Color::Yellow, "to close")
        .separator(" ")
        .build();
    frame.render_widget(help, mf.chunks[2]);
}

pub fn handle_viewer_key(key: KeyEvent) -> ModalResult {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => ModalResult::Cancelled,
        _ => ModalResult::Continue,
    }
}
