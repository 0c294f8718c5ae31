//! Right-hand panel: the current plot, or a busy mask while one is generated.

use crossterm::event::KeyEvent;
use gene_explorer_core::{CycleOutcome, PlotPhase};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::{Component, EventResult, HELP_COLOR, focused_block};
use crate::state::{AppState, Focus};

pub struct PlotPanel;

impl PlotPanel {
    pub fn new() -> Self {
        Self
    }

    fn busy_lines(phase: &PlotPhase) -> Vec<Line<'static>> {
        let detail = match phase {
            PlotPhase::RecreatingSession(_) => "Report session expired, starting a new one...",
            _ => "Generating plot...",
        };
        vec![
            Line::from(""),
            Line::from(Span::styled(
                detail,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        ]
    }

    fn image_lines(state: &AppState) -> Vec<Line<'static>> {
        let label = Style::default().fg(Color::Cyan);
        let controller = &state.controller;
        let mut lines = Vec::new();

        match controller.display().image() {
            Some(image) => {
                lines.push(Line::from(vec![
                    Span::styled("Image  ", label),
                    Span::raw(image.url.clone()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Size   ", label),
                    Span::raw(format!("{} x {} px", image.size.width, image.size.height)),
                ]));
            }
            None => lines.push(Line::from(Span::styled(
                "No plot yet. Fill in the required fields and press p.",
                Style::default().fg(HELP_COLOR),
            ))),
        }

        if let Some(CycleOutcome::Failed(message)) = controller.last_outcome() {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Last attempt failed: ", Style::default().fg(Color::Red)),
                Span::raw(message.clone()),
            ]));
        }
        if let Some(session) = controller.session() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Session {}", session.as_str()),
                Style::default().fg(HELP_COLOR),
            )));
        }
        lines
    }
}

impl Default for PlotPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PlotPanel {
    fn handle_key(&mut self, _key: KeyEvent, _state: &mut AppState) -> EventResult {
        EventResult::NotHandled
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = focused_block("Plot", state.focus == Focus::Image);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let paragraph = if state.controller.is_running() {
            Paragraph::new(Self::busy_lines(state.controller.phase())).alignment(Alignment::Center)
        } else {
            Paragraph::new(Self::image_lines(state)).wrap(Wrap { trim: false })
        };
        frame.render_widget(paragraph, inner);
    }
}
