//! Left-hand panel: the primary fields, the additional options and the
//! Plot/Reset toolbar.

use crossterm::event::{KeyCode, KeyEvent};
use gene_explorer_core::{ExplorerController, FieldId};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::{Component, EventResult, FOCUS_COLOR, HELP_COLOR, focused_block};
use crate::actions;
use crate::state::{AppState, Focus};

const LABEL_WIDTH: usize = 12;

/// How a field can be interacted with right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    Editable,
    /// Enabled, but frozen while a plot request runs
    Locked,
    Disabled,
}

pub fn field_access(controller: &ExplorerController, field: FieldId) -> FieldAccess {
    if controller.is_interactive(field) {
        FieldAccess::Editable
    } else if controller.form().is_enabled(field) {
        FieldAccess::Locked
    } else {
        FieldAccess::Disabled
    }
}

fn field_value(controller: &ExplorerController, field: FieldId) -> String {
    let form = controller.form();
    match field {
        FieldId::Normalize => String::from(if form.normalize.value { "[x]" } else { "[ ]" }),
        _ => form.display_value(field),
    }
}

pub struct FormPanel;

impl FormPanel {
    pub fn new() -> Self {
        Self
    }

    fn field_line(state: &AppState, field: FieldId) -> Line<'static> {
        let controller = &state.controller;
        let focused = state.focus == Focus::Field(field);
        let access = field_access(controller, field);

        let label_style = match (focused, access) {
            (true, _) => Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD),
            (false, FieldAccess::Editable) => Style::default(),
            (false, _) => Style::default().fg(HELP_COLOR),
        };
        let prefix = if focused { "> " } else { "  " };
        let label = format!("{prefix}{:<LABEL_WIDTH$}", field.label());

        let value = field_value(controller, field);
        let mut spans = vec![Span::styled(label, label_style)];
        if field.is_required() && !controller.form().is_valid(field) {
            let shown = if value.is_empty() { "(required)".to_string() } else { value };
            spans.push(Span::styled(shown, Style::default().fg(Color::Red)));
        } else if access == FieldAccess::Disabled {
            spans.push(Span::styled(value, Style::default().fg(HELP_COLOR)));
        } else {
            spans.push(Span::raw(value));
        }
        if access == FieldAccess::Locked {
            spans.push(Span::styled(" (locked)", Style::default().fg(HELP_COLOR)));
        }
        Line::from(spans)
    }

    fn button(label: &str, focused: bool, active: bool) -> Span<'static> {
        let style = match (focused, active) {
            (true, _) => Style::default()
                .fg(Color::Black)
                .bg(FOCUS_COLOR)
                .add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default().fg(HELP_COLOR),
        };
        Span::styled(format!("[ {label} ]"), style)
    }

    fn help_for(state: &AppState) -> &'static str {
        match state.focus {
            Focus::Field(field) => field.help(),
            Focus::PlotButton => "Generate the plot for the current selection.",
            Focus::ResetButton => "Restore the default selection.",
            Focus::Image => "Open the full-size plot.",
        }
    }
}

impl Default for FormPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FormPanel {
    fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> EventResult {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                state.focus = state.focus.next();
                EventResult::Handled
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                state.focus = state.focus.prev();
                EventResult::Handled
            }
            KeyCode::Enter => {
                actions::activate(state);
                EventResult::Handled
            }
            KeyCode::Char(' ') => {
                match state.focus {
                    Focus::Field(field @ (FieldId::Normalize | FieldId::Facet)) => {
                        actions::toggle(state, field)
                    }
                    _ => actions::activate(state),
                }
                EventResult::Handled
            }
            _ => EventResult::NotHandled,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = matches!(
            state.focus,
            Focus::Field(_) | Focus::PlotButton | Focus::ResetButton
        );
        let block = focused_block("Gene Expression Explorer", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Fields
                Constraint::Length(1), // Toolbar
                Constraint::Length(4), // Field help
            ])
            .split(inner);

        let mut lines = Vec::new();
        for field in FieldId::ALL {
            if field == FieldId::TextSize {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "  Additional options",
                    Style::default().fg(Color::Cyan),
                )));
            }
            lines.push(Self::field_line(state, field));
        }
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        let toolbar = Line::from(vec![
            Span::raw("  "),
            Self::button(
                "Plot",
                state.focus == Focus::PlotButton,
                state.controller.can_submit(),
            ),
            Span::raw("  "),
            Self::button("Reset", state.focus == Focus::ResetButton, true),
        ]);
        frame.render_widget(Paragraph::new(toolbar), chunks[1]);

        let help = Paragraph::new(Self::help_for(state))
            .style(Style::default().fg(HELP_COLOR))
            .wrap(Wrap { trim: true });
        frame.render_widget(help, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use gene_explorer_core::ExplorerConfig;

    use super::*;

    fn state() -> AppState {
        AppState::new(ExplorerController::new(ExplorerConfig::default()), 8, None)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_moves_focus() {
        let mut state = state();
        let mut panel = FormPanel::new();
        assert_eq!(state.focus, Focus::Field(FieldId::Timepoint));

        panel.handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.focus, Focus::Field(FieldId::Cohorts));
        panel.handle_key(key(KeyCode::Up), &mut state);
        panel.handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.focus, Focus::Field(FieldId::Response));
    }

    #[test]
    fn test_unhandled_keys_pass_through() {
        let mut state = state();
        let mut panel = FormPanel::new();
        assert_eq!(
            panel.handle_key(key(KeyCode::Char('p')), &mut state),
            EventResult::NotHandled
        );
    }

    #[test]
    fn test_field_access_before_timepoints_load() {
        let state = state();
        assert_eq!(
            field_access(&state.controller, FieldId::Response),
            FieldAccess::Editable
        );
        assert_eq!(
            field_access(&state.controller, FieldId::Timepoint),
            FieldAccess::Disabled
        );
        assert_eq!(
            field_access(&state.controller, FieldId::Cohorts),
            FieldAccess::Disabled
        );
    }

    #[test]
    fn test_normalize_shown_as_checkbox() {
        let mut state = state();
        assert_eq!(field_value(&state.controller, FieldId::Normalize), "[ ]");
        let mut panel = FormPanel::new();
        state.focus = Focus::Field(FieldId::Normalize);
        panel.handle_key(key(KeyCode::Char(' ')), &mut state);
        assert_eq!(field_value(&state.controller, FieldId::Normalize), "[x]");
    }
}
