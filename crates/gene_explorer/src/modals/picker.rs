use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Constraint,
    style::Color,
    widgets::{List, ListItem},
};

use crate::state::{MultiPickerModal, PickerModal};

use super::helpers::{HelpText, list_row, render_modal_frame, scroll_offset};
use super::{ConfirmedValue, ModalResult};

const MODAL_WIDTH: u16 = 60;

fn modal_height(rows: usize) -> u16 {
    // title + borders + help text + padding
    (rows as u16).clamp(3, 12) + 6
}

fn visible_rows(items: Vec<ListItem<'static>>, selected: usize, height: u16) -> List<'static> {
    let skip = scroll_offset(selected, usize::from(height));
    List::new(items.into_iter().skip(skip).collect::<Vec<_>>())
}

/// Render the single-choice picker
pub fn render_picker_modal(frame: &mut Frame, modal: &PickerModal) {
    let entries = modal.entries();
    let mf = render_modal_frame(
        frame,
        modal.field.label(),
        MODAL_WIDTH,
        modal_height(entries.len()),
        Color::Cyan,
        &[
            Constraint::Length(1), // Spacing
            Constraint::Min(1),    // Options list
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Help text
        ],
    );

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| list_row(entry.to_string(), idx == modal.selected_index))
        .collect();
    frame.render_widget(
        visible_rows(items, modal.selected_index, mf.chunks[1].height),
        mf.chunks[1],
    );

    let help = HelpText::new()
        .key("[j/k]", Color::DarkGray, "Navigate")
        .key("[Enter]", Color::Green, "Select")
        .key("[Esc]", Color::Yellow, "Cancel")
        .build();
    frame.render_widget(help, mf.chunks[3]);
}

/// Render the checkbox picker
pub fn render_multi_picker_modal(frame: &mut Frame, modal: &MultiPickerModal) {
    let mf = render_modal_frame(
        frame,
        modal.field.label(),
        MODAL_WIDTH,
        modal_height(modal.options.len()),
        Color::Cyan,
        &[
            Constraint::Length(1), // Spacing
            Constraint::Min(1),    // Options list
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Help text
        ],
    );

    let items: Vec<ListItem> = modal
        .options
        .iter()
        .zip(&modal.checked)
        .enumerate()
        .map(|(idx, (option, checked))| {
            let mark = if *checked { "[x]" } else { "[ ]" };
            list_row(format!("{mark} {option}"), idx == modal.selected_index)
        })
        .collect();
    frame.render_widget(
        visible_rows(items, modal.selected_index, mf.chunks[1].height),
        mf.chunks[1],
    );

    let help = HelpText::new()
        .key("[Space]", Color::DarkGray, "Toggle")
        .key("[Enter]", Color::Green, "Apply")
        .key("[Esc]", Color::Yellow, "Cancel")
        .build();
    frame.render_widget(help, mf.chunks[3]);
}

fn step(selected: &mut usize, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    *selected = if forward {
        (*selected + 1) % len
    } else if *selected == 0 {
        len - 1
    } else {
        *selected - 1
    };
}

/// Handle key events for the single-choice picker
pub fn handle_picker_key(key: KeyEvent, modal: &mut PickerModal) -> ModalResult {
    let len = modal.len();
    match key.code {
        KeyCode::Enter => {
            if len == 0 {
                ModalResult::Cancelled
            } else {
                ModalResult::Confirmed(modal.field, ConfirmedValue::Choice(modal.choice()))
            }
        }
        KeyCode::Esc => ModalResult::Cancelled,
        KeyCode::Char('j') | KeyCode::Down => {
            step(&mut modal.selected_index, len, true);
            ModalResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            step(&mut modal.selected_index, len, false);
            ModalResult::Continue
        }
        KeyCode::Home => {
            modal.selected_index = 0;
            ModalResult::Continue
        }
        KeyCode::End => {
            modal.selected_index = len.saturating_sub(1);
            ModalResult::Continue
        }
        _ => ModalResult::Continue,
    }
}

/// Handle key events for the checkbox picker
pub fn handle_multi_picker_key(key: KeyEvent, modal: &mut MultiPickerModal) -> ModalResult {
    let len = modal.options.len();
    match key.code {
        KeyCode::Enter => ModalResult::Confirmed(modal.field, ConfirmedValue::Choices(modal.chosen())),
        KeyCode::Esc => ModalResult::Cancelled,
        KeyCode::Char(' ') => {
            modal.toggle();
            ModalResult::Continue
        }
        KeyCode::Char('j') | KeyCode::Down => {
            step(&mut modal.selected_index, len, true);
            ModalResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            step(&mut modal.selected_index, len, false);
            ModalResult::Continue
        }
        _ => ModalResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use gene_explorer_core::FieldId;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn options(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_picker_wraps_and_confirms() {
        let mut modal = PickerModal::new(FieldId::Color, options(&["Age", "Gender"]), true, None);
        assert_eq!(handle_picker_key(key(KeyCode::Up), &mut modal), ModalResult::Continue);
        assert_eq!(modal.selected_index, 2);
        assert_eq!(
            handle_picker_key(key(KeyCode::Enter), &mut modal),
            ModalResult::Confirmed(FieldId::Color, ConfirmedValue::Choice(Some("Gender".to_string())))
        );
    }

    #[test]
    fn test_picker_none_entry_clears() {
        let mut modal = PickerModal::new(FieldId::Size, options(&["Age"]), true, Some("Age"));
        handle_picker_key(key(KeyCode::Home), &mut modal);
        assert_eq!(
            handle_picker_key(key(KeyCode::Enter), &mut modal),
            ModalResult::Confirmed(FieldId::Size, ConfirmedValue::Choice(None))
        );
    }

    #[test]
    fn test_empty_picker_cancels() {
        let mut modal = PickerModal::new(FieldId::Timepoint, Vec::new(), false, None);
        assert_eq!(handle_picker_key(key(KeyCode::Enter), &mut modal), ModalResult::Cancelled);
    }

    #[test]
    fn test_multi_picker_toggle_and_apply() {
        let mut modal = MultiPickerModal::new(FieldId::Cohorts, options(&["A", "B"]), &[]);
        handle_multi_picker_key(key(KeyCode::Char('j')), &mut modal);
        handle_multi_picker_key(key(KeyCode::Char(' ')), &mut modal);
        assert_eq!(
            handle_multi_picker_key(key(KeyCode::Enter), &mut modal),
            ModalResult::Confirmed(FieldId::Cohorts, ConfirmedValue::Choices(options(&["B"])))
        );
    }
}
