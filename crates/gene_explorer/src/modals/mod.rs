mod gene_search;
mod helpers;
mod message;
mod picker;
mod text_input;
mod viewer;

use crossterm::event::KeyEvent;
use gene_explorer_core::FieldId;
use ratatui::{Frame, layout::Rect};

use crate::state::{AppState, ModalState};

pub use gene_search::render_gene_search_modal;
pub use helpers::HelpText;
pub use message::render_message_modal;
pub use picker::{render_multi_picker_modal, render_picker_modal};
pub use text_input::render_text_input_modal;
pub use viewer::render_viewer_modal;

/// Value produced by a confirmed modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmedValue {
    /// Single choice; `None` clears the field
    Choice(Option<String>),
    Choices(Vec<String>),
    Text(String),
}

/// Result of handling a modal key event
#[derive(Debug, PartialEq, Eq)]
pub enum ModalResult {
    /// Modal confirmed with the edited field and its new value
    Confirmed(FieldId, ConfirmedValue),
    /// Modal was cancelled
    Cancelled,
    /// Key was handled, modal still active
    Continue,
}

/// Render the active modal as an overlay
pub fn render_modal(frame: &mut Frame, state: &AppState) {
    match &state.modal {
        ModalState::None => {}
        ModalState::Message(modal) => render_message_modal(frame, modal),
        ModalState::Picker(modal) => render_picker_modal(frame, modal),
        ModalState::MultiPicker(modal) => render_multi_picker_modal(frame, modal),
        ModalState::TextInput(modal) => render_text_input_modal(frame, modal),
        ModalState::GeneSearch(modal) => render_gene_search_modal(frame, modal, state),
        ModalState::Viewer(modal) => render_viewer_modal(frame, modal),
    }
}

/// Handle key events for the active modal
pub fn handle_modal_key(key: KeyEvent, state: &mut AppState) -> ModalResult {
    // Gene search drives the controller, so it needs the whole state
    if matches!(state.modal, ModalState::GeneSearch(_)) {
        return gene_search::handle_gene_search_key(key, state);
    }
    match &mut state.modal {
        ModalState::None => ModalResult::Continue,
        ModalState::Message(_) => message::handle_message_key(key),
        ModalState::Picker(modal) => picker::handle_picker_key(key, modal),
        ModalState::MultiPicker(modal) => picker::handle_multi_picker_key(key, modal),
        ModalState::TextInput(modal) => text_input::handle_text_input_key(key, modal),
        ModalState::Viewer(_) => viewer::handle_viewer_key(key),
        ModalState::GeneSearch(_) => ModalResult::Continue,
    }
}

/// Create a centered rectangle within the given area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
