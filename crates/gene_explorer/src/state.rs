//! Terminal front-end state: the controller plus focus, modals and the
//! queue of effects waiting to be dispatched.

use std::cell::RefCell;
use std::collections::VecDeque;

use gene_explorer_core::services::FailureReporter;
use gene_explorer_core::{Effect, ExplorerController, FieldId, InputError, ImageSize};

/// Focusable element of the explorer screen, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldId),
    PlotButton,
    ResetButton,
    Image,
}

impl Focus {
    pub fn order() -> Vec<Focus> {
        FieldId::ALL
            .into_iter()
            .map(Focus::Field)
            .chain([Focus::PlotButton, Focus::ResetButton, Focus::Image])
            .collect()
    }

    pub fn next(self) -> Self {
        let order = Self::order();
        let idx = order.iter().position(|&f| f == self).unwrap_or(0);
        order[(idx + 1) % order.len()]
    }

    pub fn prev(self) -> Self {
        let order = Self::order();
        let idx = order.iter().position(|&f| f == self).unwrap_or(0);
        order[(idx + order.len() - 1) % order.len()]
    }
}

/// Failure messages waiting to be shown, oldest first.
#[derive(Debug, Default)]
pub struct FailureQueue {
    messages: RefCell<VecDeque<String>>,
}

impl FailureReporter for FailureQueue {
    fn report(&self, message: &str) {
        tracing::warn!(error = %message, "Failure reported");
        self.messages.borrow_mut().push_back(message.to_string());
    }
}

impl FailureQueue {
    pub fn pop(&self) -> Option<String> {
        self.messages.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

// ========== Modals ==========

#[derive(Debug)]
pub struct MessageModal {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl MessageModal {
    pub fn error(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            is_error: true,
        }
    }
}

/// Single choice. With `allow_none` the first entry clears the field.
#[derive(Debug)]
pub struct PickerModal {
    pub field: FieldId,
    pub options: Vec<String>,
    pub allow_none: bool,
    pub selected_index: usize,
}

pub const NONE_OPTION: &str = "(none)";

impl PickerModal {
    pub fn new(field: FieldId, options: Vec<String>, allow_none: bool, current: Option<&str>) -> Self {
        let offset = usize::from(allow_none);
        let selected_index = current
            .and_then(|c| options.iter().position(|o| o == c))
            .map(|i| i + offset)
            .unwrap_or(0);
        Self {
            field,
            options,
            allow_none,
            selected_index,
        }
    }

    /// Entries as displayed, including the clearing entry.
    pub fn entries(&self) -> Vec<&str> {
        let none = self.allow_none.then_some(NONE_OPTION);
        none.into_iter()
            .chain(self.options.iter().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.options.len() + usize::from(self.allow_none)
    }

    /// The chosen option; `None` for the clearing entry.
    pub fn choice(&self) -> Option<String> {
        if self.allow_none {
            self.selected_index
                .checked_sub(1)
                .and_then(|i| self.options.get(i).cloned())
        } else {
            self.options.get(self.selected_index).cloned()
        }
    }
}

/// Checkbox list.
#[derive(Debug)]
pub struct MultiPickerModal {
    pub field: FieldId,
    pub options: Vec<String>,
    pub checked: Vec<bool>,
    pub selected_index: usize,
}

impl MultiPickerModal {
    pub fn new(field: FieldId, options: Vec<String>, current: &[String]) -> Self {
        let checked = options.iter().map(|o| current.contains(o)).collect();
        Self {
            field,
            options,
            checked,
            selected_index: 0,
        }
    }

    pub fn toggle(&mut self) {
        if let Some(flag) = self.checked.get_mut(self.selected_index) {
            *flag = !*flag;
        }
    }

    pub fn chosen(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(o, _)| o.clone())
            .collect()
    }
}

#[derive(Debug)]
pub struct TextInputModal {
    pub field: FieldId,
    pub value: String,
    pub cursor_pos: usize,
}

impl TextInputModal {
    pub fn new(field: FieldId, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
            cursor_pos: value.len(),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(c) = self.value[..self.cursor_pos].chars().next_back() {
            self.cursor_pos -= c.len_utf8();
            self.value.remove(self.cursor_pos);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(c) = self.value[..self.cursor_pos].chars().next_back() {
            self.cursor_pos -= c.len_utf8();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.value[self.cursor_pos..].chars().next() {
            self.cursor_pos += c.len_utf8();
        }
    }
}

/// Gene search box; suggestions live in the controller's gene options.
#[derive(Debug, Default)]
pub struct GeneSearchModal {
    pub query: String,
    pub selected_index: usize,
}

#[derive(Debug)]
pub struct ViewerModal {
    pub url: String,
    pub size: ImageSize,
    pub source_url: Option<String>,
}

#[derive(Debug, Default)]
pub enum ModalState {
    #[default]
    None,
    Message(MessageModal),
    Picker(PickerModal),
    MultiPicker(MultiPickerModal),
    TextInput(TextInputModal),
    GeneSearch(GeneSearchModal),
    Viewer(ViewerModal),
}

// ========== App state ==========

pub struct AppState {
    pub controller: ExplorerController,
    pub focus: Focus,
    pub modal: ModalState,
    pub failures: FailureQueue,
    pub error_message: Option<String>,
    /// Effects produced by the last input, dispatched by the event loop
    pub pending: Vec<Effect>,
    pub cell_width_px: u32,
    pub source_url: Option<String>,
    pub exit: bool,
}

impl AppState {
    pub fn new(controller: ExplorerController, cell_width_px: u32, source_url: Option<String>) -> Self {
        Self {
            controller,
            focus: Focus::Field(FieldId::Timepoint),
            modal: ModalState::None,
            failures: FailureQueue::default(),
            error_message: None,
            pending: Vec::new(),
            cell_width_px,
            source_url,
            exit: false,
        }
    }

    pub fn queue(&mut self, effects: Vec<Effect>) {
        self.pending.extend(effects);
    }

    pub fn take_pending(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.pending)
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Unwrap a field edit, surfacing rejected input on the status bar.
    pub fn accept<T>(&mut self, result: Result<T, InputError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.clear_error();
                Some(value)
            }
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    /// Open the oldest queued failure once no other modal is showing.
    pub fn show_next_failure(&mut self) {
        if !matches!(self.modal, ModalState::None) {
            return;
        }
        if let Some(message) = self.failures.pop() {
            self.modal = ModalState::Message(MessageModal::error("Error", &message));
        }
    }
}
