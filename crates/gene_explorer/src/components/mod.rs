pub mod form_panel;
pub mod plot_panel;
pub mod status_bar;

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};

use crate::state::AppState;

pub use form_panel::FormPanel;
pub use plot_panel::PlotPanel;
pub use status_bar::StatusBar;

/// Border color of the focused panel
pub const FOCUS_COLOR: Color = Color::Yellow;

/// Color of help text and inactive fields
pub const HELP_COLOR: Color = Color::DarkGray;

/// Result of handling an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult {
    /// Event was handled, continue
    Handled,
    /// Event was not handled, pass to parent
    NotHandled,
    /// Request app exit
    Exit,
}

/// Trait for components that can handle input and render
pub trait Component {
    fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> EventResult;

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState);
}

/// Bordered block whose border turns yellow when focused.
pub fn focused_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default()
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {title} "))
}
