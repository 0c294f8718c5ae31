//! Type-ahead gene picker. Every edit of the query reloads the suggestions
//! for the current cohort selection; the list shows whatever the last
//! completed search returned.

use crossterm::event::{KeyCode, KeyEvent};
use gene_explorer_core::FieldId;
use ratatui::{
    Frame,
    layout::Constraint,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::state::{AppState, GeneSearchModal, ModalState};

use super::ModalResult;
use super::helpers::{HelpText, list_row, render_cursor_line, render_modal_frame, scroll_offset};

const MODAL_WIDTH: u16 = 60;
const MODAL_HEIGHT: u16 = 22;

pub fn render_gene_search_modal(frame: &mut Frame, modal: &GeneSearchModal, state: &AppState) {
    let genes = &state.controller.form().genes;
    let mf = render_modal_frame(
        frame,
        FieldId::Genes.label(),
        MODAL_WIDTH,
        MODAL_HEIGHT,
        Color::Cyan,
        &[
            Constraint::Length(3), // Query
            Constraint::Min(3),    // Suggestions
            Constraint::Length(3), // Selected genes
            Constraint::Length(1), // Help text
        ],
    );

    let query_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Search ");
    let query_inner = query_block.inner(mf.chunks[0]);
    frame.render_widget(query_block, mf.chunks[0]);
    frame.render_widget(
        Paragraph::new(render_cursor_line(&modal.query, modal.query.chars().count(), " ")),
        query_inner,
    );

    let height = usize::from(mf.chunks[1].height);
    let items: Vec<ListItem> = if genes.options.is_empty() {
        vec![ListItem::new(Span::styled(
            "  No matching genes",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        genes
            .options
            .iter()
            .enumerate()
            .skip(scroll_offset(modal.selected_index, height))
            .map(|(idx, gene)| {
                let mark = if genes.values.contains(gene) { "[x]" } else { "[ ]" };
                list_row(format!("{mark} {gene}"), idx == modal.selected_index)
            })
            .collect()
    };
    frame.render_widget(List::new(items), mf.chunks[1]);

    let selected = Paragraph::new(Line::from(vec![
        Span::styled("Selected: ", Style::default().fg(Color::Cyan)),
        Span::raw(genes.values.join(", ")),
    ]))
    .wrap(Wrap { trim: true });
    frame.render_widget(selected, mf.chunks[2]);

    let help = HelpText::new()
        .key("[↑/↓]", Color::DarkGray, "Navigate")
        .key("[Enter]", Color::Green, "Add")
        .key("[Bksp]", Color::DarkGray, "Remove last")
        .key("[Esc]", Color::Yellow, "Close")
        .build();
    frame.render_widget(help, mf.chunks[3]);
}

pub fn handle_gene_search_key(key: KeyEvent, state: &mut AppState) -> ModalResult {
    let ModalState::GeneSearch(modal) = &mut state.modal else {
        return ModalResult::Continue;
    };
    let suggestions = &state.controller.form().genes.options;

    let mut add = None;
    let mut remove_last = false;
    let mut query_changed = false;
    match key.code {
        KeyCode::Esc => return ModalResult::Cancelled,
        KeyCode::Enter => match suggestions.get(modal.selected_index) {
            Some(gene) => add = Some(gene.clone()),
            None => return ModalResult::Cancelled,
        },
        KeyCode::Down => {
            if !suggestions.is_empty() {
                modal.selected_index = (modal.selected_index + 1) % suggestions.len();
            }
        }
        KeyCode::Up => {
            if !suggestions.is_empty() {
                modal.selected_index = modal
                    .selected_index
                    .checked_sub(1)
                    .unwrap_or(suggestions.len() - 1);
            }
        }
        KeyCode::Backspace => {
            if modal.query.pop().is_some() {
                query_changed = true;
            } else {
                remove_last = true;
            }
        }
        KeyCode::Char(c) => {
            modal.query.push(c);
            query_changed = true;
        }
        _ => {}
    }
    if query_changed {
        modal.selected_index = 0;
    }
    let query = modal.query.clone();

    if let Some(gene) = add {
        let result = state.controller.add_gene(&gene);
        state.accept(result);
    }
    if remove_last {
        if let Some(last) = state.controller.form().genes.values.last().cloned() {
            let result = state.controller.remove_gene(&last);
            state.accept(result);
        }
    }
    if query_changed {
        let result = state.controller.search_genes(&query);
        if let Some(effects) = state.accept(result) {
            state.queue(effects);
        }
    }
    ModalResult::Continue
}
