use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gene_explorer_core::services::FailureReporter;
use gene_explorer_core::{Effect, ExplorerController};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::actions;
use crate::components::{Component, EventResult, FormPanel, PlotPanel, StatusBar};
use crate::labkey::LabKeyClient;
use crate::modals::{ModalResult, handle_modal_key, render_modal};
use crate::settings::Settings;
use crate::state::{AppState, ModalState};
use crate::worker::RequestWorker;

/// How long to wait for input before checking the worker again
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const FORM_WIDTH: u16 = 52;

pub struct App {
    state: AppState,
    worker: RequestWorker,
    form_panel: FormPanel,
    plot_panel: PlotPanel,
    status_bar: StatusBar,
    plot_width_px: Option<u32>,
}

impl App {
    pub fn new(settings: Settings, client: LabKeyClient) -> Self {
        let source_url = client.source_url().ok().map(|url| url.to_string());
        Self::with_worker(settings, RequestWorker::spawn(client), source_url)
    }

    /// Start the explorer against an already running worker.
    pub fn with_worker(settings: Settings, worker: RequestWorker, source_url: Option<String>) -> Self {
        let mut controller = ExplorerController::new(settings.explorer);
        let effects = controller.initialize();

        let mut state = AppState::new(controller, settings.ui.cell_width_px, source_url);
        state.queue(effects);

        let mut app = Self {
            state,
            worker,
            form_panel: FormPanel::new(),
            plot_panel: PlotPanel::new(),
            status_bar: StatusBar::new(),
            plot_width_px: None,
        };
        app.dispatch_pending();
        app
    }

    /// runs the application's main loop until the user quits
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while !self.state.exit {
            self.poll_worker();
            self.state.show_next_failure();
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(POLL_INTERVAL)? {
                self.handle_event(event::read()?);
            }
            self.dispatch_pending();
        }

        if self.worker.in_flight() > 0 {
            tracing::info!(
                in_flight = self.worker.in_flight(),
                "Exiting with requests in flight"
            );
        }
        Ok(())
    }

    /// Feed finished requests back into the controller.
    fn poll_worker(&mut self) {
        while let Some(completion) = self.worker.try_recv() {
            let effects = self.state.controller.handle(completion);
            self.state.queue(effects);
        }
        self.dispatch_pending();
    }

    fn dispatch_pending(&mut self) {
        for effect in self.state.take_pending() {
            match effect {
                Effect::Request(request) => {
                    if !self.worker.send(request) {
                        self.state.failures.report("The request worker has stopped");
                    }
                }
                Effect::ReportFailure(message) => self.state.failures.report(&message),
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Content
                Constraint::Length(2), // Status bar
            ])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(0)])
            .split(rows[0]);

        self.sync_plot_width(columns[1].width);

        self.form_panel.render(frame, columns[0], &self.state);
        self.plot_panel.render(frame, columns[1], &self.state);
        self.status_bar.render(frame, rows[1], &self.state);

        render_modal(frame, &self.state);
    }

    /// Track the plot area in pixels so images stay square within it.
    fn sync_plot_width(&mut self, columns: u16) {
        let width_px = u32::from(columns.saturating_sub(2)) * self.state.cell_width_px;
        if self.plot_width_px == Some(width_px) {
            return;
        }
        self.plot_width_px = Some(width_px);
        if self.state.controller.resize(width_px) {
            tracing::debug!(width_px, "Plot resized");
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key_event) = event {
            if key_event.kind == KeyEventKind::Press {
                self.handle_key_event(key_event);
            }
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        // Handle modal first if active
        if !matches!(self.state.modal, ModalState::None) {
            match handle_modal_key(key_event, &mut self.state) {
                ModalResult::Confirmed(field, value) => {
                    self.state.modal = ModalState::None;
                    actions::apply_confirmed(&mut self.state, field, value);
                }
                ModalResult::Cancelled => {
                    self.state.modal = ModalState::None;
                }
                ModalResult::Continue => {}
            }
            return;
        }

        // Global key bindings
        match key_event.code {
            KeyCode::Char('q') if key_event.modifiers.is_empty() => {
                self.state.exit = true;
                return;
            }
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.exit = true;
                return;
            }
            KeyCode::Char('p') => {
                actions::submit(&mut self.state);
                return;
            }
            KeyCode::Char('r') => {
                actions::reset(&mut self.state);
                return;
            }
            KeyCode::Esc => {
                self.state.clear_error();
                return;
            }
            _ => {}
        }

        if self.form_panel.handle_key(key_event, &mut self.state) == EventResult::Exit {
            self.state.exit = true;
        }
    }
}
