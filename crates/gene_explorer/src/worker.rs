//! Background worker performing remote requests without blocking the UI.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use gene_explorer_core::services::{QueryService, Remote, ReportService, SessionRegistry};
use gene_explorer_core::{Completion, Request};

/// Message sent to the background worker
#[derive(Debug)]
enum WorkerMessage {
    Perform(Request),
    /// Graceful shutdown
    Shutdown,
}

/// Worker thread that owns the host client and performs requests in order
pub struct RequestWorker {
    request_tx: Sender<WorkerMessage>,
    response_rx: Receiver<Completion>,
    in_flight: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl RequestWorker {
    /// Move `host` onto a new background thread
    pub fn spawn<H>(host: H) -> Self
    where
        H: QueryService + SessionRegistry + ReportService + Send + 'static,
    {
        let (request_tx, request_rx) = channel();
        let (response_tx, response_rx) = channel();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let ctx = WorkerContext {
            response_tx,
            in_flight: in_flight.clone(),
        };
        let thread = thread::spawn(move || ctx.run(&host, request_rx));

        Self {
            request_tx,
            response_rx,
            in_flight,
            thread: Some(thread),
        }
    }

    /// Queue a request; returns false if the worker has stopped
    pub fn send(&self, request: Request) -> bool {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let sent = self.request_tx.send(WorkerMessage::Perform(request)).is_ok();
        if !sent {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        sent
    }

    /// Try to receive a completion (non-blocking)
    pub fn try_recv(&self) -> Option<Completion> {
        self.response_rx.try_recv().ok()
    }

    /// Requests queued or being performed
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        let _ = self.request_tx.send(WorkerMessage::Shutdown);
    }
}

impl Drop for RequestWorker {
    fn drop(&mut self) {
        self.shutdown();
        let Some(thread) = self.thread.take() else {
            return;
        };
        // Requests have no timeout, so a pending report would block exit
        if self.in_flight() == 0 {
            let _ = thread.join();
        } else {
            tracing::info!(
                in_flight = self.in_flight(),
                "Detaching worker with requests in flight"
            );
        }
    }
}

/// Shared state for the background worker thread.
struct WorkerContext {
    response_tx: Sender<Completion>,
    in_flight: Arc<AtomicUsize>,
}

impl WorkerContext {
    fn run<H>(&self, host: &H, request_rx: Receiver<WorkerMessage>)
    where
        H: QueryService + SessionRegistry + ReportService,
    {
        let remote = Remote::from_host(host);
        while let Ok(message) = request_rx.recv() {
            match message {
                WorkerMessage::Shutdown => break,
                WorkerMessage::Perform(request) => {
                    tracing::debug!(?request, "Performing request");
                    let completion = remote.perform(request);
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                    if self.response_tx.send(completion).is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Request worker stopped");
    }
}
