//! Gene expression explorer core
//!
//! This crate holds the host-independent logic behind the gene expression
//! explorer panel:
//! - Typed field options and the form state (`model`, `form`)
//! - The field dependency graph and the submit-readiness predicate (`dependency`)
//! - Gene filters built from the intersection of cohort annotation sets (`gene_filter`)
//! - The plot request lifecycle, including session-expiry retries (`controller`, `lifecycle`)
//! - Collaborator traits for the query, session and report services (`services`)
//!
//! The controller never performs I/O. Every operation returns a list of
//! [`Effect`]s; remote requests are executed by whoever owns the
//! collaborators (an inline [`services::drive`] loop or a background worker)
//! and their [`Completion`]s are fed back through
//! [`ExplorerController::handle`].
//!
//! ```ignore
//! use gene_explorer_core::{ExplorerConfig, ExplorerController};
//! use gene_explorer_core::services::{Collaborators, drive};
//!
//! let mut controller = ExplorerController::new(ExplorerConfig::default());
//! let effects = controller.initialize();
//! drive(&mut controller, &collaborators, effects);
//!
//! let effects = controller.select_timepoint(Some("7 Days"))?;
//! drive(&mut controller, &collaborators, effects);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod controller;
pub mod dependency;
pub mod display;
pub mod error;
pub mod form;
pub mod gene_filter;
pub mod lifecycle;
pub mod report;
pub mod request;
pub mod services;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ExplorerConfig, TextSizeBounds};
pub use controller::ExplorerController;
pub use error::{ConfigError, InputError, ServiceError, SubmitError};
pub use lifecycle::{CycleOutcome, PlotPhase, RetryPolicy};
pub use model::{Cohort, Demographic, Facet, FieldId, ResponseVariable, SessionHandle, Timepoint};
pub use request::{ImageSize, PlotRequest};
pub use services::{Completion, Effect, Request};
