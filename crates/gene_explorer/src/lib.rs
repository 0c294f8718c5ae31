//! Terminal front-end for the gene expression explorer
//!
//! Drives [`gene_explorer_core::ExplorerController`] against a LabKey server:
//! - An interactive ratatui form with a plot panel (`app`, `components`, `modals`)
//! - A `plot` subcommand that requests a single plot without the UI (`headless`)
//! - A blocking LabKey client run on a background worker thread (`labkey`, `worker`)
//! - YAML settings and file logging in the data directory (`settings`, `logging`)

// ============================================================================
// Application modules
// ============================================================================

pub mod actions;
pub mod app;
pub mod components;
pub mod headless;
pub mod modals;
pub mod state;

// ============================================================================
// Host integration modules
// ============================================================================

pub mod labkey;
pub mod logging;
pub mod settings;
pub mod worker;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use app::App;
pub use labkey::LabKeyClient;
pub use logging::init_logging;
pub use settings::Settings;
