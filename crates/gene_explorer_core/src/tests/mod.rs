//! Controller tests against in-memory collaborators
//!
//! Tests are organized by topic:
//! - `support` - Mock host and failure recorder shared by all topics
//! - `dependency` - Timepoint → Cohorts → Genes cascade and gene filters
//! - `readiness` - Required fields and the submit gate
//! - `lifecycle` - Submit, response handling and input locking
//! - `session` - Session discovery and expiry retries
//! - `reset` - Reset with and without a running request

mod support;

mod readiness;
mod reset;
mod session;
