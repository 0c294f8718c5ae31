//! Plot request lifecycle states.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──────────────▶ Idle (Succeeded)
//!                      │     ──other errors────▶ Idle (Failed)
//!                      │
//!                session invalid
//!                      ▼
//!              RecreatingSession ──created──▶ Submitting (same request)
//!                      └──────────failed────▶ Idle (Failed)
//! ```

use serde::{Deserialize, Serialize};

use crate::request::PlotRequest;

/// How often an expired report session may be recreated for one submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Recreate at most `max_retries` times, then report the session error
    Limited { max_retries: u32 },
    /// Recreate every time the session-invalid error comes back
    Unbounded,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Limited { max_retries: 1 }
    }
}

impl RetryPolicy {
    /// Whether another recreation is permitted after `retries_so_far`.
    pub fn allows(&self, retries_so_far: u32) -> bool {
        match self {
            RetryPolicy::Limited { max_retries } => retries_so_far < *max_retries,
            RetryPolicy::Unbounded => true,
        }
    }
}

/// One submit cycle: the immutable request and how often it was retried.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotCycle {
    pub request: PlotRequest,
    pub session_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlotPhase {
    #[default]
    Idle,
    /// The execute call is outstanding
    Submitting(PlotCycle),
    /// The session expired and a replacement is being created
    RecreatingSession(PlotCycle),
}

impl PlotPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, PlotPhase::Idle)
    }

    pub fn cycle(&self) -> Option<&PlotCycle> {
        match self {
            PlotPhase::Idle => None,
            PlotPhase::Submitting(cycle) | PlotPhase::RecreatingSession(cycle) => Some(cycle),
        }
    }
}

/// Terminal result of the most recent submit cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The report ran; `image` is `None` when it produced no image output
    Succeeded { image: Option<String> },
    /// The errors surfaced to the user
    Failed(String),
}
