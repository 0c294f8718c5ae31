//! Collaborator seams and the effects the controller asks them to perform.
//!
//! The controller is sans-I/O: it emits [`Effect`]s and consumes
//! [`Completion`]s. Whoever owns the collaborators executes the requests,
//! either inline with [`drive`] or on a background worker using
//! [`Remote::perform`].

use std::collections::VecDeque;

use crate::controller::ExplorerController;
use crate::error::ServiceError;
use crate::gene_filter::GeneFilter;
use crate::model::{Cohort, SessionHandle, SessionInfo, Timepoint};
use crate::report::{ExecuteCall, ExecuteResponse};

/// Tabular data the form's options come from.
pub trait QueryService {
    /// All timepoints with gene-expression data.
    fn timepoints(&self) -> Result<Vec<Timepoint>, ServiceError>;

    /// Cohorts measured at `timepoint` (equality filters on value and unit).
    fn cohorts(&self, timepoint: &Timepoint) -> Result<Vec<Cohort>, ServiceError>;

    /// Up to `limit` gene symbols within `filter` containing `contains`.
    fn genes(
        &self,
        filter: &GeneFilter,
        contains: &str,
        limit: usize,
    ) -> Result<Vec<String>, ServiceError>;
}

/// The host's registry of report sessions.
pub trait SessionRegistry {
    fn list_sessions(&self, context: &str) -> Result<Vec<SessionInfo>, ServiceError>;

    fn create_session(&self, context: &str) -> Result<SessionHandle, ServiceError>;
}

/// Remote report engine that renders the plot.
pub trait ReportService {
    fn execute(&self, call: &ExecuteCall) -> Result<ExecuteResponse, ServiceError>;
}

/// Shows an error to the user.
pub trait FailureReporter {
    fn report(&self, message: &str);
}

/// Remote work requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    LoadTimepoints,
    LoadCohorts {
        timepoint: Timepoint,
        generation: u64,
    },
    SearchGenes {
        filter: GeneFilter,
        contains: String,
        limit: usize,
        generation: u64,
    },
    ListSessions {
        context: String,
    },
    CreateSession {
        context: String,
    },
    Execute(ExecuteCall),
}

/// Result of a [`Request`], fed back through [`ExplorerController::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    TimepointsLoaded(Result<Vec<Timepoint>, ServiceError>),
    CohortsLoaded {
        generation: u64,
        result: Result<Vec<Cohort>, ServiceError>,
    },
    GenesLoaded {
        generation: u64,
        result: Result<Vec<String>, ServiceError>,
    },
    SessionsListed(Result<Vec<SessionInfo>, ServiceError>),
    SessionCreated(Result<SessionHandle, ServiceError>),
    Executed(Result<ExecuteResponse, ServiceError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Request(Request),
    ReportFailure(String),
}

impl Effect {
    pub fn request(&self) -> Option<&Request> {
        match self {
            Effect::Request(request) => Some(request),
            Effect::ReportFailure(_) => None,
        }
    }
}

/// The three remote collaborators.
#[derive(Clone, Copy)]
pub struct Remote<'a> {
    pub query: &'a dyn QueryService,
    pub sessions: &'a dyn SessionRegistry,
    pub reports: &'a dyn ReportService,
}

impl<'a> Remote<'a> {
    /// Use one host object for all three services.
    pub fn from_host<H>(host: &'a H) -> Self
    where
        H: QueryService + SessionRegistry + ReportService,
    {
        Self {
            query: host,
            sessions: host,
            reports: host,
        }
    }

    /// Execute one request, blocking until the collaborator answers.
    pub fn perform(&self, request: Request) -> Completion {
        match request {
            Request::LoadTimepoints => Completion::TimepointsLoaded(self.query.timepoints()),
            Request::LoadCohorts {
                timepoint,
                generation,
            } => Completion::CohortsLoaded {
                generation,
                result: self.query.cohorts(&timepoint),
            },
            Request::SearchGenes {
                filter,
                contains,
                limit,
                generation,
            } => Completion::GenesLoaded {
                generation,
                result: self.query.genes(&filter, &contains, limit),
            },
            Request::ListSessions { context } => {
                Completion::SessionsListed(self.sessions.list_sessions(&context))
            }
            Request::CreateSession { context } => {
                Completion::SessionCreated(self.sessions.create_session(&context))
            }
            Request::Execute(call) => Completion::Executed(self.reports.execute(&call)),
        }
    }
}

/// Remote collaborators plus the failure reporter.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub remote: Remote<'a>,
    pub failures: &'a dyn FailureReporter,
}

/// Run `effects` and every follow-up effect to completion, in order.
pub fn drive(
    controller: &mut ExplorerController,
    collaborators: &Collaborators<'_>,
    effects: Vec<Effect>,
) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::ReportFailure(message) => collaborators.failures.report(&message),
            Effect::Request(request) => {
                let completion = collaborators.remote.perform(request);
                queue.extend(controller.handle(completion));
            }
        }
    }
}
