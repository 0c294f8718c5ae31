use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{DEFAULT_SESSION_CONTEXT, ExplorerConfig};
use crate::controller::ExplorerController;
use crate::error::ServiceError;
use crate::gene_filter::GeneFilter;
use crate::model::{Cohort, SessionHandle, SessionInfo, Timepoint};
use crate::report::{ExecuteCall, ExecuteResponse};
use crate::services::{
    Collaborators, Effect, FailureReporter, QueryService, Remote, ReportService, SessionRegistry,
    drive,
};

pub const PLOT_URL: &str = "http://labkey.test/_temp/plot.png";
pub const SEEDED_SESSION: &str = "session-seeded";

/// In-memory stand-in for the study host.
///
/// Execute responses are scripted; once the script runs out every execute
/// succeeds with [`PLOT_URL`].
pub struct MockHost {
    pub timepoints: Vec<Timepoint>,
    pub cohorts: FxHashMap<String, Vec<Cohort>>,
    pub annotations: FxHashMap<i64, FxHashSet<String>>,
    pub sessions: RefCell<Vec<SessionInfo>>,
    pub execute_script: RefCell<VecDeque<Result<ExecuteResponse, ServiceError>>>,
    pub fail_session_list: Cell<bool>,
    pub fail_session_create: Cell<bool>,
    pub created: RefCell<Vec<SessionHandle>>,
    pub executed: RefCell<Vec<ExecuteCall>>,
}

impl MockHost {
    /// Days 0, 1 and 7; cohort `A` everywhere, `B` from day 1, `C` on day 7.
    /// A session tagged with the explorer's context already exists.
    pub fn new() -> Self {
        let mut cohorts = FxHashMap::default();
        cohorts.insert("0 Days".to_string(), vec![Cohort::new("A", 1)]);
        cohorts.insert(
            "1 Day".to_string(),
            vec![Cohort::new("A", 1), Cohort::new("B", 2)],
        );
        cohorts.insert(
            "7 Days".to_string(),
            vec![Cohort::new("A", 1), Cohort::new("B", 2), Cohort::new("C", 3)],
        );

        let mut annotations = FxHashMap::default();
        annotations.insert(1, genes(&["CD19", "IFI27", "MX1", "STAT1"]));
        annotations.insert(2, genes(&["MX1", "OAS1", "STAT1"]));
        annotations.insert(3, genes(&["MX1"]));

        Self {
            timepoints: vec![
                Timepoint::new(0.0, "Days"),
                Timepoint::new(1.0, "Days"),
                Timepoint::new(7.0, "Days"),
            ],
            cohorts,
            annotations,
            sessions: RefCell::new(vec![SessionInfo {
                id: SessionHandle::new(SEEDED_SESSION),
                context: DEFAULT_SESSION_CONTEXT.to_string(),
            }]),
            execute_script: RefCell::new(VecDeque::new()),
            fail_session_list: Cell::new(false),
            fail_session_create: Cell::new(false),
            created: RefCell::new(Vec::new()),
            executed: RefCell::new(Vec::new()),
        }
    }

    pub fn without_sessions(self) -> Self {
        self.sessions.borrow_mut().clear();
        self
    }

    pub fn script_execute(&self, response: Result<ExecuteResponse, ServiceError>) {
        self.execute_script.borrow_mut().push_back(response);
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    pub fn executed_count(&self) -> usize {
        self.executed.borrow().len()
    }
}

pub fn genes(symbols: &[&str]) -> FxHashSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

impl QueryService for MockHost {
    fn timepoints(&self) -> Result<Vec<Timepoint>, ServiceError> {
        Ok(self.timepoints.clone())
    }

    fn cohorts(&self, timepoint: &Timepoint) -> Result<Vec<Cohort>, ServiceError> {
        Ok(self
            .cohorts
            .get(&timepoint.label())
            .cloned()
            .unwrap_or_default())
    }

    fn genes(
        &self,
        filter: &GeneFilter,
        contains: &str,
        limit: usize,
    ) -> Result<Vec<String>, ServiceError> {
        let needle = contains.to_uppercase();
        Ok(filter
            .evaluate(&self.annotations)
            .into_iter()
            .filter(|gene| gene.contains(&needle))
            .take(limit)
            .collect())
    }
}

impl SessionRegistry for MockHost {
    fn list_sessions(&self, _context: &str) -> Result<Vec<SessionInfo>, ServiceError> {
        if self.fail_session_list.get() {
            return Err(ServiceError::Status {
                code: 500,
                message: "registry unavailable".to_string(),
            });
        }
        Ok(self.sessions.borrow().clone())
    }

    fn create_session(&self, context: &str) -> Result<SessionHandle, ServiceError> {
        if self.fail_session_create.get() {
            return Err(ServiceError::Transport("connection reset".to_string()));
        }
        let handle = SessionHandle::new(format!("session-{}", self.created_count() + 1));
        self.created.borrow_mut().push(handle.clone());
        self.sessions.borrow_mut().push(SessionInfo {
            id: handle.clone(),
            context: context.to_string(),
        });
        Ok(handle)
    }
}

impl ReportService for MockHost {
    fn execute(&self, call: &ExecuteCall) -> Result<ExecuteResponse, ServiceError> {
        self.executed.borrow_mut().push(call.clone());
        self.execute_script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ExecuteResponse::with_image(PLOT_URL)))
    }
}

#[derive(Default)]
pub struct FailureRecorder {
    pub messages: RefCell<Vec<String>>,
}

impl FailureReporter for FailureRecorder {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

impl FailureRecorder {
    pub fn count(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

/// Mock host, failure recorder and an initialized controller.
pub struct Harness {
    pub host: MockHost,
    pub failures: FailureRecorder,
    pub controller: ExplorerController,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(MockHost::new(), ExplorerConfig::default())
    }

    pub fn with(host: MockHost, config: ExplorerConfig) -> Self {
        let mut harness = Self {
            host,
            failures: FailureRecorder::default(),
            controller: ExplorerController::new(config),
        };
        let effects = harness.controller.initialize();
        harness.run(effects);
        harness
    }

    /// Execute `effects` and every follow-up against the mock host.
    pub fn run(&mut self, effects: Vec<Effect>) {
        let collaborators = Collaborators {
            remote: Remote::from_host(&self.host),
            failures: &self.failures,
        };
        drive(&mut self.controller, &collaborators, effects);
    }

    pub fn select_timepoint(&mut self, label: &str) {
        let effects = self.controller.select_timepoint(Some(label)).unwrap();
        self.run(effects);
    }

    pub fn search_genes(&mut self, contains: &str) {
        let effects = self.controller.search_genes(contains).unwrap();
        self.run(effects);
    }

    /// Fill every required field: day 7, cohorts A and B, gene MX1.
    pub fn fill_required(&mut self) {
        self.select_timepoint("7 Days");
        self.controller.select_cohorts(&["A", "B"]).unwrap();
        self.controller.set_genes(vec!["MX1".to_string()]).unwrap();
    }

    pub fn submit(&mut self) {
        let effects = self.controller.submit().unwrap();
        self.run(effects);
    }
}
