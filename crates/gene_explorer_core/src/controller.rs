//! The explorer controller: single owner of form state, the report session,
//! the running flag and the plot display.
//!
//! Every operation is a synchronous transition. Dependent fields and the
//! submit gate are recomputed before the operation returns, so a caller can
//! never observe the submit action enabled while a dependency is unmet.

use crate::config::ExplorerConfig;
use crate::dependency;
use crate::display::PlotDisplay;
use crate::error::{InputError, ServiceError, SubmitError};
use crate::form::{DEFAULT_COLOR, FormState};
use crate::gene_filter::GeneFilter;
use crate::lifecycle::{CycleOutcome, PlotCycle, PlotPhase};
use crate::model::{
    Cohort, Demographic, Facet, FieldId, ResponseVariable, SessionHandle, SessionInfo, Timepoint,
};
use crate::report::{ExecuteCall, ExecuteResponse, ReportOutcome};
use crate::request::{ImageSize, PlotRequest};
use crate::services::{Completion, Effect, Request};

/// Notice surfaced when the report succeeds without an image output.
pub const NO_IMAGE_MESSAGE: &str = "The report finished without producing a plot image.";

#[derive(Debug, Clone)]
pub struct ExplorerController {
    config: ExplorerConfig,
    form: FormState,
    session: Option<SessionHandle>,
    running: bool,
    phase: PlotPhase,
    display: PlotDisplay,
    gene_filter: Option<GeneFilter>,
    /// Bumped on every timepoint change; older cohort loads are discarded
    cohort_generation: u64,
    /// Bumped on every cohort change or gene search; older gene loads are discarded
    gene_generation: u64,
    container_width: u32,
    last_outcome: Option<CycleOutcome>,
}

impl ExplorerController {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            form: FormState::new(config.text_size),
            display: PlotDisplay::new(config.max_image_px),
            container_width: config.max_image_px,
            config,
            session: None,
            running: false,
            phase: PlotPhase::Idle,
            gene_filter: None,
            cohort_generation: 0,
            gene_generation: 0,
            last_outcome: None,
        }
    }

    /// Load the timepoint options and find or create the report session.
    pub fn initialize(&mut self) -> Vec<Effect> {
        tracing::debug!(context = %self.config.session_context, "Initializing explorer");
        vec![
            Effect::Request(Request::LoadTimepoints),
            Effect::Request(Request::ListSessions {
                context: self.config.session_context.clone(),
            }),
        ]
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> &PlotPhase {
        &self.phase
    }

    pub fn display(&self) -> &PlotDisplay {
        &self.display
    }

    pub fn gene_filter(&self) -> Option<&GeneFilter> {
        self.gene_filter.as_ref()
    }

    pub fn container_width(&self) -> u32 {
        self.container_width
    }

    pub fn last_outcome(&self) -> Option<&CycleOutcome> {
        self.last_outcome.as_ref()
    }

    /// Whether the user can currently change `field`: enabled by the
    /// dependency graph and not locked by a running request.
    pub fn is_interactive(&self, field: FieldId) -> bool {
        self.form.is_enabled(field) && !(self.running && field.is_primary())
    }

    pub fn is_ready_to_submit(&self) -> bool {
        dependency::is_ready(&self.form)
    }

    /// Enablement of the submit action.
    pub fn can_submit(&self) -> bool {
        !self.running && self.is_ready_to_submit()
    }

    pub fn unmet_requirements(&self) -> Vec<FieldId> {
        dependency::unmet_requirements(&self.form)
    }

    fn ensure_interactive(&self, field: FieldId) -> Result<(), InputError> {
        if self.is_interactive(field) {
            Ok(())
        } else {
            Err(InputError::Unavailable(field))
        }
    }

    // ========== Field events ==========

    pub fn select_response(&mut self, response: Option<ResponseVariable>) -> Result<(), InputError> {
        self.ensure_interactive(FieldId::Response)?;
        self.form.response.value = response;
        Ok(())
    }

    /// Select a timepoint by its display label; `None` clears it.
    pub fn select_timepoint(&mut self, label: Option<&str>) -> Result<Vec<Effect>, InputError> {
        self.ensure_interactive(FieldId::Timepoint)?;
        let timepoint = match label {
            None => None,
            Some(label) => Some(
                self.form
                    .timepoint
                    .options
                    .iter()
                    .find(|tp| tp.label() == label)
                    .cloned()
                    .ok_or_else(|| InputError::UnknownOption {
                        field: FieldId::Timepoint,
                        value: label.to_string(),
                    })?,
            ),
        };
        Ok(self.on_timepoint_changed(timepoint))
    }

    /// Timepoint changed: reset the cohort chain, fetch the cohorts available
    /// at the new timepoint and update the normalize checkbox.
    pub fn on_timepoint_changed(&mut self, timepoint: Option<Timepoint>) -> Vec<Effect> {
        self.form.timepoint.value = timepoint.clone();

        self.cohort_generation += 1;
        self.form.cohorts.options.clear();
        self.form.genes.options.clear();
        self.gene_filter = None;
        self.gene_generation += 1;
        dependency::cascade_clear(&mut self.form, FieldId::Timepoint);

        let Some(timepoint) = timepoint else {
            tracing::debug!("Timepoint cleared");
            return Vec::new();
        };

        if timepoint.is_baseline() {
            // No baseline exists below the first timepoint
            self.form.normalize.value = false;
            self.form.normalize.enabled = false;
        } else {
            self.form.normalize.enabled = true;
        }

        tracing::debug!(timepoint = %timepoint, "Loading cohorts for timepoint");
        vec![Effect::Request(Request::LoadCohorts {
            timepoint,
            generation: self.cohort_generation,
        })]
    }

    /// Replace the cohort selection with the options named in `names`.
    pub fn select_cohorts<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), InputError> {
        self.ensure_interactive(FieldId::Cohorts)?;
        if let Some(unknown) = names.iter().find(|name| {
            !self
                .form
                .cohorts
                .options
                .iter()
                .any(|c| c.name == name.as_ref())
        }) {
            return Err(InputError::UnknownOption {
                field: FieldId::Cohorts,
                value: unknown.as_ref().to_string(),
            });
        }
        // Option order, not click order
        let selected: Vec<Cohort> = self
            .form
            .cohorts
            .options
            .iter()
            .filter(|c| names.iter().any(|name| name.as_ref() == c.name))
            .cloned()
            .collect();
        self.on_cohorts_changed(selected);
        Ok(())
    }

    /// Check or uncheck one cohort.
    pub fn toggle_cohort(&mut self, name: &str) -> Result<(), InputError> {
        let mut names: Vec<String> = self
            .form
            .cohorts
            .values
            .iter()
            .map(|c| c.name.clone())
            .collect();
        if let Some(pos) = names.iter().position(|n| n == name) {
            names.remove(pos);
        } else {
            names.push(name.to_string());
        }
        self.select_cohorts(&names)
    }

    /// Cohort selection changed: rebuild the gene filter as the intersection
    /// of the selected cohorts' annotation sets.
    pub fn on_cohorts_changed(&mut self, selected: Vec<Cohort>) {
        self.form.cohorts.values = selected;
        self.gene_generation += 1;
        self.form.genes.options.clear();

        match GeneFilter::for_cohorts(&self.form.cohorts.values) {
            None => {
                self.gene_filter = None;
                dependency::cascade_clear(&mut self.form, FieldId::Cohorts);
            }
            Some(filter) => {
                tracing::debug!(sets = ?filter.feature_set_ids(), "Gene filter updated");
                self.gene_filter = Some(filter);
                self.form.genes.enabled = true;
            }
        }
    }

    pub fn set_genes(&mut self, genes: Vec<String>) -> Result<(), InputError> {
        self.ensure_interactive(FieldId::Genes)?;
        let mut unique: Vec<String> = Vec::with_capacity(genes.len());
        for gene in genes {
            let gene = gene.trim().to_string();
            if !gene.is_empty() && !unique.contains(&gene) {
                unique.push(gene);
            }
        }
        self.form.genes.values = unique;
        Ok(())
    }

    pub fn add_gene(&mut self, gene: &str) -> Result<(), InputError> {
        let mut genes = self.form.genes.values.clone();
        genes.push(gene.to_string());
        self.set_genes(genes)
    }

    pub fn remove_gene(&mut self, gene: &str) -> Result<(), InputError> {
        let genes = self
            .form
            .genes
            .values
            .iter()
            .filter(|g| g.as_str() != gene)
            .cloned()
            .collect();
        self.set_genes(genes)
    }

    /// Ask the query service for gene suggestions within the current filter.
    pub fn search_genes(&mut self, contains: &str) -> Result<Vec<Effect>, InputError> {
        self.ensure_interactive(FieldId::Genes)?;
        let Some(filter) = self.gene_filter.clone() else {
            return Err(InputError::Unavailable(FieldId::Genes));
        };
        self.gene_generation += 1;
        Ok(vec![Effect::Request(Request::SearchGenes {
            filter,
            contains: contains.trim().to_string(),
            limit: self.config.gene_page_size,
            generation: self.gene_generation,
        })])
    }

    pub fn set_normalize(&mut self, normalize: bool) -> Result<(), InputError> {
        self.ensure_interactive(FieldId::Normalize)?;
        self.form.normalize.value = normalize;
        Ok(())
    }

    /// Store the raw text size input; validity is part of readiness.
    pub fn set_text_size(&mut self, input: &str) -> Result<(), InputError> {
        self.ensure_interactive(FieldId::TextSize)?;
        self.form.text_size.input = input.trim().to_string();
        Ok(())
    }

    pub fn set_facet(&mut self, facet: Facet) {
        self.form.facet = facet;
    }

    /// Set one of the Shape, Color, Size or Alpha aesthetics.
    pub fn set_aesthetic(
        &mut self,
        field: FieldId,
        value: Option<Demographic>,
    ) -> Result<(), InputError> {
        self.ensure_interactive(field)?;
        let select = self
            .form
            .aesthetic_mut(field)
            .ok_or(InputError::Unavailable(field))?;
        if let Some(choice) = value {
            if !select.options.contains(&choice) {
                return Err(InputError::UnknownOption {
                    field,
                    value: choice.to_string(),
                });
            }
        }
        select.value = value;
        Ok(())
    }

    /// Restore Timepoint, Cohorts, Normalize, Genes and the aesthetics to
    /// their defaults. Fields locked by a running request are left alone.
    pub fn reset(&mut self) {
        if !self.running {
            self.on_timepoint_changed(None);
        }
        if self.form.normalize.enabled {
            self.form.normalize.value = false;
        }
        self.form.shape.value = None;
        self.form.color.value = Some(DEFAULT_COLOR);
        self.form.size.value = None;
        self.form.alpha.value = None;
        tracing::debug!(running = self.running, "Form reset");
    }

    /// Container width changed: keep the displayed image square within it.
    pub fn resize(&mut self, container_width: u32) -> bool {
        self.container_width = container_width;
        self.display.resize(container_width)
    }

    // ========== Plot request lifecycle ==========

    /// Snapshot the form and request a plot.
    pub fn submit(&mut self) -> Result<Vec<Effect>, SubmitError> {
        if self.running {
            return Err(SubmitError::Running);
        }
        let request = self.snapshot()?;

        self.set_running(true);
        self.last_outcome = None;
        tracing::info!(
            cohorts = request.cohorts.len(),
            genes = request.genes.len(),
            timepoint = %request.timepoint,
            width = request.image.width,
            session = ?self.session,
            "Requesting plot"
        );

        let cycle = PlotCycle {
            request,
            session_retries: 0,
        };
        let effect = self.execute_effect(&cycle.request);
        self.phase = PlotPhase::Submitting(cycle);
        Ok(vec![effect])
    }

    fn snapshot(&self) -> Result<PlotRequest, SubmitError> {
        let not_ready = || SubmitError::NotReady {
            unmet: self.unmet_requirements(),
        };
        if !self.is_ready_to_submit() {
            return Err(not_ready());
        }
        let form = &self.form;
        let response = form.response.value.ok_or_else(not_ready)?;
        let timepoint = form.timepoint.value.clone().ok_or_else(not_ready)?;
        let text_size = form.text_size.value().ok_or_else(not_ready)?;

        Ok(PlotRequest {
            response,
            cohorts: form.cohorts.values.iter().map(|c| c.name.clone()).collect(),
            timepoint,
            normalize: form.normalize.value,
            genes: form.genes.values.clone(),
            text_size,
            facet: form.facet,
            shape: form.shape.value,
            color: form.color.value,
            size: form.size.value,
            alpha: form.alpha.value,
            image: ImageSize::square_within(self.container_width, self.config.max_image_px),
        })
    }

    fn execute_effect(&self, request: &PlotRequest) -> Effect {
        Effect::Request(Request::Execute(ExecuteCall {
            report_id: self.config.report_id.clone(),
            session: self.session.clone(),
            request: request.clone(),
        }))
    }

    /// Lock or unlock the primary inputs and the submit action.
    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn finish(&mut self, outcome: CycleOutcome) {
        self.set_running(false);
        self.phase = PlotPhase::Idle;
        self.last_outcome = Some(outcome);
    }

    fn fail(&mut self, message: String) -> Vec<Effect> {
        tracing::warn!(error = %message, "Plot request failed");
        self.finish(CycleOutcome::Failed(message.clone()));
        vec![Effect::ReportFailure(message)]
    }

    // ========== Completions ==========

    /// Feed the result of a remote request back into the controller.
    pub fn handle(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::TimepointsLoaded(result) => self.on_timepoints_loaded(result),
            Completion::CohortsLoaded { generation, result } => {
                self.on_cohorts_loaded(generation, result)
            }
            Completion::GenesLoaded { generation, result } => {
                self.on_genes_loaded(generation, result)
            }
            Completion::SessionsListed(result) => self.on_sessions_listed(result),
            Completion::SessionCreated(result) => self.on_session_created(result),
            Completion::Executed(result) => self.on_executed(result),
        }
    }

    fn on_timepoints_loaded(&mut self, result: Result<Vec<Timepoint>, ServiceError>) -> Vec<Effect> {
        match result {
            Ok(timepoints) => {
                tracing::debug!(count = timepoints.len(), "Timepoints loaded");
                self.form.timepoint.enabled = !timepoints.is_empty();
                self.form.timepoint.options = timepoints;
                Vec::new()
            }
            Err(e) => {
                self.form.timepoint.enabled = false;
                vec![Effect::ReportFailure(format!("Failed to load timepoints: {e}"))]
            }
        }
    }

    fn on_cohorts_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<Cohort>, ServiceError>,
    ) -> Vec<Effect> {
        if generation != self.cohort_generation {
            tracing::debug!(generation, "Discarding stale cohort load");
            return Vec::new();
        }
        match result {
            Ok(cohorts) => {
                tracing::debug!(count = cohorts.len(), "Cohorts loaded");
                self.form.cohorts.enabled = !cohorts.is_empty();
                self.form.cohorts.options = cohorts;
                Vec::new()
            }
            Err(e) => {
                self.form.cohorts.enabled = false;
                vec![Effect::ReportFailure(format!("Failed to load cohorts: {e}"))]
            }
        }
    }

    fn on_genes_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<String>, ServiceError>,
    ) -> Vec<Effect> {
        if generation != self.gene_generation {
            tracing::debug!(generation, "Discarding stale gene search");
            return Vec::new();
        }
        match result {
            Ok(genes) => {
                self.form.genes.options = genes;
                Vec::new()
            }
            Err(e) => vec![Effect::ReportFailure(format!("Failed to load genes: {e}"))],
        }
    }

    fn on_sessions_listed(&mut self, result: Result<Vec<SessionInfo>, ServiceError>) -> Vec<Effect> {
        let sessions = match result {
            Ok(sessions) => sessions,
            Err(e) => {
                return vec![Effect::ReportFailure(format!(
                    "Failed to list report sessions: {e}"
                ))];
            }
        };
        if self.session.is_some() {
            return Vec::new();
        }
        let context = &self.config.session_context;
        match sessions.into_iter().find(|s| &s.context == context) {
            Some(existing) => {
                tracing::info!(session = %existing.id, "Reusing report session");
                self.session = Some(existing.id);
                Vec::new()
            }
            None => vec![Effect::Request(Request::CreateSession {
                context: context.clone(),
            })],
        }
    }

    fn on_session_created(&mut self, result: Result<SessionHandle, ServiceError>) -> Vec<Effect> {
        match std::mem::take(&mut self.phase) {
            PlotPhase::RecreatingSession(cycle) => match result {
                Ok(handle) => {
                    tracing::info!(
                        session = %handle,
                        retry = cycle.session_retries,
                        "Report session recreated, resubmitting"
                    );
                    self.session = Some(handle);
                    let effect = self.execute_effect(&cycle.request);
                    self.phase = PlotPhase::Submitting(cycle);
                    vec![effect]
                }
                Err(e) => self.fail(format!("Failed to create a report session: {e}")),
            },
            other => {
                self.phase = other;
                match result {
                    Ok(handle) => {
                        tracing::info!(session = %handle, "Report session created");
                        self.session = Some(handle);
                        Vec::new()
                    }
                    Err(e) => vec![Effect::ReportFailure(format!(
                        "Failed to create a report session: {e}"
                    ))],
                }
            }
        }
    }

    fn on_executed(&mut self, result: Result<ExecuteResponse, ServiceError>) -> Vec<Effect> {
        let mut cycle = match std::mem::take(&mut self.phase) {
            PlotPhase::Submitting(cycle) => cycle,
            other => {
                tracing::warn!("Ignoring report response with no request in flight");
                self.phase = other;
                return Vec::new();
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => return self.fail(e.to_string()),
        };

        match response.outcome() {
            ReportOutcome::Image(url) => {
                tracing::info!(url = %url, "Plot generated");
                self.display.show(url.clone(), self.container_width);
                self.finish(CycleOutcome::Succeeded { image: Some(url) });
                Vec::new()
            }
            ReportOutcome::NoImage => {
                tracing::warn!("Report produced no image output");
                self.finish(CycleOutcome::Succeeded { image: None });
                if self.config.report_empty_output {
                    vec![Effect::ReportFailure(NO_IMAGE_MESSAGE.to_string())]
                } else {
                    Vec::new()
                }
            }
            ReportOutcome::SessionInvalid { errors } => {
                if !self.config.retry_policy.allows(cycle.session_retries) {
                    return self.fail(errors);
                }
                cycle.session_retries += 1;
                tracing::info!(retry = cycle.session_retries, "Report session expired");
                self.phase = PlotPhase::RecreatingSession(cycle);
                vec![Effect::Request(Request::CreateSession {
                    context: self.config.session_context.clone(),
                })]
            }
            ReportOutcome::Failed(errors) => self.fail(errors),
        }
    }
}
