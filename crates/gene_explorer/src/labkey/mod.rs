//! Blocking client for the LabKey server hosting the study data and the
//! plotting report.
//!
//! Implements the core's collaborator traits, so the controller can run
//! against a live server either inline or on the background worker.

mod wire;

use std::time::Duration;

use gene_explorer_core::gene_filter::GeneFilter;
use gene_explorer_core::model::SessionInfo;
use gene_explorer_core::report::{ExecuteCall, ExecuteResponse};
use gene_explorer_core::services::{QueryService, ReportService, SessionRegistry};
use gene_explorer_core::{Cohort, ServiceError, SessionHandle, Timepoint};
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::settings::ServerSettings;
use wire::{
    CreateSessionBody, CreateSessionResponse, ErrorBody, ExecuteBody, ExecuteSqlBody, GeneRow,
    RowsResponse, SessionsResponse,
};

const STUDY_SCHEMA: &str = "study";
const MICROARRAY_SCHEMA: &str = "Microarray";
const TIMEPOINTS_QUERY: &str = "timepoints_GEE";
const COHORTS_QUERY: &str = "studyCohortsInfo_GEE";

/// Report whose R source is linked from the explorer.
const SOURCE_REPORT_ID: &str = "module:GeneExpressionExplorer/reports/schemas/Plot.R";

/// API keys are sent as basic auth with this fixed user name.
const API_KEY_USER: &str = "apikey";

#[derive(Debug, Error)]
pub enum LabKeyError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid server url '{url}': {reason}")]
    Url { url: String, reason: String },
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<LabKeyError> for ServiceError {
    fn from(err: LabKeyError) -> Self {
        match err {
            LabKeyError::Status { status, message } => ServiceError::Status {
                code: status,
                message,
            },
            LabKeyError::Decode(msg) => ServiceError::Decode(msg),
            other => ServiceError::Transport(other.to_string()),
        }
    }
}

pub struct LabKeyClient {
    server: ServerSettings,
    http: Client,
}

impl LabKeyClient {
    pub fn new(server: ServerSettings) -> Result<Self, LabKeyError> {
        // Plot rendering can take minutes; requests wait as long as the server does
        let http = Client::builder()
            .user_agent(concat!("gene-explorer/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self { server, http })
    }

    pub fn server(&self) -> &ServerSettings {
        &self.server
    }

    /// `{base_url}/{container}/{action}`
    pub fn endpoint(&self, action: &str) -> Result<Url, LabKeyError> {
        let mut raw = self.server.base_url.trim_end_matches('/').to_string();
        for segment in self.server.container.split('/').filter(|s| !s.is_empty()) {
            raw.push('/');
            raw.push_str(segment);
        }
        raw.push('/');
        raw.push_str(action);
        Url::parse(&raw).map_err(|e| LabKeyError::Url {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }

    /// Page showing the R source of the plotting report.
    pub fn source_url(&self) -> Result<Url, LabKeyError> {
        let mut url = self.endpoint("reports-runReport.view")?;
        url.query_pairs_mut()
            .append_pair("reportId", SOURCE_REPORT_ID)
            .append_pair("tabId", "Source");
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.server.api_key.as_deref() {
            Some(key) => request.basic_auth(API_KEY_USER, Some(key)),
            None => request,
        }
    }

    fn get<T: DeserializeOwned>(
        &self,
        action: &str,
        query: &[(&str, String)],
    ) -> Result<T, LabKeyError> {
        let url = self.endpoint(action)?;
        tracing::debug!(%url, "GET");
        let response = self.authorize(self.http.get(url).query(query)).send()?;
        Self::decode(response)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        action: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, LabKeyError> {
        let url = self.endpoint(action)?;
        tracing::debug!(%url, "POST");
        let response = self
            .authorize(self.http.post(url).query(query).json(body))
            .send()?;
        Self::decode(response)
    }

    fn decode<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T, LabKeyError> {
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.exception)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(LabKeyError::Status {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&body).map_err(|e| LabKeyError::Decode(e.to_string()))
    }

    fn select_rows<T: DeserializeOwned>(
        &self,
        query_name: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, LabKeyError> {
        let mut query = vec![
            ("schemaName", STUDY_SCHEMA.to_string()),
            ("query.queryName", query_name.to_string()),
        ];
        query.extend(filters.iter().cloned());
        let response: RowsResponse<T> = self.get("query-selectRows.api", &query)?;
        Ok(response.rows)
    }
}

impl QueryService for LabKeyClient {
    fn timepoints(&self) -> Result<Vec<Timepoint>, ServiceError> {
        Ok(self.select_rows(TIMEPOINTS_QUERY, &[])?)
    }

    fn cohorts(&self, timepoint: &Timepoint) -> Result<Vec<Cohort>, ServiceError> {
        let filters = [
            ("query.timepoint~eq", timepoint.value.to_string()),
            ("query.timepointUnit~eq", timepoint.unit.clone()),
        ];
        Ok(self.select_rows(COHORTS_QUERY, &filters)?)
    }

    fn genes(
        &self,
        filter: &GeneFilter,
        contains: &str,
        limit: usize,
    ) -> Result<Vec<String>, ServiceError> {
        let mut query = Vec::new();
        if !contains.is_empty() {
            query.push(("query.gene_symbol~contains", contains.to_string()));
        }
        let body = ExecuteSqlBody {
            schema_name: MICROARRAY_SCHEMA,
            sql: filter.to_sql(),
            max_rows: limit,
        };
        let response: RowsResponse<GeneRow> =
            self.post("query-executeSql.api", &query, &body)?;
        Ok(response.rows.into_iter().map(|r| r.gene_symbol).collect())
    }
}

impl SessionRegistry for LabKeyClient {
    fn list_sessions(&self, context: &str) -> Result<Vec<SessionInfo>, ServiceError> {
        let response: SessionsResponse = self.get("reports-getSessions.api", &[])?;
        let sessions: Vec<SessionInfo> = response
            .report_sessions
            .into_iter()
            .map(SessionInfo::from)
            .collect();
        tracing::debug!(count = sessions.len(), context, "Listed report sessions");
        Ok(sessions)
    }

    fn create_session(&self, context: &str) -> Result<SessionHandle, ServiceError> {
        let body = CreateSessionBody {
            client_context: context,
        };
        let response: CreateSessionResponse =
            self.post("reports-createSession.api", &[], &body)?;
        Ok(SessionHandle::new(response.report_session_id))
    }
}

impl ReportService for LabKeyClient {
    fn execute(&self, call: &ExecuteCall) -> Result<ExecuteResponse, ServiceError> {
        let body = ExecuteBody {
            report_id: &call.report_id,
            report_session_id: call.session.as_ref().map(SessionHandle::as_str),
            input_params: call.request.input_params(),
        };
        Ok(self.post("reports-execute.api", &[], &body)?)
    }
}
