//! Request and response bodies of the LabKey JSON API.

use gene_explorer_core::SessionHandle;
use gene_explorer_core::model::SessionInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `query-selectRows.api` / `query-executeSql.api` response.
#[derive(Debug, Deserialize)]
pub struct RowsResponse<T> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct GeneRow {
    pub gene_symbol: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteSqlBody<'a> {
    pub schema_name: &'a str,
    pub sql: String,
    pub max_rows: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsResponse {
    #[serde(default)]
    pub report_sessions: Vec<SessionRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRow {
    pub report_session_id: String,
    #[serde(default)]
    pub client_context: Option<String>,
}

impl From<SessionRow> for SessionInfo {
    fn from(row: SessionRow) -> Self {
        SessionInfo {
            id: SessionHandle::new(row.report_session_id),
            context: row.client_context.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody<'a> {
    pub client_context: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub report_session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteBody<'a> {
    pub report_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_session_id: Option<&'a str>,
    pub input_params: Value,
}

/// Error body LabKey sends with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub exception: Option<String>,
}
