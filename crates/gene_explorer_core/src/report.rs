//! Report execution call and response classification.

use serde::Deserialize;
use serde_json::Value;

use crate::model::SessionHandle;
use crate::request::PlotRequest;

/// Error text the report engine uses when a session has expired server-side.
pub const SESSION_INVALID_MARKER: &str = "The report session is invalid";

/// One invocation of the plotting report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteCall {
    pub report_id: String,
    pub session: Option<SessionHandle>,
    pub request: PlotRequest,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub output_params: Vec<OutputParam>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputParam {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

impl OutputParam {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            value: Value::String(url.into()),
        }
    }

    /// The image URL, if this parameter is an image output.
    pub fn image_url(&self) -> Option<&str> {
        if self.kind == "image" {
            self.value.as_str()
        } else {
            None
        }
    }
}

/// What a report response means for the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Image(String),
    NoImage,
    SessionInvalid { errors: String },
    Failed(String),
}

impl ExecuteResponse {
    pub fn with_image(url: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            output_params: vec![OutputParam::image(url)],
        }
    }

    pub fn with_errors<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            errors: errors.into_iter().map(Into::into).collect(),
            output_params: Vec::new(),
        }
    }

    pub fn joined_errors(&self) -> String {
        self.errors.join("\n")
    }

    /// Only the first error is checked for the session marker, and only the
    /// first output parameter is considered for the image.
    pub fn outcome(&self) -> ReportOutcome {
        if let Some(first) = self.errors.first() {
            if first.contains(SESSION_INVALID_MARKER) {
                return ReportOutcome::SessionInvalid {
                    errors: self.joined_errors(),
                };
            }
            return ReportOutcome::Failed(self.joined_errors());
        }
        match self.output_params.first().and_then(OutputParam::image_url) {
            Some(url) => ReportOutcome::Image(url.to_string()),
            None => ReportOutcome::NoImage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_outcome() {
        let response = ExecuteResponse::with_image("http://x/plot.png");
        assert_eq!(
            response.outcome(),
            ReportOutcome::Image("http://x/plot.png".into())
        );
    }

    #[test]
    fn test_session_marker_only_checked_on_first_error() {
        let response = ExecuteResponse::with_errors([
            "Error in R: something broke",
            "The report session is invalid",
        ]);
        assert_eq!(
            response.outcome(),
            ReportOutcome::Failed(
                "Error in R: something broke\nThe report session is invalid".into()
            )
        );

        let response =
            ExecuteResponse::with_errors(["Error: The report session is invalid, create a new one"]);
        assert!(matches!(
            response.outcome(),
            ReportOutcome::SessionInvalid { .. }
        ));
    }

    #[test]
    fn test_non_image_first_output_is_no_image() {
        let response = ExecuteResponse {
            errors: vec![],
            output_params: vec![
                OutputParam {
                    kind: "text".into(),
                    value: Value::String("log".into()),
                },
                OutputParam::image("http://x/plot.png"),
            ],
        };
        assert_eq!(response.outcome(), ReportOutcome::NoImage);
        assert_eq!(ExecuteResponse::default().outcome(), ReportOutcome::NoImage);
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let body = r#"{"errors":[],"outputParams":[{"type":"image","value":"/_webdav/plot.png"}]}"#;
        let response: ExecuteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.outcome(),
            ReportOutcome::Image("/_webdav/plot.png".into())
        );
    }
}
