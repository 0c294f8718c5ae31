//! Explorer configuration
//!
//! `ExplorerConfig` carries everything the controller needs that is not form
//! state: which report to execute, how sessions are tagged, image and text
//! size limits, and the session retry policy.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lifecycle::RetryPolicy;

pub const DEFAULT_REPORT_ID: &str = "module:GeneExpressionExplorer/Plot.R";
pub const DEFAULT_SESSION_CONTEXT: &str = "GeneExpressionExplorer";

/// Largest edge of a requested plot image, in pixels.
pub const DEFAULT_MAX_IMAGE_PX: u32 = 800;

/// Inclusive bounds of the text size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSizeBounds {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl Default for TextSizeBounds {
    fn default() -> Self {
        // A size of zero renders no text at all, so it is rejected
        Self {
            min: 1,
            max: 30,
            default: 18,
        }
    }
}

impl TextSizeBounds {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Report executed by the host's report engine
    pub report_id: String,
    /// Client context tag used to find or create the report session
    pub session_context: String,
    pub max_image_px: u32,
    pub text_size: TextSizeBounds,
    /// Number of gene suggestions fetched per search
    pub gene_page_size: usize,
    /// How often an expired session may be recreated within one submit
    pub retry_policy: RetryPolicy,
    /// Surface a notice when the report succeeds without producing an image
    pub report_empty_output: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            report_id: DEFAULT_REPORT_ID.to_string(),
            session_context: DEFAULT_SESSION_CONTEXT.to_string(),
            max_image_px: DEFAULT_MAX_IMAGE_PX,
            text_size: TextSizeBounds::default(),
            gene_page_size: 10,
            retry_policy: RetryPolicy::default(),
            report_empty_output: true,
        }
    }
}

impl ExplorerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let TextSizeBounds { min, max, default } = self.text_size;
        if !(min <= default && default <= max) {
            return Err(ConfigError::InvalidTextSizeBounds { min, max, default });
        }
        if self.max_image_px == 0 {
            return Err(ConfigError::ZeroImageSize);
        }
        if self.gene_page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.report_id.trim().is_empty() {
            return Err(ConfigError::EmptyReportId);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ExplorerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_text_size_bounds() {
        let bounds = TextSizeBounds::default();
        assert!(!bounds.contains(0));
        assert!(bounds.contains(1));
        assert!(bounds.contains(18));
        assert!(bounds.contains(30));
        assert!(!bounds.contains(31));
    }

    #[test]
    fn test_validate_rejects_default_outside_bounds() {
        let config = ExplorerConfig {
            text_size: TextSizeBounds {
                min: 1,
                max: 10,
                default: 18,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTextSizeBounds { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let config = ExplorerConfig {
            max_image_px: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroImageSize));

        let config = ExplorerConfig {
            gene_page_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPageSize));
    }
}
