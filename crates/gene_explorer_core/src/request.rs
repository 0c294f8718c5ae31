use serde_json::{Value, json};

use crate::model::{Demographic, Facet, ResponseVariable, Timepoint};

/// Pixel dimensions of a plot image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Square image as wide as the container, capped at `max_px`.
    pub fn square_within(container_width: u32, max_px: u32) -> Self {
        let edge = container_width.min(max_px);
        Self {
            width: edge,
            height: edge,
        }
    }

    /// Scale to `width`, keeping the aspect ratio.
    pub fn scaled_to_width(&self, width: u32) -> Self {
        if self.width == 0 {
            return Self {
                width,
                height: width,
            };
        }
        let height = (u64::from(width) * u64::from(self.height) + u64::from(self.width) / 2)
            / u64::from(self.width);
        Self {
            width,
            height: u32::try_from(height).unwrap_or(u32::MAX),
        }
    }
}

/// Snapshot of the form taken when the user asks for a plot.
///
/// Built fresh on every submit and never modified afterwards; a session
/// retry re-sends the identical request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub response: ResponseVariable,
    pub cohorts: Vec<String>,
    pub timepoint: Timepoint,
    pub normalize: bool,
    pub genes: Vec<String>,
    pub text_size: i64,
    pub facet: Facet,
    pub shape: Option<Demographic>,
    pub color: Option<Demographic>,
    pub size: Option<Demographic>,
    pub alpha: Option<Demographic>,
    pub image: ImageSize,
}

impl PlotRequest {
    /// Input parameters in the shape the plotting report expects.
    ///
    /// Cohort and gene lists travel as JSON-encoded strings; unset aesthetics
    /// are sent as empty strings.
    pub fn input_params(&self) -> Value {
        json!({
            "response": self.response.as_str(),
            "cohorts": encode_list(&self.cohorts),
            "timePoint": number(self.timepoint.value),
            "timePointUnit": self.timepoint.unit,
            "normalize": self.normalize,
            "genes": encode_list(&self.genes),
            "textSize": self.text_size,
            "facet": self.facet.as_str(),
            "shape": aesthetic(self.shape),
            "color": aesthetic(self.color),
            "size": aesthetic(self.size),
            "alpha": aesthetic(self.alpha),
            "imageWidth": self.image.width,
            "imageHeight": self.image.height,
        })
    }
}

fn encode_list(items: &[String]) -> String {
    Value::from(items.to_vec()).to_string()
}

fn aesthetic(value: Option<Demographic>) -> &'static str {
    value.map(Demographic::as_str).unwrap_or("")
}

/// Whole timepoints are sent as integers (`7`, not `7.0`).
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
