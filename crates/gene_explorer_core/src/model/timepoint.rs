use std::fmt;

use serde::{Deserialize, Serialize};

/// A study time offset at which gene expression was measured.
///
/// Values at or below zero are baseline measurements; normalizing to baseline
/// is meaningless for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timepoint {
    #[serde(rename = "timepoint")]
    pub value: f64,
    #[serde(rename = "timepointUnit")]
    pub unit: String,
}

impl Timepoint {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Display label, e.g. `"1 Day"` or `"7 Days"`.
    ///
    /// Units are stored in plural form; the last character is dropped when
    /// the value is exactly one.
    pub fn label(&self) -> String {
        let unit = if self.value == 1.0 {
            let mut singular = self.unit.clone();
            singular.pop();
            singular
        } else {
            self.unit.clone()
        };
        format!("{} {}", self.value, unit)
    }

    pub fn is_baseline(&self) -> bool {
        self.value.is_nan() || self.value <= 0.0
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
