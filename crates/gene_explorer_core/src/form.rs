//! Form state: current value and dependency-driven enablement of every field.
//!
//! Locking during a running request is not stored here; the controller
//! overlays it so that unlocking restores exactly the enablement below.

use crate::config::TextSizeBounds;
use crate::model::{Cohort, Demographic, Facet, FieldId, ResponseVariable, Timepoint};

/// Single-choice field.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectField<T> {
    pub options: Vec<T>,
    pub value: Option<T>,
    pub enabled: bool,
}

impl<T> SelectField<T> {
    pub fn new(options: Vec<T>, value: Option<T>, enabled: bool) -> Self {
        Self {
            options,
            value,
            enabled,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

/// Multiple-choice field. Values keep selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelectField<T> {
    pub options: Vec<T>,
    pub values: Vec<T>,
    pub enabled: bool,
}

impl<T> MultiSelectField<T> {
    pub fn disabled() -> Self {
        Self {
            options: Vec::new(),
            values: Vec::new(),
            enabled: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckField {
    pub value: bool,
    pub enabled: bool,
}

/// Integer spinner holding the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberField {
    pub input: String,
    pub bounds: TextSizeBounds,
    pub enabled: bool,
}

impl NumberField {
    pub fn new(bounds: TextSizeBounds) -> Self {
        Self {
            input: bounds.default.to_string(),
            bounds,
            enabled: true,
        }
    }

    /// Parsed value, if the input is an integer.
    pub fn value(&self) -> Option<i64> {
        self.input.trim().parse::<i64>().ok()
    }

    pub fn is_valid(&self) -> bool {
        self.value().is_some_and(|v| self.bounds.contains(v))
    }

    pub fn reset(&mut self) {
        self.input = self.bounds.default.to_string();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub response: SelectField<ResponseVariable>,
    pub timepoint: SelectField<Timepoint>,
    pub cohorts: MultiSelectField<Cohort>,
    pub normalize: CheckField,
    pub genes: MultiSelectField<String>,
    pub text_size: NumberField,
    pub facet: Facet,
    pub shape: SelectField<Demographic>,
    pub color: SelectField<Demographic>,
    pub size: SelectField<Demographic>,
    pub alpha: SelectField<Demographic>,
}

pub const DEFAULT_COLOR: Demographic = Demographic::Age;

impl FormState {
    /// Initial state: Timepoint waits for its options, Cohorts and Genes wait
    /// for their upstream selection.
    pub fn new(text_size: TextSizeBounds) -> Self {
        Self {
            response: SelectField::new(
                ResponseVariable::ALL.to_vec(),
                Some(ResponseVariable::Hai),
                true,
            ),
            timepoint: SelectField::new(Vec::new(), None, false),
            cohorts: MultiSelectField::disabled(),
            normalize: CheckField {
                value: false,
                enabled: true,
            },
            genes: MultiSelectField::disabled(),
            text_size: NumberField::new(text_size),
            facet: Facet::default(),
            shape: SelectField::new(Demographic::SHAPE_OPTIONS.to_vec(), None, true),
            color: SelectField::new(Demographic::ALL.to_vec(), Some(DEFAULT_COLOR), true),
            size: SelectField::new(Demographic::ALL.to_vec(), None, true),
            alpha: SelectField::new(Demographic::ALL.to_vec(), None, true),
        }
    }

    pub fn is_enabled(&self, field: FieldId) -> bool {
        match field {
            FieldId::Response => self.response.enabled,
            FieldId::Timepoint => self.timepoint.enabled,
            FieldId::Cohorts => self.cohorts.enabled,
            FieldId::Normalize => self.normalize.enabled,
            FieldId::Genes => self.genes.enabled,
            FieldId::TextSize => self.text_size.enabled,
            FieldId::Facet => true,
            FieldId::Shape => self.shape.enabled,
            FieldId::Color => self.color.enabled,
            FieldId::Size => self.size.enabled,
            FieldId::Alpha => self.alpha.enabled,
        }
    }

    pub fn set_enabled(&mut self, field: FieldId, enabled: bool) {
        match field {
            FieldId::Response => self.response.enabled = enabled,
            FieldId::Timepoint => self.timepoint.enabled = enabled,
            FieldId::Cohorts => self.cohorts.enabled = enabled,
            FieldId::Normalize => self.normalize.enabled = enabled,
            FieldId::Genes => self.genes.enabled = enabled,
            FieldId::TextSize => self.text_size.enabled = enabled,
            FieldId::Facet => {}
            FieldId::Shape => self.shape.enabled = enabled,
            FieldId::Color => self.color.enabled = enabled,
            FieldId::Size => self.size.enabled = enabled,
            FieldId::Alpha => self.alpha.enabled = enabled,
        }
    }

    /// Whether the field currently holds no value.
    pub fn is_empty(&self, field: FieldId) -> bool {
        match field {
            FieldId::Response => self.response.is_empty(),
            FieldId::Timepoint => self.timepoint.is_empty(),
            FieldId::Cohorts => self.cohorts.is_empty(),
            FieldId::Normalize | FieldId::Facet => false,
            FieldId::Genes => self.genes.is_empty(),
            FieldId::TextSize => self.text_size.input.trim().is_empty(),
            FieldId::Shape => self.shape.is_empty(),
            FieldId::Color => self.color.is_empty(),
            FieldId::Size => self.size.is_empty(),
            FieldId::Alpha => self.alpha.is_empty(),
        }
    }

    /// Validity flag: required fields must be non-empty, text size must be in range.
    pub fn is_valid(&self, field: FieldId) -> bool {
        match field {
            FieldId::TextSize => self.text_size.is_valid(),
            f if f.is_required() => !self.is_empty(f),
            _ => true,
        }
    }

    /// Clear the field's value. Fields without an empty state are untouched.
    pub fn clear(&mut self, field: FieldId) {
        match field {
            FieldId::Response => self.response.clear(),
            FieldId::Timepoint => self.timepoint.clear(),
            FieldId::Cohorts => self.cohorts.clear(),
            FieldId::Genes => self.genes.clear(),
            FieldId::Shape => self.shape.clear(),
            FieldId::Color => self.color.clear(),
            FieldId::Size => self.size.clear(),
            FieldId::Alpha => self.alpha.clear(),
            FieldId::Normalize | FieldId::TextSize | FieldId::Facet => {}
        }
    }

    /// Human-readable value, used by front-ends.
    pub fn display_value(&self, field: FieldId) -> String {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        match field {
            FieldId::Response => opt(&self.response.value),
            FieldId::Timepoint => opt(&self.timepoint.value),
            FieldId::Cohorts => self
                .cohorts
                .values
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            FieldId::Normalize => String::from(if self.normalize.value { "yes" } else { "no" }),
            FieldId::Genes => self.genes.values.join(", "),
            FieldId::TextSize => self.text_size.input.clone(),
            FieldId::Facet => self.facet.to_string(),
            FieldId::Shape => opt(&self.shape.value),
            FieldId::Color => opt(&self.color.value),
            FieldId::Size => opt(&self.size.value),
            FieldId::Alpha => opt(&self.alpha.value),
        }
    }

    pub fn aesthetic_mut(&mut self, field: FieldId) -> Option<&mut SelectField<Demographic>> {
        match field {
            FieldId::Shape => Some(&mut self.shape),
            FieldId::Color => Some(&mut self.color),
            FieldId::Size => Some(&mut self.size),
            FieldId::Alpha => Some(&mut self.alpha),
            _ => None,
        }
    }

    pub fn aesthetic(&self, field: FieldId) -> Option<&SelectField<Demographic>> {
        match field {
            FieldId::Shape => Some(&self.shape),
            FieldId::Color => Some(&self.color),
            FieldId::Size => Some(&self.size),
            FieldId::Alpha => Some(&self.alpha),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let form = FormState::new(TextSizeBounds::default());
        assert_eq!(form.response.value, Some(ResponseVariable::Hai));
        assert!(!form.is_enabled(FieldId::Timepoint));
        assert!(!form.is_enabled(FieldId::Cohorts));
        assert!(!form.is_enabled(FieldId::Genes));
        assert_eq!(form.text_size.value(), Some(18));
        assert_eq!(form.color.value, Some(Demographic::Age));
        assert_eq!(form.facet, Facet::Grid);
    }

    #[test]
    fn test_text_size_validity() {
        let mut form = FormState::new(TextSizeBounds::default());
        for (input, valid) in [("18", true), ("0", false), ("31", false), ("12.5", false), ("", false)] {
            form.text_size.input = input.to_string();
            assert_eq!(form.is_valid(FieldId::TextSize), valid, "input {input:?}");
        }
    }

    #[test]
    fn test_optional_fields_always_valid() {
        let form = FormState::new(TextSizeBounds::default());
        assert!(form.is_empty(FieldId::Shape));
        assert!(form.is_valid(FieldId::Shape));
        assert!(!form.is_valid(FieldId::Genes));
    }
}
