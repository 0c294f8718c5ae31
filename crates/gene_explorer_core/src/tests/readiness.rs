//! Tests for the submit gate
//!
//! These tests verify:
//! - Submit is enabled exactly when every required field is valid
//! - Text size must parse as an integer within the configured bounds
//! - A refused submit reports which fields are unmet and has no effects

use super::support::Harness;
use crate::error::SubmitError;
use crate::model::{FieldId, ResponseVariable};

#[test]
fn test_ready_when_all_required_filled() {
    let mut h = Harness::new();
    assert!(!h.controller.can_submit());

    h.fill_required();
    assert!(h.controller.is_ready_to_submit());
    assert!(h.controller.can_submit());
    assert!(h.controller.unmet_requirements().is_empty());
}

#[test]
fn test_unmet_requirements_in_display_order() {
    let mut h = Harness::new();
    assert_eq!(
        h.controller.unmet_requirements(),
        vec![FieldId::Timepoint, FieldId::Cohorts, FieldId::Genes]
    );

    h.controller.select_response(None).unwrap();
    h.controller.set_text_size("99").unwrap();
    assert_eq!(
        h.controller.unmet_requirements(),
        vec![
            FieldId::Response,
            FieldId::Timepoint,
            FieldId::Cohorts,
            FieldId::Genes,
            FieldId::TextSize
        ]
    );
}

#[test]
fn test_each_missing_field_blocks_submit() {
    let mut h = Harness::new();
    h.fill_required();

    h.controller.select_response(None).unwrap();
    assert!(!h.controller.can_submit());
    h.controller.select_response(Some(ResponseVariable::Hai)).unwrap();
    assert!(h.controller.can_submit());

    h.controller.set_genes(Vec::new()).unwrap();
    assert_eq!(h.controller.unmet_requirements(), vec![FieldId::Genes]);
    h.controller.add_gene("STAT1").unwrap();

    h.controller.select_cohorts::<&str>(&[]).unwrap();
    assert_eq!(
        h.controller.unmet_requirements(),
        vec![FieldId::Cohorts, FieldId::Genes]
    );
}

#[test]
fn test_text_size_bounds_gate_submit() {
    let mut h = Harness::new();
    h.fill_required();

    for (input, ready) in [
        ("0", false),
        ("1", true),
        ("18", true),
        ("30", true),
        ("31", false),
        ("-4", false),
        ("abc", false),
        ("", false),
    ] {
        h.controller.set_text_size(input).unwrap();
        assert_eq!(h.controller.can_submit(), ready, "text size {input:?}");
    }
}

#[test]
fn test_refused_submit_has_no_effects() {
    let mut h = Harness::new();
    h.fill_required();
    h.controller.set_text_size("0").unwrap();

    assert_eq!(
        h.controller.submit(),
        Err(SubmitError::NotReady {
            unmet: vec![FieldId::TextSize]
        })
    );
    assert!(!h.controller.is_running());
    assert_eq!(h.host.executed_count(), 0);
}

#[test]
fn test_optional_fields_do_not_gate_submit() {
    let mut h = Harness::new();
    h.fill_required();
    for field in [FieldId::Shape, FieldId::Color, FieldId::Size, FieldId::Alpha] {
        h.controller.set_aesthetic(field, None).unwrap();
    }
    assert!(h.controller.can_submit());
}
