//! Tests for resetting the form

use super::support::Harness;
use crate::dependency::invariant_holds;
use crate::model::{Demographic, Facet, FieldId, ResponseVariable};

fn customize(h: &mut Harness) {
    h.controller.set_normalize(true).unwrap();
    h.controller.set_text_size("24").unwrap();
    h.controller.set_facet(Facet::Wrap);
    h.controller
        .set_aesthetic(FieldId::Shape, Some(Demographic::Race))
        .unwrap();
    h.controller
        .set_aesthetic(FieldId::Color, Some(Demographic::Gender))
        .unwrap();
    h.controller
        .set_aesthetic(FieldId::Size, Some(Demographic::Age))
        .unwrap();
}

#[test]
fn test_reset_when_idle() {
    let mut h = Harness::new();
    h.fill_required();
    customize(&mut h);

    h.controller.reset();

    let form = h.controller.form();
    assert!(form.timepoint.value.is_none());
    assert!(form.cohorts.values.is_empty());
    assert!(form.genes.values.is_empty());
    assert!(!form.cohorts.enabled);
    assert!(!form.genes.enabled);
    assert!(!form.normalize.value);
    assert_eq!(form.shape.value, None);
    assert_eq!(form.color.value, Some(Demographic::Age));
    assert_eq!(form.size.value, None);
    assert_eq!(form.alpha.value, None);
    assert!(invariant_holds(form));
    assert!(!h.controller.can_submit());

    // Not part of the reset
    assert_eq!(form.response.value, Some(ResponseVariable::Hai));
    assert_eq!(form.text_size.input, "24");
    assert_eq!(form.facet, Facet::Wrap);
    assert!(h.controller.is_interactive(FieldId::Timepoint));
}

#[test]
fn test_reset_while_running_keeps_locked_fields() {
    let mut h = Harness::new();
    h.fill_required();
    customize(&mut h);
    let effects = h.controller.submit().unwrap();

    h.controller.reset();

    let form = h.controller.form();
    assert_eq!(form.timepoint.value.as_ref().map(|t| t.label()), Some("7 Days".to_string()));
    assert_eq!(form.cohorts.values.len(), 2);
    assert_eq!(form.genes.values, vec!["MX1".to_string()]);
    assert!(!form.normalize.value);
    assert_eq!(form.shape.value, None);
    assert_eq!(form.color.value, Some(Demographic::Age));

    h.run(effects);
    assert!(h.controller.can_submit());
    assert!(h.controller.display().image().is_some());
}

#[test]
fn test_reset_then_reselect() {
    let mut h = Harness::new();
    h.fill_required();
    h.controller.reset();

    h.select_timepoint("1 Day");
    assert!(h.controller.is_interactive(FieldId::Cohorts));
    assert!(!h.controller.is_interactive(FieldId::Genes));
}
