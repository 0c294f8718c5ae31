//! Field dependency graph.
//!
//! Dependencies are a small static table: a dependent field is only usable
//! while its upstream field has a valid selection. Clearing an upstream field
//! clears and disables everything downstream of it.

use crate::form::FormState;
use crate::model::FieldId;

/// `field → fields that depend on it`
pub const DEPENDENTS: &[(FieldId, &[FieldId])] = &[
    (FieldId::Timepoint, &[FieldId::Cohorts]),
    (FieldId::Cohorts, &[FieldId::Genes]),
];

/// Direct dependents of `field`.
pub fn dependents(field: FieldId) -> &'static [FieldId] {
    DEPENDENTS
        .iter()
        .find(|(upstream, _)| *upstream == field)
        .map(|(_, deps)| *deps)
        .unwrap_or(&[])
}

/// The field `field` depends on, if any.
pub fn upstream(field: FieldId) -> Option<FieldId> {
    DEPENDENTS
        .iter()
        .find(|(_, deps)| deps.contains(&field))
        .map(|(upstream, _)| *upstream)
}

/// All fields transitively downstream of `field`, nearest first.
pub fn downstream(field: FieldId) -> Vec<FieldId> {
    let mut out = Vec::new();
    let mut frontier = vec![field];
    while let Some(current) = frontier.pop() {
        for &dep in dependents(current) {
            if !out.contains(&dep) {
                out.push(dep);
                frontier.push(dep);
            }
        }
    }
    out
}

/// Clear and disable every field downstream of `field`.
pub fn cascade_clear(form: &mut FormState, field: FieldId) {
    for dep in downstream(field) {
        form.clear(dep);
        form.set_enabled(dep, false);
    }
}

/// Required fields that are empty or out of range, in display order.
pub fn unmet_requirements(form: &FormState) -> Vec<FieldId> {
    FieldId::REQUIRED
        .into_iter()
        .filter(|&field| !form.is_valid(field))
        .collect()
}

/// Whether every required field holds a valid value.
pub fn is_ready(form: &FormState) -> bool {
    unmet_requirements(form).is_empty()
}

/// The dependency invariant: a dependent field is cleared and disabled while
/// its upstream field has no valid selection.
pub fn invariant_holds(form: &FormState) -> bool {
    DEPENDENTS.iter().all(|(upstream, deps)| {
        form.is_valid(*upstream)
            || deps
                .iter()
                .all(|&dep| form.is_empty(dep) && !form.is_enabled(dep))
    })
}
