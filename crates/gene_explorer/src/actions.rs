// Actions - translate focus activation and confirmed modal values into
// controller operations.

use gene_explorer_core::{Demographic, FieldId, ResponseVariable};

use crate::modals::ConfirmedValue;
use crate::state::{
    AppState, Focus, GeneSearchModal, ModalState, MultiPickerModal, PickerModal, TextInputModal,
    ViewerModal,
};

/// Enter on the focused element.
pub fn activate(state: &mut AppState) {
    match state.focus {
        Focus::Field(field) => activate_field(state, field),
        Focus::PlotButton => submit(state),
        Focus::ResetButton => reset(state),
        Focus::Image => open_viewer(state),
    }
}

fn activate_field(state: &mut AppState, field: FieldId) {
    if !state.controller.is_interactive(field) {
        state.set_error(format!("{field} is not available"));
        return;
    }
    let form = state.controller.form();
    let modal = match field {
        FieldId::Response => {
            let options = ResponseVariable::ALL.iter().map(|r| r.to_string()).collect();
            let current = form.response.value.map(|r| r.to_string());
            ModalState::Picker(PickerModal::new(field, options, false, current.as_deref()))
        }
        FieldId::Timepoint => {
            let options = form.timepoint.options.iter().map(|t| t.label()).collect();
            let current = form.timepoint.value.as_ref().map(|t| t.label());
            ModalState::Picker(PickerModal::new(field, options, false, current.as_deref()))
        }
        FieldId::Cohorts => {
            let options = form.cohorts.options.iter().map(|c| c.name.clone()).collect();
            let current: Vec<String> = form.cohorts.values.iter().map(|c| c.name.clone()).collect();
            ModalState::MultiPicker(MultiPickerModal::new(field, options, &current))
        }
        FieldId::Genes => {
            let result = state.controller.search_genes("");
            if let Some(effects) = state.accept(result) {
                state.queue(effects);
            }
            ModalState::GeneSearch(GeneSearchModal::default())
        }
        FieldId::TextSize => {
            ModalState::TextInput(TextInputModal::new(field, &form.text_size.input))
        }
        FieldId::Normalize | FieldId::Facet => {
            toggle(state, field);
            return;
        }
        FieldId::Shape | FieldId::Color | FieldId::Size | FieldId::Alpha => {
            let Some(select) = form.aesthetic(field) else {
                return;
            };
            let options = select.options.iter().map(|d| d.to_string()).collect();
            let current = select.value.map(|d| d.to_string());
            ModalState::Picker(PickerModal::new(field, options, true, current.as_deref()))
        }
    };
    state.modal = modal;
}

/// Space on a checkbox-like field.
pub fn toggle(state: &mut AppState, field: FieldId) {
    match field {
        FieldId::Normalize => {
            let value = !state.controller.form().normalize.value;
            let result = state.controller.set_normalize(value);
            state.accept(result);
        }
        FieldId::Facet => {
            let facet = state.controller.form().facet.toggled();
            state.controller.set_facet(facet);
        }
        _ => {}
    }
}

pub fn submit(state: &mut AppState) {
    match state.controller.submit() {
        Ok(effects) => {
            state.clear_error();
            state.queue(effects);
        }
        Err(e) => state.set_error(format!("Cannot plot: {e}")),
    }
}

pub fn reset(state: &mut AppState) {
    state.controller.reset();
    state.clear_error();
}

fn open_viewer(state: &mut AppState) {
    match state.controller.display().image() {
        Some(image) => {
            state.modal = ModalState::Viewer(ViewerModal {
                url: image.full_size_url().to_string(),
                size: image.size,
                source_url: state.source_url.clone(),
            });
        }
        None => state.set_error("No plot yet"),
    }
}

/// Apply a confirmed modal value to its field.
pub fn apply_confirmed(state: &mut AppState, field: FieldId, value: ConfirmedValue) {
    match (field, value) {
        (FieldId::Response, ConfirmedValue::Choice(choice)) => {
            let response = choice.as_deref().and_then(ResponseVariable::parse);
            let result = state.controller.select_response(response);
            state.accept(result);
        }
        (FieldId::Timepoint, ConfirmedValue::Choice(choice)) => {
            let result = state.controller.select_timepoint(choice.as_deref());
            if let Some(effects) = state.accept(result) {
                state.queue(effects);
            }
        }
        (FieldId::Cohorts, ConfirmedValue::Choices(names)) => {
            let result = state.controller.select_cohorts(&names);
            state.accept(result);
        }
        (FieldId::TextSize, ConfirmedValue::Text(text)) => {
            let result = state.controller.set_text_size(&text);
            state.accept(result);
            if !state.controller.form().text_size.is_valid() {
                let bounds = state.controller.config().text_size;
                state.set_error(format!(
                    "Text size must be between {} and {}",
                    bounds.min, bounds.max
                ));
            }
        }
        (
            field @ (FieldId::Shape | FieldId::Color | FieldId::Size | FieldId::Alpha),
            ConfirmedValue::Choice(choice),
        ) => {
            let demographic = choice.as_deref().and_then(Demographic::parse);
            let result = state.controller.set_aesthetic(field, demographic);
            state.accept(result);
        }
        (field, value) => {
            tracing::warn!(%field, ?value, "Unexpected modal value");
        }
    }
}

#[cfg(test)]
mod tests {
    use gene_explorer_core::{
        Cohort, Completion, Effect, ExplorerConfig, ExplorerController, Request, Timepoint,
    };

    use super::*;

    fn loaded_state() -> AppState {
        let mut controller = ExplorerController::new(ExplorerConfig::default());
        controller.initialize();
        controller.handle(Completion::TimepointsLoaded(Ok(vec![
            Timepoint::new(0.0, "Days"),
            Timepoint::new(7.0, "Days"),
        ])));
        AppState::new(controller, 8, Some("https://labkey.test/source".to_string()))
    }

    fn choose_timepoint(state: &mut AppState, label: &str) -> u64 {
        apply_confirmed(
            state,
            FieldId::Timepoint,
            ConfirmedValue::Choice(Some(label.to_string())),
        );
        let effects = state.take_pending();
        match effects.as_slice() {
            [Effect::Request(Request::LoadCohorts { generation, .. })] => *generation,
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn test_timepoint_choice_queues_cohort_load() {
        let mut state = loaded_state();
        choose_timepoint(&mut state, "7 Days");
        assert_eq!(
            state.controller.form().timepoint.value,
            Some(Timepoint::new(7.0, "Days"))
        );
    }

    #[test]
    fn test_cohort_picker_lists_loaded_cohorts() {
        let mut state = loaded_state();
        let generation = choose_timepoint(&mut state, "7 Days");
        state.controller.handle(Completion::CohortsLoaded {
            generation,
            result: Ok(vec![Cohort::new("Young", 1), Cohort::new("Old", 2)]),
        });

        state.focus = Focus::Field(FieldId::Cohorts);
        activate(&mut state);
        match &state.modal {
            ModalState::MultiPicker(picker) => {
                assert_eq!(picker.options, vec!["Young".to_string(), "Old".to_string()]);
            }
            other => panic!("unexpected modal {other:?}"),
        }
    }

    #[test]
    fn test_disabled_field_sets_error() {
        let mut state = loaded_state();
        state.focus = Focus::Field(FieldId::Genes);
        activate(&mut state);
        assert!(matches!(state.modal, ModalState::None));
        assert!(state.error_message.is_some());
    }

    #[test]
    fn test_space_toggles_facet_and_normalize() {
        let mut state = loaded_state();
        toggle(&mut state, FieldId::Facet);
        assert_eq!(state.controller.form().facet.to_string(), "Wrap");

        toggle(&mut state, FieldId::Normalize);
        assert!(state.controller.form().normalize.value);
    }

    #[test]
    fn test_out_of_range_text_size_reported() {
        let mut state = loaded_state();
        apply_confirmed(&mut state, FieldId::TextSize, ConfirmedValue::Text("0".to_string()));
        assert!(!state.controller.form().text_size.is_valid());
        assert!(state.error_message.as_deref().unwrap().contains("between"));
    }

    #[test]
    fn test_aesthetic_cleared_by_none_choice() {
        let mut state = loaded_state();
        apply_confirmed(&mut state, FieldId::Color, ConfirmedValue::Choice(None));
        assert_eq!(state.controller.form().color.value, None);
    }

    #[test]
    fn test_submit_not_ready_sets_error() {
        let mut state = loaded_state();
        submit(&mut state);
        assert!(state.pending.is_empty());
        assert!(state.error_message.as_deref().unwrap().starts_with("Cannot plot"));
    }

    #[test]
    fn test_viewer_requires_image() {
        let mut state = loaded_state();
        state.focus = Focus::Image;
        activate(&mut state);
        assert!(matches!(state.modal, ModalState::None));
        assert_eq!(state.error_message.as_deref(), Some("No plot yet"));
    }
}
