use super::*;
use crate::model::{AttrChange, NotifyPolicy};
use crate::states::{EndStateView, Side};
use serde_json::json;
use std::cell::Cell;

fn end_kind() -> Rc<dyn StateView> {
    Rc::new(EndStateView::new())
}

fn end_state(model: &SharedAttributes, mode: Mode) -> DialogueState {
    DialogueState::new(StateId::default(), end_kind(), model, mode)
}

#[test]
fn test_starts_in_requested_mode() {
    let model = Attributes::new().shared();
    assert_eq!(end_state(&model, Mode::Edit).mode(), Mode::Edit);
    assert_eq!(end_state(&model, Mode::Preview).mode(), Mode::Preview);
    assert_eq!(end_state(&model, Mode::Preview).type_name(), "end");
}

#[test]
fn test_mode_switch_round_trip() {
    let model = Attributes::from_json(json!({"text": "hi"})).shared();
    let mut state = end_state(&model, Mode::Preview);

    assert!(state.set_mode(Mode::Edit));
    assert_eq!(state.mode(), Mode::Edit);
    assert!(!state.set_mode(Mode::Edit));
    assert_eq!(state.toggle_mode(), Mode::Preview);
    assert_eq!(state.mode(), Mode::Preview);
    assert!(state.render().unwrap().contains("hi"));
}

#[test]
fn test_switch_does_not_commit() {
    let model = Attributes::from_json(json!({"text": "kept"})).shared();
    let mut state = end_state(&model, Mode::Edit);

    state
        .edit_view_mut()
        .unwrap()
        .surface_mut()
        .set_field("text", "discarded");
    state.set_mode(Mode::Preview);
    assert_eq!(model.borrow().get_str("text"), Some("kept"));

    state.set_mode(Mode::Edit);
    assert_eq!(
        state.edit_view_mut().unwrap().surface().field("text"),
        Some("kept")
    );
}

#[test]
fn test_save_then_switch_keeps_data() {
    let mut attrs = Attributes::new();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    attrs.on_change(Rc::new(move |_: &AttrChange| h.set(h.get() + 1)));
    let model = attrs.shared();
    let mut state = end_state(&model, Mode::Edit);

    state.emit("input", &json!({"field": "text", "value": "Goodbye"}));
    state.save().unwrap();
    state.set_mode(Mode::Preview);

    assert_eq!(model.borrow().get_str("text"), Some("Goodbye"));
    assert!(state.render().unwrap().contains("Goodbye"));
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_save_in_preview_is_rejected() {
    let model = Attributes::new().shared();
    let mut state = end_state(&model, Mode::Preview);
    assert_eq!(state.save(), Err(ViewError::NotEditing));
    assert!(state.edit_view_mut().is_none());
}

#[test]
fn test_endpoints_follow_schema() {
    let model = Attributes::from_json(json!({"entry_endpoint": {"uuid": "e1"}})).shared();
    let state = end_state(&model, Mode::Preview);

    let endpoints = state.endpoints();
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].attr, "entry_endpoint");
    assert_eq!(endpoints[0].side, Side::Left);
    assert_eq!(endpoints[0].value, Some(json!({"uuid": "e1"})));

    model
        .borrow_mut()
        .unset("entry_endpoint", NotifyPolicy::Silent);
    assert_eq!(state.endpoints()[0].value, None);
}

#[test]
fn test_state_outliving_store() {
    let model = Attributes::from_json(json!({"text": "x"})).shared();
    let mut state = end_state(&model, Mode::Edit);
    drop(model);

    assert!(!state.is_live());
    assert!(matches!(state.save(), Err(ViewError::StateGone { .. })));
    assert!(state.render().is_err());
    assert_eq!(state.endpoints().len(), 1);
    assert!(state.set_mode(Mode::Preview));
}
