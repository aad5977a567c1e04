use super::*;
use crate::model::{set_shared, AttrChange, Attributes, NotifyPolicy, SharedAttributes};
use crate::states::StateId;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

fn store(text: &str) -> (SharedAttributes, Rc<Cell<usize>>) {
    let mut attrs = Attributes::from_json(json!({ "text": text }));
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    attrs.on_change(Rc::new(move |_: &AttrChange| h.set(h.get() + 1)));
    (attrs.shared(), hits)
}

fn ctx(model: &SharedAttributes) -> ViewContext {
    ViewContext::new(StateId::default(), TYPE_NAME, Rc::downgrade(model))
}

#[test]
fn test_type_name_and_schema() {
    let view = EndStateView::new();
    assert_eq!(view.type_name(), "end");
    assert_eq!(
        view.endpoint_schema().entries(),
        &[EndpointSpec::new("entry_endpoint", Side::Left)]
    );
}

#[test]
fn test_save_writes_silently() {
    let (model, hits) = store("Hello");
    let mut edit = EndStateEditView::new(ctx(&model));

    edit.surface_mut().set_field("text", "Goodbye");
    edit.save().unwrap();

    assert_eq!(model.borrow().get_str("text"), Some("Goodbye"));
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_save_is_idempotent_and_chains() {
    let (model, hits) = store("");
    let mut edit = EndStateEditView::new(ctx(&model));
    edit.surface_mut().set_field("text", "Bye");

    let html = edit.save().unwrap().save().unwrap().render().unwrap();
    assert!(html.contains("Bye"));
    assert_eq!(model.borrow().get_str("text"), Some("Bye"));
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_edit_surface_starts_from_store() {
    let (model, _) = store("Thanks for calling");
    let edit = EndStateEditView::new(ctx(&model));
    assert_eq!(edit.surface().field("text"), Some("Thanks for calling"));
    assert_eq!(edit.mode(), Mode::Edit);
}

#[test]
fn test_unsaved_input_does_not_reach_store() {
    let (model, _) = store("before");
    let mut edit = EndStateEditView::new(ctx(&model));
    edit.surface_mut().set_field("text", "after");
    assert_eq!(model.borrow().get_str("text"), Some("before"));
}

#[test]
fn test_input_and_save_events() {
    let (model, hits) = store("");
    let mut edit = EndStateEditView::new(ctx(&model));

    assert_eq!(edit.emit("input", &json!({"field": "text", "value": "Goodbye"})), 1);
    assert_eq!(model.borrow().get_str("text"), Some(""));
    assert_eq!(edit.emit("save", &json!(null)), 1);
    assert_eq!(model.borrow().get_str("text"), Some("Goodbye"));
    assert_eq!(edit.emit("unknown", &json!(null)), 0);
    assert_eq!(hits.get(), 0);
    assert_eq!(edit.last_error(), None);
}

#[test]
fn test_save_event_failure_is_kept_on_view() {
    let model = Attributes::new().shared();
    let mut edit = EndStateEditView::new(ctx(&model));

    assert_eq!(edit.emit("save", &json!(null)), 1);
    assert!(matches!(
        edit.last_error(),
        Some(ViewError::MissingInput { .. })
    ));

    edit.emit("input", &json!({"value": "done"}));
    edit.emit("save", &json!(null));
    assert_eq!(edit.last_error(), None);
    assert_eq!(model.borrow().get_str("text"), Some("done"));
}

#[test]
fn test_save_without_input_reports_missing_field() {
    let model = Attributes::new().shared();
    let mut edit = EndStateEditView::new(ctx(&model));
    assert_eq!(edit.surface().field("text"), None);
    assert!(matches!(
        edit.save(),
        Err(ViewError::MissingInput { .. })
    ));
    assert!(!model.borrow().contains("text"));
}

#[test]
fn test_save_after_state_deleted_is_reported() {
    let (model, _) = store("x");
    let mut edit = EndStateEditView::new(ctx(&model));
    edit.surface_mut().set_field("text", "y");
    drop(model);

    assert_eq!(
        edit.save().err(),
        Some(ViewError::StateGone { type_name: "end" })
    );
    assert!(edit.render().is_err());
}

#[test]
fn test_preview_renders_escaped_text() {
    let (model, _) = store("<b>Bye</b>");
    let preview = EndStatePreviewView::new(ctx(&model));
    assert_eq!(preview.mode(), Mode::Preview);
    assert_eq!(
        preview.render().unwrap(),
        "<div class=\"end-state preview\"><p class=\"text\">&lt;b&gt;Bye&lt;/b&gt;</p></div>"
    );
}

#[test]
fn test_preview_tracks_store_changes() {
    let (model, _) = store("one");
    let preview = EndStatePreviewView::new(ctx(&model));
    set_shared(&model, "text", "two", NotifyPolicy::Notify);
    assert!(preview.render().unwrap().contains("two"));
}

#[test]
fn test_preview_rerenders_from_change_listener() {
    let (model, _) = store("one");
    let preview = Rc::new(EndStatePreviewView::new(ctx(&model)));
    let seen = Rc::new(std::cell::RefCell::new(String::new()));
    let (p, s) = (preview.clone(), seen.clone());
    model
        .borrow_mut()
        .on_change(Rc::new(move |_: &AttrChange| *s.borrow_mut() = p.render().unwrap()));

    set_shared(&model, "text", "two", NotifyPolicy::Notify);
    assert!(seen.borrow().contains("two"));
}

#[test]
fn test_templates_are_pure() {
    let data = json!({"text": "same"});
    assert_eq!(edit_template(&data), edit_template(&data));
    assert_eq!(preview_template(&json!({})), preview_template(&json!({"other": 1})));
}
