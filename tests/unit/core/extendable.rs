use super::*;
use serde_json::json;
use std::cell::RefCell;

fn chain() -> (Extendable, Extendable, Extendable) {
    let a = Extendable::root().extend([TypeSpec::named("A")
        .value("greeting", "from a")
        .value("only_a", 1)
        .value("shared", "a")]);
    let b = a.extend([TypeSpec::named("B").value("shared", "b").value("only_b", 2)]);
    let c = b.extend([TypeSpec::named("C").value("greeting", "from c")]);
    (a, b, c)
}

#[test]
fn test_member_resolution_prefers_nearest_level() {
    let (_, _, c) = chain();
    let inst = c.construct().unwrap();

    assert_eq!(inst.get("greeting"), Some(json!("from c")));
    assert_eq!(inst.get("shared"), Some(json!("b")));
    assert_eq!(inst.get("only_a"), Some(json!(1)));
    assert_eq!(inst.get("only_b"), Some(json!(2)));
    assert_eq!(inst.get("missing"), None);
}

#[test]
fn test_parent_is_immediate_predecessor() {
    let (a, b, c) = chain();
    assert!(c.parent().unwrap().same_type(&b));
    assert!(b.parent().unwrap().same_type(&a));
    assert_eq!(c.depth(), 3);
    assert!(c.is_subtype_of(&a));
    assert!(!a.is_subtype_of(&c));
}

#[test]
fn test_parent_member_does_not_override_chain() {
    let (_, b, _) = chain();
    let t = b.extend([TypeSpec::named("Shadow").value("parent", "elsewhere")]);
    assert!(t.parent().unwrap().same_type(&b));

    let inst = t.construct().unwrap();
    assert_eq!(inst.get("parent"), Some(json!("elsewhere")));
}

#[test]
fn test_extend_with_no_specs_clones_parent_behaviour() {
    let (_, b, _) = chain();
    let clone = b.extend(std::iter::empty());

    assert_eq!(clone.name(), "B");
    assert!(clone.parent().unwrap().same_type(&b));
    assert!(clone.own_member("shared").is_none());

    let from_clone = clone.construct().unwrap();
    let from_b = b.construct().unwrap();
    for key in ["greeting", "shared", "only_a", "only_b"] {
        assert_eq!(from_clone.get(key), from_b.get(key));
    }
}

#[test]
fn test_later_specs_override_earlier_ones() {
    let t = Extendable::root().extend([
        TypeSpec::named("First").value("x", 1).value("y", 1),
        TypeSpec::new().value("x", 2),
    ]);
    let inst = t.construct().unwrap();
    assert_eq!(t.name(), "First");
    assert_eq!(inst.get("x"), Some(json!(2)));
    assert_eq!(inst.get("y"), Some(json!(1)));
}

#[test]
fn test_extend_does_not_touch_parent() {
    let (a, _, _) = chain();
    let _child = a.extend([TypeSpec::new().value("greeting", "changed")]);
    let inst = a.construct().unwrap();
    assert_eq!(inst.get("greeting"), Some(json!("from a")));
}

#[test]
fn test_constructors_run_root_first() {
    let log = std::rc::Rc::new(RefCell::new(Vec::new()));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());

    let a = Extendable::root().extend([TypeSpec::named("A").constructor(move |_| {
        l1.borrow_mut().push("a");
        Ok(())
    })]);
    let b = a.extend([TypeSpec::named("B")]);
    let c = b.extend([TypeSpec::named("C").constructor(move |inst| {
        l2.borrow_mut().push("c");
        inst.set("ready", true);
        Ok(())
    })]);
    let d = c.extend([TypeSpec::named("D").constructor(move |_| {
        l3.borrow_mut().push("d");
        Ok(())
    })]);

    let inst = d.construct().unwrap();
    assert_eq!(*log.borrow(), vec!["a", "c", "d"]);
    assert_eq!(inst.get("ready"), Some(json!(true)));
}

#[test]
fn test_constructor_error_aborts_construction() {
    let t = Extendable::root().extend([TypeSpec::named("Broken").constructor(|_| {
        Err(ConstructError::Failed {
            type_name: "Broken".into(),
            reason: "nope".to_string(),
        })
    })]);
    let err = t.construct().unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn test_instance_fields_shadow_type_values() {
    let (a, _, _) = chain();
    let mut inst = a.construct().unwrap();
    inst.set("greeting", "own");
    assert_eq!(inst.get("greeting"), Some(json!("own")));
    assert_eq!(a.construct().unwrap().get("greeting"), Some(json!("from a")));
}

#[test]
fn test_call_methods_and_parent_methods() {
    let base = Extendable::root().extend([TypeSpec::named("Base").method("describe", |_, _| {
        json!("base")
    })]);
    let derived = base.extend([TypeSpec::named("Derived").method("describe", |_, _| {
        json!("derived")
    })]);

    let mut inst = derived.construct().unwrap();
    assert_eq!(inst.call("describe", &json!(null)).unwrap(), json!("derived"));
    assert_eq!(
        inst.call_parent(&derived, "describe", &json!(null)).unwrap(),
        json!("base")
    );
    assert!(inst.has_method("describe"));
}

#[test]
fn test_call_errors() {
    let t = Extendable::root().extend([TypeSpec::named("T").value("x", 1)]);
    let mut inst = t.construct().unwrap();
    assert_eq!(
        inst.call("x", &json!(null)),
        Err(CallError::NotCallable("x".into()))
    );
    assert_eq!(
        inst.call("nope", &json!(null)),
        Err(CallError::NotFound("nope".into()))
    );
    assert_eq!(
        inst.call_parent(&t, "x", &json!(null)),
        Err(CallError::NotFound("x".into()))
    );
}

#[test]
fn test_methods_receive_the_instance() {
    let t = Extendable::root().extend([TypeSpec::named("Counter")
        .value("count", 0)
        .method("bump", |inst, by| {
            let next = inst.get("count").and_then(|v| v.as_i64()).unwrap_or(0)
                + by.as_i64().unwrap_or(1);
            inst.set("count", next);
            json!(next)
        })]);
    let mut inst = t.construct().unwrap();
    inst.call("bump", &json!(2)).unwrap();
    inst.call("bump", &json!(3)).unwrap();
    assert_eq!(inst.get("count"), Some(json!(5)));
}
