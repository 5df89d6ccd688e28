use std::cell::{Cell, RefCell};
use std::rc::Rc;

use strata_core::*;
use strata_ui::{BindProps, DisplayProps, Text, controls, make_bindable};

fn form() -> Store {
    Store::new(
        "form",
        record! {
            "name" => "",
            "agree" => false,
            "volume" => 0.25,
            "meta" => record! { "tags" => seq!["a", "b"] },
        },
    )
}

fn field(store: &Store, key: &str) -> Node {
    store.state().get(key).unwrap().clone()
}

/// Display component that hands its props out for inspection.
fn probe(seen: Rc<RefCell<Option<DisplayProps>>>) -> impl Fn(DisplayProps) -> View {
    move |props| {
        *seen.borrow_mut() = Some(props);
        Text("probe")
    }
}

#[test]
fn native_event_payload_sets_target_value() {
    let store = form();
    let input = make_bindable(|_| Text(""), None);
    let props = BindProps::new(field(&store, "name"));

    input
        .handle_change(&props, record! { "target" => record! { "value" => "hello" } })
        .unwrap();
    assert_eq!(field(&store, "name").as_text(), Some("hello"));

    input.handle_change(&props, Node::from("world")).unwrap();
    assert_eq!(field(&store, "name").as_text(), Some("world"));
}

#[test]
fn change_labels_syncs_then_calls_after_change() {
    let store = form();
    let order = Rc::new(RefCell::new(Vec::new()));
    {
        let order = order.clone();
        store.subscribe(move |root, action| {
            order.borrow_mut().push(format!(
                "sync {} {}",
                action.label,
                root.get("name").and_then(Node::as_text).unwrap_or("")
            ));
        });
    }
    let after = order.clone();
    let props = BindProps::new(field(&store, "name"))
        .after_change(move |v| after.borrow_mut().push(format!("after {}", v.as_text().unwrap_or(""))));

    let view = make_bindable(controls::text_input, None).render(props).unwrap();
    assert!(view.dispatch(&ControlEvent::Text("Ada".into())));

    assert_eq!(*order.borrow(), vec!["sync [binding] Ada".to_string(), "after Ada".to_string()]);
    let action = store.last_action();
    assert_eq!(action.kind, ActionKind::Binding);
    assert_eq!(action.path, path!("name"));
}

#[test]
fn render_shows_a_detached_copy_under_the_designated_prop() {
    let store = form();
    let seen = Rc::new(RefCell::new(None));
    let bindable = make_bindable(probe(seen.clone()), None);
    bindable
        .render(BindProps::new(field(&store, "meta")).value_prop("data").prop("hint", "tags"))
        .unwrap();

    let props = seen.borrow_mut().take().unwrap();
    assert_eq!(props.value_prop, "data");
    assert_eq!(props.value(), field(&store, "meta"));
    assert!(!props.value().ptr_eq(&field(&store, "meta")));
    assert_eq!(props.text_prop("hint"), "tags");
    assert_eq!(set(&props.value(), 1, None), Err(StateError::Binding));

    let json = serde_json::to_value(props.value()).unwrap();
    assert_eq!(json, serde_json::json!({ "tags": ["a", "b"] }));
}

#[test]
fn checkbox_binds_through_checked_events() {
    let store = form();
    let agree = make_bindable(controls::checkbox, Some("checked"));
    let view = agree
        .render(BindProps::new(field(&store, "agree")).prop("label", "I agree"))
        .unwrap();
    match &view.kind {
        ViewKind::Checkbox { checked, label, .. } => {
            assert!(!checked);
            assert_eq!(label, "I agree");
        }
        other => panic!("unexpected view {other:?}"),
    }

    view.dispatch(&ControlEvent::Toggle(true));
    assert_eq!(field(&store, "agree").as_bool(), Some(true));
}

#[test]
fn slider_and_switch_controls() {
    let store = Store::new("s", record! { "level" => 2.0, "on" => false });
    let level = make_bindable(controls::slider, None)
        .render(BindProps::new(field(&store, "level")).prop("min", 0).prop("max", 10))
        .unwrap();
    level.dispatch(&ControlEvent::Slide(7.5));
    assert_eq!(field(&store, "level").as_f64(), Some(7.5));

    let on = make_bindable(controls::switch, Some("checked"))
        .render(BindProps::new(field(&store, "on")))
        .unwrap();
    on.dispatch(&ControlEvent::Toggle(true));
    assert_eq!(field(&store, "on").as_bool(), Some(true));
}

#[test]
fn rerender_after_sync_shows_the_new_value() {
    let store = form();
    let input = make_bindable(controls::text_input, None);
    let frames = Rc::new(RefCell::new(Vec::new()));
    {
        let input = input.clone();
        let frames = frames.clone();
        store.subscribe(move |root, _| {
            let name = root.get("name").unwrap().clone();
            frames.borrow_mut().push(input.render(BindProps::new(name)).unwrap());
        });
    }
    let first = input.render(BindProps::new(field(&store, "name"))).unwrap();
    first.dispatch(&ControlEvent::Text("x".into()));
    // the stale first frame still writes to the same path
    first.dispatch(&ControlEvent::Text("xy".into()));

    let frames = frames.borrow();
    assert_eq!(frames.len(), 2);
    match &frames[1].kind {
        ViewKind::TextField { text, .. } => assert_eq!(text, "xy"),
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn more_than_one_child_is_rejected() {
    let store = form();
    let bindable = make_bindable(controls::text_input, None);
    let props = BindProps::new(field(&store, "name")).child(Text("a")).child(Text("b"));
    assert_eq!(bindable.render(props).err(), Some(StateError::MultiChild { count: 2 }));

    let one = BindProps::new(field(&store, "name")).child(Text("suffix"));
    let view = bindable.render(one).unwrap();
    assert_eq!(view.children.len(), 1);
}

#[test]
fn null_and_untracked_values_fail_before_writing() {
    let store = Store::new("s", record! { "maybe" => Node::null(), "n" => 1 });
    let root = store.state();
    let called = Rc::new(Cell::new(false));
    let c = called.clone();
    let bindable = make_bindable(|_| Text(""), None);

    let absent = BindProps::default().after_change(move |_| c.set(true));
    assert_eq!(bindable.handle_change(&absent, Node::from(1)), Err(StateError::NullBinding));

    let null = BindProps::new(field(&store, "maybe"));
    assert_eq!(bindable.handle_change(&null, Node::from(1)), Err(StateError::NullBinding));

    let detached = BindProps::new(unpack(&field(&store, "n")));
    assert_eq!(bindable.handle_change(&detached, Node::from(2)), Err(StateError::Binding));

    assert!(store.state().ptr_eq(&root));
    assert!(!called.get());
}

#[test]
fn errors_inside_control_callbacks_do_not_panic() {
    let bindable = make_bindable(controls::text_input, None);
    let view = bindable.render(BindProps::new(Node::from("loose"))).unwrap();
    assert!(view.dispatch(&ControlEvent::Text("ignored".into())));
}
