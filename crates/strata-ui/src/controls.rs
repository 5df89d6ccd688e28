//! Display components ready for [`make_bindable`](crate::make_bindable).
//!
//! Each one shows `props.value()` and turns its control's typed callback into a
//! change payload. Text inputs and sliders report bare values; checkboxes and
//! switches report an event record shaped like `{ target: { checked: b } }`, so
//! bind them with `Some("checked")`.

use strata_core::{Node, View, record};

use crate::bind::DisplayProps;
use crate::{Checkbox, Slider, Switch, TextField, ViewExt};

fn with_child(view: View, props: &DisplayProps) -> View {
    match &props.child {
        Some(child) => view.child(child.clone()),
        None => view,
    }
}

/// `TextField` showing the bound text. Reads `hint` from the passthrough props.
pub fn text_input(props: DisplayProps) -> View {
    let on_change = props.on_change.clone();
    let text = props.value().as_text().unwrap_or_default().to_string();
    let view = TextField(text, props.text_prop("hint"), move |s| on_change(Node::from(s)));
    with_child(view, &props)
}

fn toggle_event(checked: bool) -> Node {
    record! { "target" => record! { "checked" => checked } }
}

/// `Checkbox` for a boolean node. Reads `label` from the passthrough props.
pub fn checkbox(props: DisplayProps) -> View {
    let on_change = props.on_change.clone();
    let checked = props.value().as_bool().unwrap_or(false);
    let view = Checkbox(checked, props.text_prop("label"), move |b| on_change(toggle_event(b)));
    with_child(view, &props)
}

/// `Switch` for a boolean node. Reads `label` from the passthrough props.
pub fn switch(props: DisplayProps) -> View {
    let on_change = props.on_change.clone();
    let checked = props.value().as_bool().unwrap_or(false);
    let view = Switch(checked, props.text_prop("label"), move |b| on_change(toggle_event(b)));
    with_child(view, &props)
}

/// `Slider` for a numeric node. Reads `min`, `max`, `step` and `label` from the
/// passthrough props; the range defaults to `0..=1`.
pub fn slider(props: DisplayProps) -> View {
    let on_change = props.on_change.clone();
    let num = |name: &str| props.prop(name).and_then(Node::as_f64).map(|v| v as f32);
    let value = props.value().as_f64().unwrap_or(0.0) as f32;
    let range = (num("min").unwrap_or(0.0), num("max").unwrap_or(1.0));
    let view = Slider(value, range, num("step"), props.text_prop("label"), move |v| {
        on_change(Node::from(v))
    });
    with_child(view, &props)
}
