//! Two-way binding between a display control and a state node.
//!
//! ```rust
//! use strata_core::*;
//! use strata_ui::{BindProps, controls, make_bindable};
//!
//! let store = Store::new("form", record! { "name" => "" });
//! let input = make_bindable(controls::text_input, None);
//!
//! let name = store.state().get("name").unwrap().clone();
//! let view = input.render(BindProps::new(name)).unwrap();
//! view.dispatch(&ControlEvent::Text("Ada".into()));
//!
//! assert_eq!(store.state().get("name").and_then(Node::as_text), Some("Ada"));
//! assert_eq!(store.last_action().label, BINDING_LABEL);
//! ```

use std::collections::BTreeMap;
use std::rc::Rc;

use strata_core::{ActionKind, BINDING_LABEL, Node, StateError, StateResult, Store, View, unpack};

/// Default name of the property carrying a control's display value.
pub const DEFAULT_VALUE_PROP: &str = "value";

pub type ChangeHandler = Rc<dyn Fn(Node)>;

/// What a display component receives from a bindable wrapper.
#[derive(Clone)]
pub struct DisplayProps {
    /// Passthrough props plus the designated value property.
    pub props: BTreeMap<String, Node>,
    pub value_prop: String,
    /// Feed either a bare value or an event record `{ target: { <value_prop>: v } }`.
    pub on_change: ChangeHandler,
    pub child: Option<View>,
}

impl DisplayProps {
    /// The detached display value.
    pub fn value(&self) -> Node {
        self.props.get(&self.value_prop).cloned().unwrap_or_else(Node::null)
    }

    pub fn prop(&self, name: &str) -> Option<&Node> {
        self.props.get(name)
    }

    pub fn text_prop(&self, name: &str) -> String {
        self.prop(name).and_then(Node::as_text).unwrap_or_default().to_string()
    }
}

/// Props of one bindable instance.
#[derive(Clone, Default)]
pub struct BindProps {
    /// The tracked node to bind.
    pub value: Option<Node>,
    pub value_prop: Option<String>,
    pub after_change: Option<Rc<dyn Fn(&Node)>>,
    /// Forwarded to the display component untouched.
    pub props: BTreeMap<String, Node>,
    pub children: Vec<View>,
}

impl BindProps {
    pub fn new(value: Node) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn value_prop(mut self, name: impl Into<String>) -> Self {
        self.value_prop = Some(name.into());
        self
    }

    pub fn after_change(mut self, f: impl Fn(&Node) + 'static) -> Self {
        self.after_change = Some(Rc::new(f));
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: View) -> Self {
        self.children.push(child);
        self
    }
}

/// Component type produced by [`make_bindable`].
#[derive(Clone)]
pub struct Bindable {
    display: Rc<dyn Fn(DisplayProps) -> View>,
    value_prop: Option<String>,
}

/// Wraps `display` so that it shows `unpack(props.value)` and writes changes back.
///
/// `value_prop` names the control's display property (for instance `"checked"`);
/// it wins over the per-instance [`BindProps::value_prop`], and both fall back
/// to `"value"`.
pub fn make_bindable(
    display: impl Fn(DisplayProps) -> View + 'static,
    value_prop: Option<&str>,
) -> Bindable {
    Bindable {
        display: Rc::new(display),
        value_prop: value_prop.map(str::to_owned),
    }
}

struct Binding {
    value: Option<Node>,
    value_prop: String,
    after_change: Option<Rc<dyn Fn(&Node)>>,
}

impl Binding {
    fn apply(&self, payload: Node) -> StateResult<()> {
        let raw = extract(payload, &self.value_prop);
        let node = self
            .value
            .as_ref()
            .filter(|n| !n.is_null())
            .ok_or(StateError::NullBinding)?;
        let store = Store::of(node)?;
        store.set(node, raw.clone(), None)?;
        store.relabel(BINDING_LABEL, ActionKind::Binding);
        store.sync();
        if let Some(cb) = &self.after_change {
            cb(&raw);
        }
        Ok(())
    }
}

/// `target[value_prop]` when the payload looks like a change event, else the
/// payload itself.
fn extract(payload: Node, value_prop: &str) -> Node {
    payload
        .get("target")
        .and_then(|target| target.get(value_prop))
        .cloned()
        .unwrap_or(payload)
}

impl Bindable {
    fn designated_prop(&self, props: &BindProps) -> String {
        self.value_prop
            .clone()
            .or_else(|| props.value_prop.clone())
            .unwrap_or_else(|| DEFAULT_VALUE_PROP.to_string())
    }

    fn binding(&self, props: &BindProps) -> Binding {
        Binding {
            value: props.value.clone(),
            value_prop: self.designated_prop(props),
            after_change: props.after_change.clone(),
        }
    }

    /// Renders the display component; fails when given more than one child.
    pub fn render(&self, props: BindProps) -> StateResult<View> {
        if props.children.len() > 1 {
            return Err(StateError::MultiChild {
                count: props.children.len(),
            });
        }
        let binding = Rc::new(self.binding(&props));
        let value_prop = binding.value_prop.clone();
        let shown = props.value.as_ref().map_or_else(Node::null, unpack);

        let mut forwarded = props.props;
        forwarded.insert(value_prop.clone(), shown);

        let on_change: ChangeHandler = Rc::new(move |payload: Node| {
            if let Err(e) = binding.apply(payload) {
                log::error!("binding on '{}' rejected a change: {e}", binding.value_prop);
            }
        });

        Ok((self.display)(DisplayProps {
            props: forwarded,
            value_prop,
            on_change,
            child: props.children.into_iter().next(),
        }))
    }

    /// Applies one change payload the way a rendered instance would, returning
    /// the error instead of logging it.
    pub fn handle_change(&self, props: &BindProps, payload: Node) -> StateResult<()> {
        self.binding(props).apply(payload)
    }
}
