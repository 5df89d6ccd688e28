use std::rc::Rc;

pub type ViewId = u64;

pub type CallbackText = Rc<dyn Fn(String)>;
pub type CallbackBool = Rc<dyn Fn(bool)>;
pub type CallbackF32 = Rc<dyn Fn(f32)>;

#[derive(Clone)]
pub enum ViewKind {
    Row,
    Column,
    Text {
        text: String,
    },
    TextField {
        text: String,
        hint: String,
        on_change: Option<CallbackText>,
    },
    Checkbox {
        checked: bool,
        label: String,
        on_change: Option<CallbackBool>,
    },
    Switch {
        checked: bool,
        label: String,
        on_change: Option<CallbackBool>,
    },
    Slider {
        value: f32,
        min: f32,
        max: f32,
        step: Option<f32>,
        label: String,
        on_change: Option<CallbackF32>,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            ViewKind::TextField { text, hint, .. } => f
                .debug_struct("TextField")
                .field("text", text)
                .field("hint", hint)
                .finish(),
            ViewKind::Checkbox { checked, label, .. } => f
                .debug_struct("Checkbox")
                .field("checked", checked)
                .field("label", label)
                .finish(),
            ViewKind::Switch { checked, label, .. } => f
                .debug_struct("Switch")
                .field("checked", checked)
                .field("label", label)
                .finish(),
            ViewKind::Slider {
                value,
                min,
                max,
                step,
                label,
                ..
            } => f
                .debug_struct("Slider")
                .field("value", value)
                .field("min", min)
                .field("max", max)
                .field("step", step)
                .field("label", label)
                .finish(),
        }
    }
}

/// Input delivered to a control, as a platform runner would after hit testing.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    Text(String),
    Toggle(bool),
    Slide(f32),
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub children: Vec<View>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            children: vec![],
        }
    }

    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }

    pub fn id(mut self, id: ViewId) -> Self {
        self.id = id;
        self
    }

    pub fn find(&self, id: ViewId) -> Option<&View> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Delivers `event` to the first control (depth-first) that accepts it.
    /// Returns false when nothing took it.
    pub fn dispatch(&self, event: &ControlEvent) -> bool {
        let handled = match (&self.kind, event) {
            (ViewKind::TextField { on_change: Some(cb), .. }, ControlEvent::Text(s)) => {
                cb(s.clone());
                true
            }
            (ViewKind::Checkbox { on_change: Some(cb), .. }, ControlEvent::Toggle(b))
            | (ViewKind::Switch { on_change: Some(cb), .. }, ControlEvent::Toggle(b)) => {
                cb(*b);
                true
            }
            (ViewKind::Slider { on_change: Some(cb), .. }, ControlEvent::Slide(v)) => {
                cb(*v);
                true
            }
            _ => false,
        };
        handled || self.children.iter().any(|c| c.dispatch(event))
    }

    /// Dispatches to the view with `id` only.
    pub fn dispatch_to(&self, id: ViewId, event: &ControlEvent) -> bool {
        self.find(id).is_some_and(|v| {
            let leaf = View {
                children: vec![],
                ..v.clone()
            };
            leaf.dispatch(event)
        })
    }
}
