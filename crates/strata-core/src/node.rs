use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::path::Seg;

pub type Record = BTreeMap<String, Node>;

/// Payload of a [`Node`].
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Sequence(Vec<Node>),
    Record(Record),
    /// Anything the tree carries without looking inside (callbacks, handles, dates).
    Opaque(Rc<dyn Any>),
}

/// Structural kind used by `unpack` and the responsive views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Primitive,
    Sequence,
    Record,
    Opaque,
}

/// A position in a state tree.
///
/// Cloning a `Node` clones the handle, never the value; two handles are the same
/// node when [`Node::ptr_eq`] holds. Store association is not stored here, it is
/// looked up in the registry by allocation.
#[derive(Clone)]
pub struct Node(Rc<Value>);

impl Node {
    pub fn new(value: Value) -> Self {
        Self(Rc::new(value))
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn opaque<T: Any>(payload: T) -> Self {
        Self::new(Value::Opaque(Rc::new(payload)))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn kind(&self) -> Kind {
        match &*self.0 {
            Value::Bool(_) | Value::Number(_) | Value::Text(_) => Kind::Primitive,
            Value::Sequence(_) => Kind::Sequence,
            Value::Record(_) => Kind::Record,
            Value::Null | Value::Opaque(_) => Kind::Opaque,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match &*self.0 {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Record(_) => "record",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn downgrade(&self) -> Weak<Value> {
        Rc::downgrade(&self.0)
    }

    pub fn is_null(&self) -> bool {
        matches!(&*self.0, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &*self.0 {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match &*self.0 {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &*self.0 {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &*self.0 {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match &*self.0 {
            Value::Record(map) => Some(map),
            _ => None,
        }
    }

    pub fn downcast_opaque<T: Any>(&self) -> Option<&T> {
        match &*self.0 {
            Value::Opaque(payload) => payload.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Record field.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_record()?.get(key)
    }

    /// Sequence element.
    pub fn at(&self, index: usize) -> Option<&Node> {
        self.as_sequence()?.get(index)
    }

    pub fn child(&self, seg: &Seg) -> Option<&Node> {
        match seg {
            Seg::Key(k) => self.get(k),
            Seg::Index(i) => self.at(*i),
        }
    }
}

impl PartialEq for Node {
    /// Structural equality. Opaque payloads compare by reference.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (&*self.0, &*other.0) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Sequence(items) => f.debug_list().entries(items).finish(),
            Value::Record(map) => f.debug_map().entries(map).finish(),
            Value::Opaque(_) => write!(f, "<opaque>"),
        }
    }
}

impl From<Value> for Node {
    fn from(v: Value) -> Self {
        Node::new(v)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::new(Value::Bool(b))
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Node::new(Value::Number(n))
    }
}

impl From<f32> for Node {
    fn from(n: f32) -> Self {
        Node::new(Value::Number(n as f64))
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Node::new(Value::Number(n as f64))
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::new(Value::Number(n as f64))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::new(Value::Text(s.to_owned()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::new(Value::Text(s))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::new(Value::Sequence(items))
    }
}

impl From<Record> for Node {
    fn from(map: Record) -> Self {
        Node::new(Value::Record(map))
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        v.map_or_else(Node::null, Into::into)
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Node::new(Value::Sequence(iter.into_iter().collect()))
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Node::new(Value::Record(
            iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Node {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};
        match &*self.0 {
            Value::Null | Value::Opaque(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
        }
    }
}

/// Builds a record node: `record! { "name" => "Ada", "age" => 36 }`.
#[macro_export]
macro_rules! record {
    () => {
        $crate::Node::from($crate::Record::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Record::new();
        $( map.insert(::std::string::String::from($key), $crate::Node::from($value)); )+
        $crate::Node::from(map)
    }};
}

/// Builds a sequence node: `seq![1, 2, 3]`.
#[macro_export]
macro_rules! seq {
    ($($item:expr),* $(,)?) => {
        $crate::Node::from(::std::vec![$($crate::Node::from($item)),*])
    };
}
