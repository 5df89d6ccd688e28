use crate::error::StateResult;
use crate::mutate::{locate, resolve};
use crate::node::{Kind, Node};
use crate::path::{Path, Seg};
use crate::store::{Store, StoreId};
use crate::unpack::unpack;

/// Read-only accessor bound to a fixed path of a store.
///
/// Holds no value: every read walks the store's *current* root, so a view made
/// before any number of mutations reads the latest state. Chaining with
/// [`key`](Self::key) and [`index`](Self::index) only extends the path.
/// Values handed out are detached copies and cannot be used as mutation targets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResponsiveView {
    store: StoreId,
    path: Path,
}

/// Live view over `node`'s path. Same preconditions as the mutations.
pub fn get_responsive_state(node: &Node) -> StateResult<ResponsiveView> {
    let (store, path) = resolve(node)?;
    Ok(ResponsiveView {
        store: store.id(),
        path,
    })
}

impl ResponsiveView {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self, key: impl Into<String>) -> ResponsiveView {
        ResponsiveView {
            store: self.store,
            path: self.path.child(Seg::Key(key.into())),
        }
    }

    pub fn index(&self, index: usize) -> ResponsiveView {
        ResponsiveView {
            store: self.store,
            path: self.path.child(Seg::Index(index)),
        }
    }

    fn with_current<R>(&self, f: impl FnOnce(&Node) -> R) -> Option<R> {
        let store = Store::from_id(self.store)?;
        let root = store.state();
        locate(&root, &self.path).ok().map(f)
    }

    /// Detached copy of the value currently at this path; `None` once the path
    /// stops resolving or the store is gone.
    pub fn read(&self) -> Option<Node> {
        self.with_current(unpack)
    }

    pub fn kind(&self) -> Option<Kind> {
        self.with_current(Node::kind)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.with_current(Node::as_f64).flatten()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.with_current(Node::as_bool).flatten()
    }

    pub fn as_text(&self) -> Option<String> {
        self.with_current(|n| n.as_text().map(str::to_owned)).flatten()
    }

    /// Number of elements or fields currently under this path.
    pub fn child_count(&self) -> usize {
        self.with_current(|n| match (n.as_sequence(), n.as_record()) {
            (Some(items), _) => items.len(),
            (_, Some(map)) => map.len(),
            _ => 0,
        })
        .unwrap_or(0)
    }

    /// Keys of the record currently under this path.
    pub fn keys(&self) -> Vec<String> {
        self.with_current(|n| n.as_record().map(|m| m.keys().cloned().collect()))
            .flatten()
            .unwrap_or_default()
    }

    /// One chained view per current child.
    pub fn children(&self) -> Vec<ResponsiveView> {
        match self.kind() {
            Some(Kind::Sequence) => (0..self.child_count()).map(|i| self.index(i)).collect(),
            Some(Kind::Record) => self.keys().into_iter().map(|k| self.key(k)).collect(),
            _ => Vec::new(),
        }
    }
}
