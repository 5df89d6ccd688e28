use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::SlotMap;
use web_time::Instant;

use crate::error::{StateError, StateResult};
use crate::mutate::{self, Edit};
use crate::node::Node;
use crate::path::Path;
use crate::registry;

slotmap::new_key_type! {
    /// Identity of a live store.
    pub struct StoreId;
}

thread_local! {
    static STORES: RefCell<SlotMap<StoreId, Weak<RefCell<StoreInner>>>> =
        RefCell::new(SlotMap::with_key());
}

pub type SubId = usize;

/// Label given to mutations that came through a bound control.
pub const BINDING_LABEL: &str = "[binding]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ActionKind {
    Init,
    Set,
    Merge,
    Update,
    Binding,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Init => "init",
            ActionKind::Set => "set",
            ActionKind::Merge => "merge",
            ActionKind::Update => "update",
            ActionKind::Binding => "binding",
        })
    }
}

/// Observability label of the latest mutation. Not used for replay.
#[derive(Clone, Debug)]
pub struct ActionDescriptor {
    /// Commit number within the store; a relabel keeps it.
    pub seq: u64,
    pub label: String,
    pub kind: ActionKind,
    pub path: Path,
    pub at: Instant,
}

impl ActionDescriptor {
    fn new(seq: u64, kind: ActionKind, path: Path, description: Option<&str>) -> Self {
        let label = match description {
            Some(d) => d.to_owned(),
            None => format!("[{kind}] {path}"),
        };
        Self {
            seq,
            label,
            kind,
            path,
            at: Instant::now(),
        }
    }
}

type Subscriber = Rc<dyn Fn(&Node, &ActionDescriptor)>;
type CommitHook = Rc<dyn Fn(&ActionDescriptor)>;

struct StoreInner {
    id: StoreId,
    name: String,
    root: Node,
    action: ActionDescriptor,
    subs: Vec<(SubId, Subscriber)>,
    hooks: Vec<(SubId, CommitHook)>,
    next_sub: SubId,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        let id = self.id;
        let _ = STORES.try_with(|s| {
            if let Ok(mut s) = s.try_borrow_mut() {
                s.remove(id);
            }
        });
        registry::forget_store(id);
    }
}

/// Owner of one state tree.
///
/// `Store` is a cheap handle; clones share the same tree. Every accepted
/// mutation installs a new root, and subscribers hear about it only when
/// [`Store::sync`] runs.
#[derive(Clone)]
pub struct Store(Rc<RefCell<StoreInner>>);

impl Store {
    pub fn new(name: impl Into<String>, initial: impl Into<Node>) -> Self {
        let name = name.into();
        let id = STORES.with(|s| s.borrow_mut().insert(Weak::new()));
        let root = mutate::adopt(&initial.into(), id, &Path::root());
        let inner = Rc::new(RefCell::new(StoreInner {
            id,
            name,
            root,
            action: ActionDescriptor::new(0, ActionKind::Init, Path::root(), Some("[init]")),
            subs: Vec::new(),
            hooks: Vec::new(),
            next_sub: 0,
        }));
        STORES.with(|s| {
            if let Some(slot) = s.borrow_mut().get_mut(id) {
                *slot = Rc::downgrade(&inner);
            }
        });
        log::debug!("store '{}' created", inner.borrow().name);
        Store(inner)
    }

    pub(crate) fn from_id(id: StoreId) -> Option<Store> {
        STORES.with(|s| s.borrow().get(id).and_then(Weak::upgrade).map(Store))
    }

    /// The store a tracked node belongs to.
    pub fn of(node: &Node) -> StateResult<Store> {
        mutate::resolve(node).map(|(store, _)| store)
    }

    pub fn id(&self) -> StoreId {
        self.0.borrow().id
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    /// Current committed root.
    pub fn state(&self) -> Node {
        self.0.borrow().root.clone()
    }

    pub fn last_action(&self) -> ActionDescriptor {
        self.0.borrow().action.clone()
    }

    /// Replaces the value at `node`'s path.
    pub fn set(&self, node: &Node, value: impl Into<Node>, description: Option<&str>) -> StateResult<()> {
        let path = self.path_of(node)?;
        self.commit(&path, ActionKind::Set, description, Edit::Replace(value.into()))
    }

    /// Shallow-merges the keys of `partial` over the record at `node`'s path.
    pub fn merge(&self, node: &Node, partial: impl Into<Node>, description: Option<&str>) -> StateResult<()> {
        let path = self.path_of(node)?;
        self.commit(&path, ActionKind::Merge, description, Edit::Merge(partial.into()))
    }

    /// Replaces the value at `node`'s path with `updater(current)`.
    ///
    /// The updater runs before the commit starts. Writes it makes to the store
    /// land first, and the result is installed over the root they produced.
    pub fn update<F>(&self, node: &Node, updater: F, description: Option<&str>) -> StateResult<()>
    where
        F: FnOnce(&Node) -> Node,
    {
        let path = self.path_of(node)?;
        let current = mutate::locate(&self.state(), &path)?.clone();
        let next = updater(&current);
        self.commit(&path, ActionKind::Update, description, Edit::Replace(next))
    }

    fn path_of(&self, node: &Node) -> StateResult<Path> {
        let (store, path) = mutate::resolve(node)?;
        if !Rc::ptr_eq(&store.0, &self.0) {
            return Err(StateError::Binding);
        }
        Ok(path)
    }

    fn commit(
        &self,
        path: &Path,
        kind: ActionKind,
        description: Option<&str>,
        edit: Edit,
    ) -> StateResult<()> {
        let (action, hooks) = {
            let mut inner = self.0.borrow_mut();
            // Read, rewrite and install under one borrow: the edit always
            // builds on the latest root.
            let id = inner.id;
            let next = mutate::rewrite(&inner.root, path, id, edit)?;
            inner.root = next;
            let seq = inner.action.seq + 1;
            inner.action = ActionDescriptor::new(seq, kind, path.clone(), description);
            log::trace!("store '{}': {} (#{seq})", inner.name, inner.action.label);
            let hooks: Vec<CommitHook> = inner.hooks.iter().map(|(_, h)| h.clone()).collect();
            (inner.action.clone(), hooks)
        };
        registry::maybe_sweep();
        for hook in hooks {
            hook(&action);
        }
        Ok(())
    }

    /// Re-labels the latest action, e.g. to mark it as binding-originated.
    /// Commit hooks see the descriptor again with the same `seq`.
    pub fn relabel(&self, label: impl Into<String>, kind: ActionKind) {
        let (action, hooks) = {
            let mut inner = self.0.borrow_mut();
            inner.action.label = label.into();
            inner.action.kind = kind;
            let hooks: Vec<CommitHook> = inner.hooks.iter().map(|(_, h)| h.clone()).collect();
            (inner.action.clone(), hooks)
        };
        for hook in hooks {
            hook(&action);
        }
    }

    /// Pushes the current root to every subscriber, in subscription order,
    /// before returning.
    pub fn sync(&self) {
        let (root, action, subs) = {
            let inner = self.0.borrow();
            let subs: Vec<Subscriber> = inner.subs.iter().map(|(_, s)| s.clone()).collect();
            (inner.root.clone(), inner.action.clone(), subs)
        };
        for s in subs {
            s(&root, &action);
        }
    }

    pub fn subscribe(&self, f: impl Fn(&Node, &ActionDescriptor) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        let id = inner.next_sub;
        inner.next_sub += 1;
        inner.subs.push((id, Rc::new(f)));
        log::debug!("store '{}': subscriber {id} added", inner.name);
        id
    }

    /// Runs `f` after every commit, before any `sync`.
    pub fn on_commit(&self, f: impl Fn(&ActionDescriptor) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        let id = inner.next_sub;
        inner.next_sub += 1;
        inner.hooks.push((id, Rc::new(f)));
        id
    }

    /// Removes a subscriber or commit hook. Returns false for unknown ids.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        let mut inner = self.0.borrow_mut();
        let before = inner.subs.len() + inner.hooks.len();
        inner.subs.retain(|(sid, _)| *sid != id);
        inner.hooks.retain(|(sid, _)| *sid != id);
        let removed = inner.subs.len() + inner.hooks.len() < before;
        if removed {
            log::debug!("store '{}': subscriber {id} removed", inner.name);
        }
        removed
    }

    pub fn ptr_eq(&self, other: &Store) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Store")
            .field("name", &inner.name)
            .field("action", &inner.action.label)
            .field("root", &inner.root)
            .finish()
    }
}

/// Notifies the subscribers of the store `node` belongs to.
pub fn sync(node: &Node) -> StateResult<()> {
    Store::of(node)?.sync();
    Ok(())
}
