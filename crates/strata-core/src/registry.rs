//! Side table from node allocation to owning store and structural path.
//!
//! Tags live here rather than on the values so plain data stays plain. Each entry
//! holds a `Weak` to its node, which pins the allocation: an address cannot be
//! handed to a new node while its entry exists. Entries whose node died are swept
//! once the table has doubled since the last sweep.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;

use crate::node::{Node, Value};
use crate::path::Path;
use crate::store::StoreId;

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

const MIN_SWEEP: usize = 256;

struct Tag {
    node: Weak<Value>,
    store: StoreId,
    path: Path,
}

#[derive(Default)]
struct Registry {
    tags: HashMap<usize, Tag>,
    live_after_sweep: usize,
}

impl Registry {
    fn sweep(&mut self) {
        let before = self.tags.len();
        self.tags.retain(|_, t| t.node.strong_count() > 0);
        self.live_after_sweep = self.tags.len();
        let dropped = before - self.tags.len();
        if dropped > 0 {
            log::trace!("registry: swept {dropped} stale tags, {} live", self.tags.len());
        }
    }
}

pub(crate) fn tag(node: &Node, store: StoreId, path: Path) {
    REGISTRY.with(|r| {
        r.borrow_mut().tags.insert(
            node.addr(),
            Tag {
                node: node.downgrade(),
                store,
                path,
            },
        );
    });
}

/// Owning store and path of `node`, if it was ever installed in a store.
pub(crate) fn lookup(node: &Node) -> Option<(StoreId, Path)> {
    REGISTRY.with(|r| {
        let r = r.borrow();
        let t = r.tags.get(&node.addr())?;
        (t.node.as_ptr() as usize == node.addr()).then(|| (t.store, t.path.clone()))
    })
}

/// True when `node` is tagged with exactly this store and path.
pub(crate) fn is_tagged_at(node: &Node, store: StoreId, path: &Path) -> bool {
    REGISTRY.with(|r| {
        r.borrow()
            .tags
            .get(&node.addr())
            .is_some_and(|t| t.store == store && &t.path == path)
    })
}

pub(crate) fn maybe_sweep() {
    REGISTRY.with(|r| {
        let mut r = r.borrow_mut();
        if r.tags.len() >= MIN_SWEEP && r.tags.len() > r.live_after_sweep * 2 {
            r.sweep();
        }
    });
}

/// Drops every tag of a store that went away.
pub(crate) fn forget_store(store: StoreId) {
    // Thread teardown may already have destroyed the table.
    let _ = REGISTRY.try_with(|r| {
        if let Ok(mut r) = r.try_borrow_mut() {
            let before = r.tags.len();
            r.tags.retain(|_, t| t.store != store);
            if before > MIN_SWEEP && r.tags.len() < before / 2 {
                log::warn!(
                    "registry: dropping store released {} of {before} tags",
                    before - r.tags.len()
                );
            }
            r.live_after_sweep = r.live_after_sweep.min(r.tags.len());
        }
    });
}

#[cfg(test)]
pub(crate) fn len() -> usize {
    REGISTRY.with(|r| r.borrow().tags.len())
}
