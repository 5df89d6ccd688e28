//! Path-tracked mutations over persistent trees.
//!
//! A write resolves the node's path against the store's current root, installs
//! the new value there and rebuilds only the containers between that position
//! and the root. Everything off the path is reused by reference.

use crate::error::{StateError, StateResult};
use crate::node::{Node, Value};
use crate::path::{Path, Seg};
use crate::registry;
use crate::store::{Store, StoreId};

/// What to put at the target position. Never carries user code, so a rewrite
/// cannot observe or cause another commit.
pub(crate) enum Edit {
    Replace(Node),
    Merge(Node),
}

/// Store and path of a tracked node. Null is rejected before the tag lookup.
pub(crate) fn resolve(node: &Node) -> StateResult<(Store, Path)> {
    if node.is_null() {
        return Err(StateError::NullBinding);
    }
    let (id, path) = registry::lookup(node).ok_or(StateError::Binding)?;
    let store = Store::from_id(id).ok_or(StateError::Binding)?;
    Ok((store, path))
}

pub(crate) fn locate<'a>(root: &'a Node, path: &Path) -> StateResult<&'a Node> {
    let mut cur = root;
    for seg in path.segments() {
        cur = cur.child(seg).ok_or_else(|| StateError::PathNotFound { path: path.clone() })?;
    }
    Ok(cur)
}

/// Takes ownership of `node` for position `path` in store `store`.
///
/// A node already tagged with exactly this store and path is reused as is, with
/// its whole subtree. Anything else is copied into fresh allocations and tagged,
/// so no allocation ever sits at two positions of one tree.
pub(crate) fn adopt(node: &Node, store: StoreId, path: &Path) -> Node {
    if registry::is_tagged_at(node, store, path) {
        return node.clone();
    }
    let fresh = match node.value() {
        Value::Sequence(items) => Node::new(Value::Sequence(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| adopt(item, store, &path.child(Seg::Index(i))))
                .collect(),
        )),
        Value::Record(map) => Node::new(Value::Record(
            map.iter()
                .map(|(k, v)| (k.clone(), adopt(v, store, &path.child(Seg::Key(k.clone())))))
                .collect(),
        )),
        leaf => Node::new(leaf.clone()),
    };
    registry::tag(&fresh, store, path.clone());
    fresh
}

fn merged(current: &Node, partial: &Node, store: StoreId, path: &Path) -> StateResult<Node> {
    let Some(base) = current.as_record() else {
        return Err(StateError::ShapeMismatch {
            path: path.clone(),
            expected: "record",
            found: current.type_name(),
        });
    };
    let Some(incoming) = partial.as_record() else {
        return Err(StateError::ShapeMismatch {
            path: path.clone(),
            expected: "record",
            found: partial.type_name(),
        });
    };
    let mut map = base.clone();
    for (k, v) in incoming {
        let slot = path.child(Seg::Key(k.clone()));
        map.insert(k.clone(), adopt(v, store, &slot));
    }
    let node = Node::new(Value::Record(map));
    registry::tag(&node, store, path.clone());
    Ok(node)
}

/// Produces the root that results from applying `edit` at `path`.
///
/// Fails before building anything when the path no longer resolves or the
/// edit does not fit the current shape.
pub(crate) fn rewrite(root: &Node, path: &Path, store: StoreId, edit: Edit) -> StateResult<Node> {
    let current = locate(root, path)?;
    let leaf = match edit {
        Edit::Replace(value) => adopt(&value, store, path),
        Edit::Merge(partial) => merged(current, &partial, store, path)?,
    };
    Ok(rebuild(root, path.segments(), 0, path, store, leaf))
}

fn rebuild(node: &Node, segs: &[Seg], depth: usize, full: &Path, store: StoreId, leaf: Node) -> Node {
    let Some((seg, rest)) = segs.split_first() else {
        return leaf;
    };
    let value = match (node.value(), seg) {
        (Value::Record(map), Seg::Key(k)) => {
            let mut map = map.clone();
            if let Some(child) = map.get(k) {
                let next = rebuild(child, rest, depth + 1, full, store, leaf);
                map.insert(k.clone(), next);
            }
            Value::Record(map)
        }
        (Value::Sequence(items), Seg::Index(i)) => {
            let mut items = items.clone();
            if let Some(child) = items.get(*i) {
                items[*i] = rebuild(child, rest, depth + 1, full, store, leaf);
            }
            Value::Sequence(items)
        }
        // `locate` already proved the path; nothing else can reach here.
        (other, _) => other.clone(),
    };
    let node = Node::new(value);
    registry::tag(&node, store, full.segments()[..depth].iter().cloned().collect());
    node
}

/// Replaces the value at `node`'s path with `value`.
pub fn set(node: &Node, value: impl Into<Node>, description: Option<&str>) -> StateResult<()> {
    let (store, _) = resolve(node)?;
    store.set(node, value, description)
}

/// Shallow-merges `partial`'s keys over the record at `node`'s path. Keys not in
/// `partial` keep their nodes.
pub fn merge(node: &Node, partial: impl Into<Node>, description: Option<&str>) -> StateResult<()> {
    let (store, _) = resolve(node)?;
    store.merge(node, partial, description)
}

/// Installs `updater(current)` at `node`'s path.
pub fn update<F>(node: &Node, updater: F, description: Option<&str>) -> StateResult<()>
where
    F: FnOnce(&Node) -> Node,
{
    let (store, _) = resolve(node)?;
    store.update(node, updater, description)
}
