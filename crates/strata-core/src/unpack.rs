use crate::node::{Kind, Node, Value};

/// Deep copy of `node` with no store association.
///
/// Primitives are copied by value, sequences and records are rebuilt element by
/// element, and null or opaque payloads are carried over by reference inside a
/// fresh node. The input is never touched, and `unpack(&unpack(x)) == unpack(x)`.
pub fn unpack(node: &Node) -> Node {
    match node.kind() {
        Kind::Primitive => Node::new(node.value().clone()),
        Kind::Sequence => node.as_sequence().unwrap_or_default().iter().map(unpack).collect(),
        Kind::Record => node
            .as_record()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), unpack(v))).collect())
            .unwrap_or_else(|| Node::new(Value::Null)),
        Kind::Opaque => Node::new(node.value().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, record, registry, seq};

    fn sample() -> Node {
        record! {
            "name" => "form",
            "count" => 3,
            "flags" => seq![true, false],
            "rows" => seq![record! { "id" => 1, "tags" => seq!["a"] }, seq![]],
            "empty" => record! {},
            "missing" => Node::null(),
        }
    }

    #[test]
    fn idempotent() {
        let once = unpack(&sample());
        assert_eq!(unpack(&once), once);
        assert_eq!(once, sample());
    }

    #[test]
    fn output_is_detached_from_the_store() {
        let store = Store::new("t", sample());
        let root = store.state();
        let plain = unpack(&root);
        assert_eq!(plain, root);
        assert!(registry::lookup(&plain).is_none());
        assert!(registry::lookup(plain.get("rows").unwrap().at(0).unwrap()).is_none());
        assert!(!plain.get("flags").unwrap().ptr_eq(root.get("flags").unwrap()));
    }

    #[test]
    fn opaque_payload_is_shared() {
        let handle = Node::opaque(vec![1u8, 2, 3]);
        let out = unpack(&record! { "h" => handle.clone() });
        let h = out.get("h").unwrap();
        assert!(!h.ptr_eq(&handle));
        assert_eq!(h, &handle);
    }

    #[test]
    fn input_untouched() {
        let input = sample();
        let first = input.get("rows").unwrap().clone();
        let _ = unpack(&input);
        assert!(input.get("rows").unwrap().ptr_eq(&first));
    }
}
