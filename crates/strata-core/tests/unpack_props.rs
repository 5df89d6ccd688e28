use proptest::prelude::*;
use strata_core::*;

/// Arbitrary nested trees. Numbers stay finite so structural equality is
/// reflexive.
fn tree() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        Just(Node::null()),
        any::<bool>().prop_map(Node::from),
        (-1.0e6..1.0e6f64).prop_map(Node::from),
        "[a-z ]{0,8}".prop_map(Node::from),
        any::<u8>().prop_map(Node::opaque),
    ];
    leaf.prop_recursive(4, 64, 5, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..5).prop_map(Node::from),
            proptest::collection::btree_map("[a-z]{1,3}", inner, 0..5).prop_map(Node::from),
        ]
    })
}

proptest! {
    #[test]
    fn unpack_is_idempotent(n in tree()) {
        let once = unpack(&n);
        prop_assert_eq!(&once, &n);
        prop_assert_eq!(unpack(&once), once);
    }

    #[test]
    fn unpack_of_a_tracked_tree_is_detached(n in tree()) {
        let store = Store::new("props", record! { "v" => n.clone() });
        let root = store.state();
        let plain = unpack(&root);

        prop_assert_eq!(&plain, &root);
        prop_assert!(!plain.ptr_eq(&root));
        prop_assert_eq!(set(&plain, 0, None), Err(StateError::Binding));
        prop_assert!(store.state().ptr_eq(&root));
    }

    #[test]
    fn adopted_values_never_alias_the_input(n in tree()) {
        let store = Store::new("props", record! { "v" => n.clone() });
        let installed = store.state().get("v").cloned();
        prop_assert_eq!(installed.as_ref(), Some(&n));
        prop_assert!(installed.is_some_and(|v| !v.ptr_eq(&n)));
    }
}
