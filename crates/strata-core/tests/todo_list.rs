use std::cell::Cell;
use std::rc::Rc;

use strata_core::*;

fn todos() -> Store {
    Store::new(
        "todos",
        record! {
            "filter" => "all",
            "items" => seq![
                record! { "title" => "write", "done" => false },
                record! { "title" => "test", "done" => true },
            ],
        },
    )
}

fn items(store: &Store) -> Node {
    store.state().get("items").unwrap().clone()
}

fn push(title: &str) -> impl FnOnce(&Node) -> Node + '_ {
    move |current: &Node| {
        let mut list = current.as_sequence().unwrap_or_default().to_vec();
        list.push(record! { "title" => title, "done" => false });
        Node::from(list)
    }
}

#[test]
fn appending_reuses_existing_items() {
    let store = todos();
    let first = items(&store).at(0).unwrap().clone();

    update(&items(&store), push("ship"), Some("add todo")).unwrap();

    let now = items(&store);
    assert_eq!(now.as_sequence().map(<[Node]>::len), Some(3));
    assert!(now.at(0).unwrap().ptr_eq(&first));
    assert_eq!(store.last_action().label, "add todo");

    let done = now.at(2).unwrap().get("done").unwrap().clone();
    set(&done, true, None).unwrap();
    assert_eq!(store.last_action().path, path!("items", 2, "done"));
    assert_eq!(items(&store).at(2).unwrap().get("done").and_then(Node::as_bool), Some(true));
}

#[test]
fn removing_an_item_strands_handles_past_the_end() {
    let store = todos();
    let second_done = items(&store).at(1).unwrap().get("done").unwrap().clone();

    update(
        &items(&store),
        |current| current.as_sequence().unwrap_or_default()[1..].iter().cloned().collect(),
        Some("drop first"),
    )
    .unwrap();

    let root = store.state();
    assert_eq!(
        set(&second_done, false, None),
        Err(StateError::PathNotFound {
            path: path!("items", 1, "done")
        })
    );
    assert!(store.state().ptr_eq(&root));

    // the moved item answers at its new index
    let moved = items(&store).at(0).unwrap().get("done").unwrap().clone();
    assert_eq!(moved.as_bool(), Some(true));
    assert!(!moved.ptr_eq(&second_done));
    set(&moved, false, None).unwrap();
    assert_eq!(store.last_action().path, path!("items", 0, "done"));
}

#[test]
fn views_track_a_changing_list() {
    let store = todos();
    let list = get_responsive_state(&items(&store)).unwrap();
    let third = list.index(2).key("title");
    assert_eq!(third.read(), None);

    update(&items(&store), push("ship"), None).unwrap();
    assert_eq!(list.child_count(), 3);
    assert_eq!(third.as_text().as_deref(), Some("ship"));

    let titles: Vec<_> = list
        .children()
        .iter()
        .filter_map(|item| item.key("title").as_text())
        .collect();
    assert_eq!(titles, ["write", "test", "ship"]);
}

#[test]
fn visible_items_derivation_skips_unrelated_writes() {
    let store = todos();
    let runs = Rc::new(Cell::new(0));
    let r = runs.clone();
    let visible = make_cacheable(move |(list, filter): (Node, String)| {
        r.set(r.get() + 1);
        list.as_sequence()
            .unwrap_or_default()
            .iter()
            .filter(|item| {
                let done = item.get("done").and_then(Node::as_bool).unwrap_or(false);
                match filter.as_str() {
                    "open" => !done,
                    "done" => done,
                    _ => true,
                }
            })
            .count()
    });
    let filter = |s: &Store| s.state().get("filter").and_then(Node::as_text).unwrap_or("").to_string();

    assert_eq!(visible((items(&store), filter(&store))), 2);

    let title = items(&store).at(0).unwrap().get("title").unwrap().clone();
    merge(&store.state(), record! { "owner" => "ada" }, None).unwrap();
    assert_eq!(visible((items(&store), filter(&store))), 2);
    assert_eq!(runs.get(), 1);

    set(store.state().get("filter").unwrap(), "open", None).unwrap();
    assert_eq!(visible((items(&store), filter(&store))), 1);
    assert_eq!(runs.get(), 2);

    set(&title, "rewrite", None).unwrap();
    assert_eq!(visible((items(&store), filter(&store))), 1);
    assert_eq!(runs.get(), 3);
}

#[test]
fn opaque_values_ride_along_untouched() {
    let handler: Rc<dyn Fn(i32) -> i32> = Rc::new(|x: i32| x + 1);
    let store = Store::new("s", record! { "on_add" => Node::opaque(handler), "n" => 0 });

    let copy = unpack(&store.state());
    let original = store.state().get("on_add").unwrap().clone();
    assert_eq!(copy.get("on_add"), Some(&original));

    let n = store.state().get("n").unwrap().clone();
    set(&n, 1, None).unwrap();
    let f = store
        .state()
        .get("on_add")
        .and_then(|n| n.downcast_opaque::<Rc<dyn Fn(i32) -> i32>>())
        .cloned()
        .unwrap();
    assert_eq!(f(1), 2);
}
