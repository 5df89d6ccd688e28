//! # Stores, Nodes, and Responsive Views
//!
//! Strata lets UI code treat one immutable state tree as if it were mutable.
//! There are four main pieces:
//!
//! - `Store` — owns the current root and notifies subscribers on `sync()`.
//! - `Node` — a position in the tree; cheap to clone, compared by allocation.
//! - `set` / `merge` / `update` — path-tracked writes that rebuild only the
//!   containers between the written node and the root.
//! - `ResponsiveView` — a read-only accessor that always reads the latest root.
//!
//! ## Writing
//!
//! ```rust
//! use strata_core::*;
//!
//! let store = Store::new("profile", record! {
//!     "user" => record! { "name" => "Ada", "age" => 36 },
//!     "prefs" => record! { "theme" => "dark" },
//! });
//! let prefs_before = store.state().get("prefs").unwrap().clone();
//!
//! let name = store.state().get("user").unwrap().get("name").unwrap().clone();
//! set(&name, "Grace", None).unwrap();
//! store.sync();
//!
//! // untouched subtrees keep their allocation
//! assert!(store.state().get("prefs").unwrap().ptr_eq(&prefs_before));
//! assert_eq!(store.last_action().label, "[set] $.user.name");
//! ```
//!
//! Nodes know their store and path through a side table, not through a field,
//! so plain data (for example the output of [`unpack`]) carries no tag and is
//! rejected by every write with [`StateError::Binding`].
//!
//! ## Reading live
//!
//! ```rust
//! use strata_core::*;
//!
//! let store = Store::new("counter", record! { "n" => 0 });
//! let n = get_responsive_state(&store.state()).unwrap().key("n");
//!
//! let node = store.state().get("n").unwrap().clone();
//! update(&node, |c| Node::from(c.as_f64().unwrap_or(0.0) + 1.0), None).unwrap();
//! assert_eq!(n.as_f64(), Some(1.0));
//! ```
//!
//! ## Derivations
//!
//! [`make_cacheable`] keeps one result per derivation and reuses it while the
//! argument nodes are the same allocations, which structural sharing guarantees
//! for subtrees a write did not touch.

pub mod cache;
pub mod error;
pub mod mutate;
pub mod node;
pub mod path;
pub mod prelude;
mod registry;
pub mod responsive;
pub mod store;
pub mod unpack;
pub mod view;

pub use cache::*;
pub use error::*;
pub use mutate::{merge, set, update};
pub use node::*;
pub use path::*;
pub use responsive::*;
pub use store::*;
pub use unpack::*;
pub use view::*;
