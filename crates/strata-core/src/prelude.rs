pub use crate::cache::{CacheArg, CacheArgs, make_cacheable};
pub use crate::error::{StateError, StateResult};
pub use crate::mutate::{merge, set, update};
pub use crate::node::{Kind, Node, Record, Value};
pub use crate::path::{Path, Seg};
pub use crate::responsive::{ResponsiveView, get_responsive_state};
pub use crate::store::{ActionDescriptor, ActionKind, BINDING_LABEL, Store, StoreId, SubId, sync};
pub use crate::unpack::unpack;
pub use crate::view::{ControlEvent, View, ViewId, ViewKind};
pub use crate::{path, record, seq};
