//! Single-slot memoization for derivations over state nodes.
//!
//! Because untouched subtrees keep their allocation across mutations, comparing
//! argument nodes by reference is enough to tell whether a derivation's inputs
//! changed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::node::Node;
use crate::responsive::ResponsiveView;

/// Loose equality used to decide whether a cached result can be reused.
pub trait CacheArg {
    fn same(&self, other: &Self) -> bool;
}

impl CacheArg for Node {
    fn same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl CacheArg for ResponsiveView {
    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: ?Sized> CacheArg for Rc<T> {
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: CacheArg> CacheArg for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! by_value {
    ($($t:ty),*) => {
        $(impl CacheArg for $t {
            fn same(&self, other: &Self) -> bool {
                self == other
            }
        })*
    };
}

by_value!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String);

/// A positional argument list, compared position by position.
pub trait CacheArgs: Clone {
    fn same_as(&self, previous: &Self) -> bool;
}

impl CacheArgs for () {
    fn same_as(&self, _: &Self) -> bool {
        true
    }
}

macro_rules! arg_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: CacheArg + Clone),+> CacheArgs for ($($name,)+) {
            fn same_as(&self, previous: &Self) -> bool {
                $(self.$idx.same(&previous.$idx))&&+
            }
        }
    };
}

arg_tuple!(A: 0);
arg_tuple!(A: 0, B: 1);
arg_tuple!(A: 0, B: 1, C: 2);
arg_tuple!(A: 0, B: 1, C: 2, D: 3);
arg_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
arg_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// Wraps `f` so that a call with the same arguments as the previous call returns
/// the previous result without running `f`.
///
/// Only the latest call is remembered: alternating between two argument lists
/// recomputes every time.
///
/// ```
/// use strata_core::{make_cacheable, record};
///
/// let total = make_cacheable(|(items,): (strata_core::Node,)| {
///     items.as_record().map_or(0, |m| m.len())
/// });
/// let items = record! { "a" => 1 };
/// assert_eq!(total((items.clone(),)), 1);
/// ```
pub fn make_cacheable<A, R, F>(f: F) -> impl Fn(A) -> R
where
    A: CacheArgs,
    R: Clone,
    F: Fn(A) -> R,
{
    let slot: RefCell<Option<(A, R)>> = RefCell::new(None);
    move |args: A| {
        {
            let slot = slot.borrow();
            if let Some((previous, result)) = slot.as_ref()
                && args.same_as(previous)
            {
                return result.clone();
            }
        }
        let result = f(args.clone());
        *slot.borrow_mut() = Some((args, result.clone()));
        result
    }
}
