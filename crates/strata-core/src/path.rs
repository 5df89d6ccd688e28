//! Structural paths from a store's root to one of its nodes.

use smallvec::SmallVec;
use std::fmt;

/// One step of a path: a record key or a sequence index.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Seg {
    Key(String),
    Index(usize),
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, ".{k}"),
            Seg::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// Ordered list of segments; the empty path is the root.
///
/// UI state trees are shallow, so segments live inline for the common case.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Path(SmallVec<[Seg; 6]>);

impl Path {
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Non-mutating append.
    pub fn child(&self, seg: Seg) -> Path {
        let mut p = self.clone();
        p.0.push(seg);
        p
    }

    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

/// Builds a [`Path`]: string literals become keys, integers become indices.
///
/// ```
/// use strata_core::path;
///
/// let p = path!("todos", 0, "done");
/// assert_eq!(p.to_string(), "$.todos[0].done");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $( p.push($crate::Seg::from($seg)); )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mixes_keys_and_indices() {
        let p = Path::root().key("users").index(2).key("name");
        assert_eq!(p.to_string(), "$.users[2].name");
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn macro_matches_builder() {
        assert_eq!(path!("a", 1usize, "b"), Path::root().key("a").index(1).key("b"));
        assert!(path!().is_root());
    }

    #[test]
    fn prefix() {
        let parent = path!("user");
        let child = path!("user", "name");
        assert!(parent.is_prefix_of(&child));
        assert!(!child.is_prefix_of(&parent));
        assert!(Path::root().is_prefix_of(&parent));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_segments() {
        let json = serde_json::to_value(path!("todos", 0, "done")).unwrap();
        assert_eq!(json, serde_json::json!(["todos", 0, "done"]));
        assert_eq!(serde_json::to_value(Path::root()).unwrap(), serde_json::json!([]));
    }
}
